//! # SGP4 propagation
//!
//! [`Propagator`] wraps the SGP4 constants derived from an [`OrbitalElementSet`] and
//! evaluates the object's inertial (TEME) state at a requested time. The model runs on
//! the WGS72 geopotential, the one TLEs are fitted against.
//!
//! A sample the model cannot solve (decayed orbit, eccentricity out of range, numerical
//! singularity, non-finite output) is reported as
//! [`ReentryError::PropagationDivergence`] right away. This is a per-sample condition:
//! the sampling loop of [`crate::ground_track`] skips such samples and keeps going.
use std::fmt;

use nalgebra::Vector3;
use tracing::warn;

use crate::{
    constants::{Kilometer, Minutes},
    reentry_errors::ReentryError,
    time::EpochTime,
    tle::OrbitalElementSet,
};

/// Inertial state of the object at one instant.
///
/// Units
/// -----
/// * `position`: km, ECI (TEME)
/// * `velocity`: km/s, ECI (TEME)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagatedState {
    pub position: Vector3<Kilometer>,
    pub velocity: Vector3<f64>,
}

impl PropagatedState {
    pub fn is_finite(&self) -> bool {
        self.position.iter().chain(self.velocity.iter()).all(|v| v.is_finite())
    }

    /// Distance to the Earth's center, km.
    pub fn radius(&self) -> Kilometer {
        self.position.norm()
    }
}

/// Anything able to produce an inertial state a given number of minutes after the
/// element epoch. [`Propagator`] is the production implementation.
pub trait StateSource {
    fn epoch(&self) -> EpochTime;

    fn state_at_minutes(&self, minutes: Minutes) -> Result<PropagatedState, ReentryError>;
}

pub struct Propagator {
    epoch: EpochTime,
    constants: Result<sgp4::Constants, String>,
}

impl Propagator {
    /// Initialize the SGP4 model for an element set.
    ///
    /// Construction never fails: when the elements cannot seed the model, the failure is
    /// logged once and every later call reports a divergence, so that a ground track over
    /// such elements is simply empty.
    pub fn new(elements: &OrbitalElementSet) -> Self {
        let constants = wgs72_constants(&elements.to_sgp4_elements()).map_err(|e| {
            warn!(
                norad_id = elements.norad_id,
                error = %e,
                "unable to initialize SGP4 constants"
            );
            e.to_string()
        });

        Propagator {
            epoch: elements.epoch(),
            constants,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.constants.is_ok()
    }

    /// Propagate to `minutes` after the element epoch.
    ///
    /// Return
    /// ----------
    /// * The inertial state, or [`ReentryError::PropagationDivergence`] when SGP4 has no
    ///   solution at that time.
    pub fn propagate_minutes(&self, minutes: Minutes) -> Result<PropagatedState, ReentryError> {
        let diverged = |reason: String| ReentryError::PropagationDivergence { minutes, reason };

        let constants = self.constants.as_ref().map_err(|e| diverged(e.clone()))?;
        let prediction = constants
            .propagate(sgp4::MinutesSinceEpoch(minutes))
            .map_err(|e| diverged(e.to_string()))?;

        let state = PropagatedState {
            position: Vector3::from(prediction.position),
            velocity: Vector3::from(prediction.velocity),
        };

        if state.is_finite() {
            Ok(state)
        } else {
            Err(diverged("non-finite state vector".to_string()))
        }
    }

    /// Propagate to an absolute instant.
    pub fn propagate_at(&self, time: &EpochTime) -> Result<PropagatedState, ReentryError> {
        self.propagate_minutes(time.minutes_since(&self.epoch))
    }
}

/// SGP4 constants over the WGS72 geopotential.
///
/// `sgp4::Constants::from_elements` uses WGS84, which moves the Vallado reference states
/// by about 16 m.
fn wgs72_constants(elements: &sgp4::Elements) -> Result<sgp4::Constants, sgp4::ElementsError> {
    let orbit = sgp4::Orbit::from_kozai_elements(
        &sgp4::WGS72,
        elements.inclination.to_radians(),
        elements.right_ascension.to_radians(),
        elements.eccentricity,
        elements.argument_of_perigee.to_radians(),
        elements.mean_anomaly.to_radians(),
        // rev/day to rad/min
        elements.mean_motion * (std::f64::consts::PI / 720.0),
    )?;
    Ok(sgp4::Constants::new(
        sgp4::WGS72,
        sgp4::iau_epoch_to_sidereal_time,
        elements.epoch(),
        elements.drag_term,
        orbit,
    )?)
}

impl StateSource for Propagator {
    fn epoch(&self) -> EpochTime {
        self.epoch
    }

    fn state_at_minutes(&self, minutes: Minutes) -> Result<PropagatedState, ReentryError> {
        self.propagate_minutes(minutes)
    }
}

impl fmt::Debug for Propagator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Propagator")
            .field("epoch", &self.epoch)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

#[cfg(test)]
mod propagator_test {
    use super::*;
    use approx::assert_relative_eq;

    const VANGUARD_L1: &str =
        "1 00005U 58002B   00179.78495062  .00000023  00000-0  28098-4 0  4753";
    const VANGUARD_L2: &str =
        "2 00005  34.2682 348.7242 1859667 331.7664  19.3264 10.82419157413667";

    fn vanguard() -> Propagator {
        let set = OrbitalElementSet::from_tle(Some(VANGUARD_L1), Some(VANGUARD_L2)).unwrap();
        Propagator::new(&set)
    }

    #[test]
    fn test_propagate_at_epoch() {
        // Vallado et al. (2006) reference state for satellite 00005 at t = 0
        let state = vanguard().propagate_minutes(0.0).unwrap();

        assert_relative_eq!(state.position.x, 7022.46529266, epsilon = 1e-2);
        assert_relative_eq!(state.position.y, -1400.08296755, epsilon = 1e-2);
        assert_relative_eq!(state.position.z, 0.03995155, epsilon = 1e-2);
        assert_relative_eq!(state.velocity.x, 1.893841015, epsilon = 1e-5);
        assert_relative_eq!(state.velocity.y, 6.405893759, epsilon = 1e-5);
        assert_relative_eq!(state.velocity.z, 4.534807250, epsilon = 1e-5);
    }

    #[test]
    fn test_propagate_at_absolute_time() {
        let propagator = vanguard();
        let later = propagator.epoch().plus_minutes(360).unwrap();

        let by_minutes = propagator.propagate_minutes(360.0).unwrap();
        let by_time = propagator.propagate_at(&later).unwrap();
        assert_eq!(by_minutes, by_time);

        // Vallado et al. (2006), t = 360 min
        assert_relative_eq!(by_time.position.x, -7154.03120202, epsilon = 1e-2);
        assert_relative_eq!(by_time.position.y, -3783.17682504, epsilon = 1e-2);
        assert_relative_eq!(by_time.position.z, -3536.19412294, epsilon = 1e-2);
    }

    #[test]
    fn test_wgs72_reference_state() {
        // WGS84 lands 16 m off on y and 11 m off on z at epoch
        let state = vanguard().propagate_minutes(0.0).unwrap();
        assert_relative_eq!(state.position.x, 7022.46529266, epsilon = 1e-4);
        assert_relative_eq!(state.position.y, -1400.08296755, epsilon = 1e-4);
        assert_relative_eq!(state.position.z, 0.03995155, epsilon = 1e-4);
    }

    #[test]
    fn test_propagation_is_pure() {
        let propagator = vanguard();
        let first = propagator.propagate_minutes(1234.0).unwrap();
        let second = propagator.propagate_minutes(1234.0).unwrap();
        assert_eq!(first, second);
        assert!(first.radius() > 6378.0);
    }

    #[test]
    fn test_invalid_elements_diverge() {
        let mut set = OrbitalElementSet::from_tle(Some(VANGUARD_L1), Some(VANGUARD_L2)).unwrap();
        set.eccentricity = 1.5;

        let propagator = Propagator::new(&set);
        let err = propagator.propagate_minutes(10.0);
        assert!(matches!(
            err,
            Err(ReentryError::PropagationDivergence { minutes, .. }) if minutes == 10.0
        ));
    }
}
