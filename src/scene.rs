//! # Scene space
//!
//! The 3D globe view is Y-up while the inertial frame is Z-up (polar axis). Positions are
//! carried over unscaled, in km, with no Earth-rotation correction: the polyline shows
//! the orbit in inertial space while the globe spins on its own (see [`crate::view::EarthSpin`]).
use nalgebra::{Point3, Vector3};
use serde::Serialize;

use crate::{
    constants::Kilometer,
    ground_track::{Sample, SampleProjector},
    reentry_errors::ReentryError,
};

/// Map an inertial position to scene coordinates: `(x, y, z)` → `(x, z, −y)`.
pub fn eci_to_scene(position: &Vector3<Kilometer>) -> Point3<Kilometer> {
    Point3::new(position.x, position.z, -position.y)
}

/// Orbit polyline of the 3D view, one vertex per converged sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScenePolyline {
    pub points: Vec<Point3<Kilometer>>,
}

impl ScenePolyline {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A line needs two vertices.
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2
    }
}

#[derive(Debug, Default)]
pub struct SceneProjector {
    polyline: ScenePolyline,
}

impl SampleProjector for SceneProjector {
    type Output = ScenePolyline;

    fn accept(&mut self, sample: &Sample) -> Result<(), ReentryError> {
        self.polyline.points.push(eci_to_scene(&sample.state.position));
        Ok(())
    }

    fn finish(self) -> ScenePolyline {
        self.polyline
    }
}

#[cfg(test)]
mod scene_test {
    use super::*;
    use crate::{
        config::TrackConfig,
        ground_track::{sample_orbit, CancelToken},
        propagator::{PropagatedState, StateSource},
        time::EpochTime,
    };

    #[test]
    fn test_axis_permutation() {
        let p = eci_to_scene(&Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(p, Point3::new(1.0, 3.0, -2.0));
        assert_eq!(
            eci_to_scene(&Vector3::new(-6500.0, 0.0, 120.5)),
            Point3::new(-6500.0, 120.5, -0.0)
        );
    }

    struct Lonely;

    impl StateSource for Lonely {
        fn epoch(&self) -> EpochTime {
            EpochTime::from_tle_epoch(2019, 12.0).unwrap()
        }

        fn state_at_minutes(&self, minutes: f64) -> Result<PropagatedState, ReentryError> {
            if minutes > 0.0 {
                return Err(ReentryError::PropagationDivergence {
                    minutes,
                    reason: "decayed".into(),
                });
            }
            Ok(PropagatedState {
                position: Vector3::new(6500.0, 10.0, 20.0),
                velocity: Vector3::zeros(),
            })
        }
    }

    #[test]
    fn test_single_vertex_is_not_drawable() {
        let (polyline, stats) = sample_orbit(
            &Lonely,
            90.0,
            &TrackConfig::default(),
            &CancelToken::new(),
            SceneProjector::default(),
        );
        assert_eq!(stats.accepted, 1);
        assert_eq!(polyline.points, vec![Point3::new(6500.0, 20.0, -10.0)]);
        assert!(!polyline.is_drawable());
        assert!(!ScenePolyline::default().is_drawable());
    }
}
