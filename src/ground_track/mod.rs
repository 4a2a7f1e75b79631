//! # Ground track
//!
//! Projects an orbit onto the Earth's surface and cuts it into drawable segments.
//!
//! ## Overview
//!
//! The window starts at the TLE epoch and covers `orbits` periods (4 by default), one
//! sample per `step_minutes`. Each converged sample is turned into latitude/longitude on
//! the rotating Earth, then fed to a [`Segmenter`] which opens a new segment whenever the
//! longitude jumps by more than the configured threshold (antimeridian crossing). Samples
//! SGP4 cannot solve are skipped silently and never count as a jump.
//!
//! ## Example
//!
//! ```rust, no_run
//! use reentry::{CancelToken, OrbitalElementSet, TrackConfig};
//! use reentry::ground_track::project_ground_track;
//!
//! let elements = OrbitalElementSet::from_tle(
//!     Some("1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927"),
//!     Some("2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537"),
//! )?;
//! let track = project_ground_track(&elements, &TrackConfig::default(), &CancelToken::new());
//! for segment in &track.segments {
//!     println!("{} points", segment.len());
//! }
//! # Ok::<(), reentry::ReentryError>(())
//! ```
//!
//! ## See also
//! * [`crate::scene`]: same sampling loop, inertial output for the 3D view.
pub mod extent;
pub mod sampler;
pub mod segments;

use serde::Serialize;
use tracing::debug;

use crate::{
    config::TrackConfig,
    constants::Minutes,
    geodetic::{eci_to_geodetic, GeodeticPoint},
    propagator::{Propagator, StateSource},
    reentry_errors::ReentryError,
    tle::OrbitalElementSet,
};

pub use extent::{TrackBounds, TrackExtent};
pub use sampler::{sample_orbit, CancelToken, Sample, SampleProjector, SamplingStats};
pub use segments::{Segmenter, TrackSegment};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroundTrack {
    pub segments: Vec<TrackSegment>,
    pub stats: SamplingStats,
}

impl GroundTrack {
    /// Every drawn point, segments flattened in time order.
    pub fn points(&self) -> impl Iterator<Item = &GeodeticPoint> + Clone {
        self.segments.iter().flat_map(|s| s.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn bounds(&self) -> Option<TrackBounds> {
        TrackBounds::enclosing(self.points())
    }

    /// Framing of the 2D view.
    ///
    /// Arguments
    /// -----------------
    /// * `impact`: known impact site of the object, if any.
    /// * `config`: provides the fit padding and the fallback zoom.
    ///
    /// Return
    /// ----------
    /// * [`TrackExtent::Fit`] over every point when a segment survived, otherwise
    ///   [`TrackExtent::Fallback`] on the impact site, otherwise [`TrackExtent::World`].
    pub fn extent(&self, impact: Option<GeodeticPoint>, config: &TrackConfig) -> TrackExtent {
        match (self.bounds(), impact) {
            (Some(bounds), _) => TrackExtent::Fit {
                bounds,
                padding_px: config.fit_padding_px,
            },
            (None, Some(center)) => TrackExtent::Fallback {
                center,
                zoom: config.fallback_zoom,
            },
            (None, None) => TrackExtent::World,
        }
    }
}

/// Turns converged samples into geodetic points and segments them.
#[derive(Debug)]
pub struct GeodeticProjector {
    segmenter: Segmenter,
}

impl GeodeticProjector {
    pub fn new(config: &TrackConfig) -> Self {
        GeodeticProjector {
            segmenter: Segmenter::new(config.discontinuity_deg, config.min_segment_points),
        }
    }
}

impl SampleProjector for GeodeticProjector {
    type Output = Vec<TrackSegment>;

    fn accept(&mut self, sample: &Sample) -> Result<(), ReentryError> {
        let geo = eci_to_geodetic(&sample.state.position, sample.time.gmst());
        let point = GeodeticPoint::checked(geo.latitude_deg(), geo.longitude_deg())?;
        self.segmenter.push(point);
        Ok(())
    }

    fn finish(self) -> Vec<TrackSegment> {
        self.segmenter.finish()
    }
}

/// Ground track of an element set, propagated with SGP4.
///
/// Never fails: elements SGP4 cannot initialize give an empty track.
pub fn project_ground_track(
    elements: &OrbitalElementSet,
    config: &TrackConfig,
    cancel: &CancelToken,
) -> GroundTrack {
    let propagator = Propagator::new(elements);
    debug!(
        norad_id = elements.norad_id,
        name = elements.object_name.as_deref().unwrap_or(""),
        period_minutes = elements.period_minutes(),
        "projecting ground track"
    );
    ground_track_from_source(&propagator, elements.period_minutes(), config, cancel)
}

/// Ground track over any [`StateSource`].
pub fn ground_track_from_source<S>(
    source: &S,
    period_minutes: Minutes,
    config: &TrackConfig,
    cancel: &CancelToken,
) -> GroundTrack
where
    S: StateSource + ?Sized,
{
    let (segments, stats) = sample_orbit(
        source,
        period_minutes,
        config,
        cancel,
        GeodeticProjector::new(config),
    );
    debug!(
        attempted = stats.attempted,
        accepted = stats.accepted,
        diverged = stats.diverged,
        rejected = stats.rejected,
        segments = segments.len(),
        completed = stats.completed,
        "ground track sampled"
    );
    GroundTrack { segments, stats }
}

#[cfg(test)]
mod ground_track_test {
    use super::*;
    use crate::{propagator::PropagatedState, time::EpochTime};
    use nalgebra::Vector3;

    fn epoch() -> EpochTime {
        EpochTime::from_tle_epoch(2021, 100.25).unwrap()
    }

    struct NeverConverges;

    impl StateSource for NeverConverges {
        fn epoch(&self) -> EpochTime {
            epoch()
        }

        fn state_at_minutes(&self, minutes: Minutes) -> Result<PropagatedState, ReentryError> {
            Err(ReentryError::PropagationDivergence {
                minutes,
                reason: "decayed".into(),
            })
        }
    }

    /// Equatorial circular orbit expressed in the Earth-fixed frame: the inertial
    /// position is rotated by the sidereal angle so that the longitude advances by
    /// `deg_per_minute` from `start`.
    struct Drifting {
        start: f64,
        deg_per_minute: f64,
        diverge_at: Option<u64>,
    }

    impl StateSource for Drifting {
        fn epoch(&self) -> EpochTime {
            epoch()
        }

        fn state_at_minutes(&self, minutes: Minutes) -> Result<PropagatedState, ReentryError> {
            if self.diverge_at == Some(minutes as u64) {
                return Err(ReentryError::PropagationDivergence {
                    minutes,
                    reason: "gap".into(),
                });
            }
            let time = epoch().plus_minutes(minutes as i64).unwrap();
            let angle = (self.start + self.deg_per_minute * minutes).to_radians() + time.gmst();
            Ok(PropagatedState {
                position: Vector3::new(7000.0 * angle.cos(), 7000.0 * angle.sin(), 0.0),
                velocity: Vector3::zeros(),
            })
        }
    }

    fn short_config() -> TrackConfig {
        TrackConfig {
            orbits: 1.0,
            ..TrackConfig::default()
        }
    }

    #[test]
    fn test_never_converging_source() {
        let config = TrackConfig::default();
        let track = ground_track_from_source(&NeverConverges, 90.0, &config, &CancelToken::new());
        assert!(track.is_empty());
        assert_eq!(track.stats.attempted, 361);
        assert_eq!(track.stats.diverged, 361);

        let impact = GeodeticPoint::new(-44.0, -120.0);
        assert_eq!(
            track.extent(Some(impact), &config),
            TrackExtent::Fallback {
                center: impact,
                zoom: 3
            }
        );
        assert_eq!(track.extent(None, &config), TrackExtent::World);
    }

    #[test]
    fn test_antimeridian_crossing() {
        // 160° → 160 + 49 = 209° = −151°, crossing once
        let source = Drifting {
            start: 160.0,
            deg_per_minute: 1.0,
            diverge_at: None,
        };
        let track = ground_track_from_source(&source, 49.0, &short_config(), &CancelToken::new());
        assert_eq!(track.segments.len(), 2);
        assert_eq!(track.stats.accepted, 50);
        assert_eq!(
            track.segments.iter().map(TrackSegment::len).sum::<usize>(),
            50
        );

        for segment in &track.segments {
            assert!(segment.len() >= 2);
            for pair in segment.points().windows(2) {
                assert!((pair[1].longitude - pair[0].longitude).abs() <= 30.0);
            }
            for p in segment {
                assert!(p.latitude.abs() <= 90.0);
                assert!(p.longitude > -180.0 && p.longitude <= 180.0);
            }
        }

        match track.extent(None, &short_config()) {
            TrackExtent::Fit { bounds, padding_px } => {
                assert_eq!(padding_px, 20);
                assert!(track.points().all(|p| bounds.contains(p)));
            }
            other => panic!("unexpected extent {other:?}"),
        }
    }

    #[test]
    fn test_skipped_sample_is_not_a_discontinuity() {
        let source = Drifting {
            start: 0.0,
            deg_per_minute: 1.0,
            diverge_at: Some(10),
        };
        let track = ground_track_from_source(&source, 20.0, &short_config(), &CancelToken::new());
        assert_eq!(track.segments.len(), 1);
        assert_eq!(track.segments[0].len(), 20);
        assert_eq!(track.stats.diverged, 1);
    }

    #[test]
    fn test_projection_is_repeatable() {
        let source = Drifting {
            start: 100.0,
            deg_per_minute: 3.7,
            diverge_at: None,
        };
        let config = TrackConfig::default();
        let first = ground_track_from_source(&source, 95.0, &config, &CancelToken::new());
        let second = ground_track_from_source(&source, 95.0, &config, &CancelToken::new());
        assert_eq!(first, second);
    }

    #[test]
    fn test_cancelled_projection() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let source = Drifting {
            start: 0.0,
            deg_per_minute: 1.0,
            diverge_at: None,
        };
        let track = ground_track_from_source(&source, 90.0, &TrackConfig::default(), &cancel);
        assert!(track.is_empty());
        assert!(!track.stats.completed);
    }
}
