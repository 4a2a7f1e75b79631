pub mod catalog;
pub mod config;
pub mod constants;
pub mod geodetic;
pub mod ground_track;
pub mod orbit_geometry;
pub mod propagator;
pub mod reentry_errors;
pub mod scene;
pub mod time;
pub mod tle;
pub mod trajectory;
pub mod view;

pub use config::TrackConfig;
pub use ground_track::{CancelToken, GroundTrack, TrackExtent, TrackSegment};
pub use reentry_errors::ReentryError;
pub use tle::OrbitalElementSet;
pub use trajectory::{OrbitView, TrackView, TrajectoryRequest};
