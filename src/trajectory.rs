//! # Trajectory requests
//!
//! Entry point of the trajectory views. A [`TrajectoryRequest`] carries what a catalog
//! entry knows about an object (TLE lines, name, impact site, TLE age, catalog orbit
//! altitudes) and builds:
//!
//! * [`TrackView`]: ground-track segments and map framing of the 2D view,
//! * [`OrbitView`]: inertial polyline of the 3D view,
//! * the [`OrbitPlan`] of the plan view.
//!
//! A missing TLE line is the only failure reported to the caller; every per-sample
//! problem ends up in [`SamplingStats`].
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    catalog::DebrisRecord,
    config::TrackConfig,
    constants::Kilometer,
    geodetic::GeodeticPoint,
    ground_track::{
        project_ground_track, sample_orbit, CancelToken, SamplingStats, TrackExtent, TrackSegment,
    },
    orbit_geometry::OrbitPlan,
    propagator::Propagator,
    reentry_errors::ReentryError,
    scene::{ScenePolyline, SceneProjector},
    tle::OrbitalElementSet,
    view::EarthSpin,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrajectoryRequest {
    pub name: Option<String>,
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub impact: Option<GeodeticPoint>,
    pub tle_age_hours: Option<f64>,
    /// Semi-major axis, km
    pub semi_major_axis: Option<Kilometer>,
    /// Apogee altitude, km
    pub apogee: Option<Kilometer>,
    /// Perigee altitude, km
    pub perigee: Option<Kilometer>,
}

/// Content of the 2D ground-track view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackView {
    pub name: Option<String>,
    pub segments: Vec<TrackSegment>,
    pub extent: TrackExtent,
    pub stats: SamplingStats,
    /// Hours between the last TLE and the reentry, shown as a warning when known.
    pub tle_age_hours: Option<f64>,
}

/// Content of the 3D orbit view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrbitView {
    pub name: Option<String>,
    pub polyline: ScenePolyline,
    pub stats: SamplingStats,
    pub tle_age_hours: Option<f64>,
    pub camera_distance: Kilometer,
}

impl TrajectoryRequest {
    pub fn new(
        name: Option<&str>,
        line1: Option<&str>,
        line2: Option<&str>,
        impact: Option<GeodeticPoint>,
    ) -> Self {
        TrajectoryRequest {
            name: name.map(str::to_string),
            line1: line1.map(str::to_string),
            line2: line2.map(str::to_string),
            impact,
            ..TrajectoryRequest::default()
        }
    }

    pub fn from_record(record: &DebrisRecord) -> Self {
        TrajectoryRequest {
            name: record.name.clone(),
            line1: record.tle1.clone(),
            line2: record.tle2.clone(),
            impact: record.impact_site(),
            tle_age_hours: record.tle_age_hours(),
            semi_major_axis: record.semi_major_axis,
            apogee: record.apogee,
            perigee: record.perigee,
        }
    }

    /// Parse the TLE lines, the request name overriding any name in the element set.
    pub fn elements(&self) -> Result<OrbitalElementSet, ReentryError> {
        let mut elements =
            OrbitalElementSet::from_tle(self.line1.as_deref(), self.line2.as_deref())?;
        if self.name.is_some() {
            elements.object_name = self.name.clone();
        }
        Ok(elements)
    }

    pub fn track_view(
        &self,
        config: &TrackConfig,
        cancel: &CancelToken,
    ) -> Result<TrackView, ReentryError> {
        let elements = self.elements()?;
        let track = project_ground_track(&elements, config, cancel);
        let extent = track.extent(self.impact, config);

        if track.is_empty() {
            info!(
                name = self.name.as_deref().unwrap_or(""),
                "no drawable ground track, centering on the impact site"
            );
        }

        Ok(TrackView {
            name: elements.object_name,
            segments: track.segments,
            extent,
            stats: track.stats,
            tle_age_hours: self.tle_age_hours,
        })
    }

    pub fn orbit_view(
        &self,
        config: &TrackConfig,
        cancel: &CancelToken,
    ) -> Result<OrbitView, ReentryError> {
        let elements = self.elements()?;
        let propagator = Propagator::new(&elements);
        let (polyline, stats) = sample_orbit(
            &propagator,
            elements.period_minutes(),
            config,
            cancel,
            SceneProjector::default(),
        );
        debug!(
            norad_id = elements.norad_id,
            vertices = polyline.len(),
            drawable = polyline.is_drawable(),
            "orbit polyline sampled"
        );

        Ok(OrbitView {
            name: elements.object_name,
            polyline,
            stats,
            tle_age_hours: self.tle_age_hours,
            camera_distance: EarthSpin::camera_distance(),
        })
    }

    /// Plan view of the orbit from the catalog altitudes.
    ///
    /// Return
    /// ----------
    /// * `Ok(None)` when the catalog values are insufficient, an error when the TLE is
    ///   missing or malformed.
    pub fn orbit_plan(&self) -> Result<Option<OrbitPlan>, ReentryError> {
        self.elements()?;
        Ok(OrbitPlan::from_catalog_altitudes(
            self.semi_major_axis,
            self.apogee,
            self.perigee,
        ))
    }
}

#[cfg(test)]
mod trajectory_test {
    use super::*;
    use crate::tle::TleError;

    const LINE1: &str = "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
    const LINE2: &str = "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    #[test]
    fn test_missing_tle() {
        let request = TrajectoryRequest::new(Some("X"), Some(LINE1), None, None);
        let err = request
            .track_view(&TrackConfig::default(), &CancelToken::new())
            .unwrap_err();
        assert_eq!(err, ReentryError::MalformedTle(TleError::MissingLine(2)));
        assert!(err.is_missing_orbital_data());
        assert!(request.orbit_plan().is_err());
    }

    #[test]
    fn test_request_from_record() {
        let record: DebrisRecord = serde_json::from_str(&format!(
            r#"{{"nombre": "ISS", "tle1": "{LINE1}", "tle2": "{LINE2}",
                 "lugar_caida": {{"lat": 1, "lon": 2}}, "dias_diferencia": 2,
                 "a": 6771, "apogeo": 410, "perigeo": 390}}"#
        ))
        .unwrap();
        let request = TrajectoryRequest::from_record(&record);
        assert_eq!(request.impact, Some(GeodeticPoint::new(1.0, 2.0)));
        assert_eq!(request.tle_age_hours, Some(48.0));

        let elements = request.elements().unwrap();
        assert_eq!(elements.object_name.as_deref(), Some("ISS"));
        assert_eq!(elements.norad_id, 25544);

        let plan = request.orbit_plan().unwrap().unwrap();
        approx::assert_relative_eq!(plan.eccentricity, 20.0 / 13542.0, epsilon = 1e-12);
    }

    #[test]
    fn test_orbit_plan_without_catalog_values() {
        let request = TrajectoryRequest::new(None, Some(LINE1), Some(LINE2), None);
        assert_eq!(request.orbit_plan().unwrap(), None);
    }
}
