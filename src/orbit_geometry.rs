//! # Orbit plan view
//!
//! Eccentricity from catalog distances and the 2D layout of the orbit ellipse seen from
//! above the orbital plane, Earth at one focus.
use serde::Serialize;

use crate::constants::{Kilometer, EARTH_MEAN_RADIUS_KM};

/// Hit radius of the perigee/apogee markers, pixels.
const MARKER_HIT_RADIUS_PX: f64 = 9.0;

/// Eccentricity from apogee and perigee distances.
///
/// Arguments
/// -----------------
/// * `semi_major_axis`: km, only required to be present.
/// * `apogee`, `perigee`: geocentric distances, km.
///
/// Return
/// ----------
/// * `(apogee − perigee) / (apogee + perigee)`, or `None` when a value is missing or the
///   ratio is not finite. Missing data is not an error.
pub fn eccentricity(
    semi_major_axis: Option<Kilometer>,
    apogee: Option<Kilometer>,
    perigee: Option<Kilometer>,
) -> Option<f64> {
    let (_, apogee, perigee) = (semi_major_axis?, apogee?, perigee?);
    let e = (apogee - perigee) / (apogee + perigee);
    e.is_finite().then_some(e)
}

/// Orbit ellipse of the plan view.
///
/// Units:
/// * `semi_major_axis`, `semi_minor_axis`, `focal_offset`: km
/// * `eccentricity`: unitless, in `[0, 1)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitPlan {
    pub semi_major_axis: Kilometer,
    pub eccentricity: f64,
    pub semi_minor_axis: Kilometer,
    pub focal_offset: Kilometer,
}

impl OrbitPlan {
    /// `None` unless `a > 0` and `0 ≤ e < 1`.
    pub fn new(semi_major_axis: Kilometer, eccentricity: f64) -> Option<Self> {
        if !(semi_major_axis > 0.0 && (0.0..1.0).contains(&eccentricity)) {
            return None;
        }
        Some(OrbitPlan {
            semi_major_axis,
            eccentricity,
            semi_minor_axis: semi_major_axis * (1.0 - eccentricity * eccentricity).sqrt(),
            focal_offset: semi_major_axis * eccentricity,
        })
    }

    /// Build from catalog values, where apogee and perigee are altitudes above the mean
    /// Earth radius.
    pub fn from_catalog_altitudes(
        semi_major_axis: Option<Kilometer>,
        apogee_altitude: Option<Kilometer>,
        perigee_altitude: Option<Kilometer>,
    ) -> Option<Self> {
        let e = eccentricity(
            semi_major_axis,
            apogee_altitude.map(|h| h + EARTH_MEAN_RADIUS_KM),
            perigee_altitude.map(|h| h + EARTH_MEAN_RADIUS_KM),
        )?;
        OrbitPlan::new(semi_major_axis?, e)
    }

    pub fn perigee_distance(&self) -> Kilometer {
        self.semi_major_axis - self.focal_offset
    }

    pub fn apogee_distance(&self) -> Kilometer {
        self.semi_major_axis + self.focal_offset
    }

    /// Fit the ellipse into a `width × height` canvas keeping `margin` pixels free on
    /// every side. The ellipse is centered, its major axis horizontal, the occupied
    /// focus on the right.
    pub fn layout(&self, width: f64, height: f64, margin: f64) -> CanvasLayout {
        let scale_x = (width - 2.0 * margin) / (2.0 * self.semi_major_axis);
        let scale_y = (height - 2.0 * margin) / (2.0 * self.semi_minor_axis);
        let scale = scale_x.min(scale_y);

        let center = (width / 2.0, height / 2.0);
        let focus_x = center.0 + self.focal_offset * scale;

        CanvasLayout {
            scale,
            center,
            radii: (self.semi_major_axis * scale, self.semi_minor_axis * scale),
            focus: (focus_x, center.1),
            perigee: (focus_x + self.perigee_distance() * scale, center.1),
            apogee: (focus_x - self.apogee_distance() * scale, center.1),
            earth_radius_px: EARTH_MEAN_RADIUS_KM * scale,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlanMarker {
    Perigee,
    Apogee,
}

/// Pixel geometry of a plan view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasLayout {
    /// Pixels per km.
    pub scale: f64,
    pub center: (f64, f64),
    /// Horizontal and vertical ellipse radii.
    pub radii: (f64, f64),
    /// Earth's center.
    pub focus: (f64, f64),
    pub perigee: (f64, f64),
    pub apogee: (f64, f64),
    pub earth_radius_px: f64,
}

impl CanvasLayout {
    /// Marker under the pointer, perigee first.
    pub fn marker_at(&self, x: f64, y: f64) -> Option<PlanMarker> {
        let hit = |(mx, my): (f64, f64)| (x - mx).hypot(y - my) < MARKER_HIT_RADIUS_PX;
        if hit(self.perigee) {
            Some(PlanMarker::Perigee)
        } else if hit(self.apogee) {
            Some(PlanMarker::Apogee)
        } else {
            None
        }
    }
}
