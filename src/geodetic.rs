//! # Inertial → geodetic conversion
//!
//! Converts an inertial position into latitude/longitude on the rotating Earth (WGS84
//! ellipsoid), once the sidereal angle of the sample instant is known.
//!
//! The longitude is the inertial right ascension minus the Greenwich sidereal angle; the
//! geodetic latitude is obtained by fixed-point iteration on the ellipsoid normal.
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{Degree, Kilometer, Radian, EARTH_MAJOR_AXIS_KM, EARTH_MINOR_AXIS_KM};
use crate::reentry_errors::ReentryError;

const LATITUDE_ITERATIONS: usize = 20;

/// Point on the Earth's surface, degrees.
///
/// Points emitted by the ground-track projector always satisfy `|latitude| ≤ 90` and
/// `longitude ∈ (−180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodeticPoint {
    pub latitude: Degree,
    pub longitude: Degree,
}

impl GeodeticPoint {
    pub fn new(latitude: Degree, longitude: Degree) -> Self {
        GeodeticPoint {
            latitude,
            longitude,
        }
    }

    /// Validate a raw sample and normalize its longitude.
    ///
    /// Return
    /// ----------
    /// * The point with its longitude in `(−180, 180]`, or
    ///   [`ReentryError::InvalidGeodeticSample`] when a coordinate is not finite or the
    ///   latitude exceeds 90° in magnitude. Invalid samples are dropped, never clamped.
    pub fn checked(latitude: Degree, longitude: Degree) -> Result<Self, ReentryError> {
        if !latitude.is_finite() || !longitude.is_finite() || latitude.abs() > 90.0 {
            return Err(ReentryError::InvalidGeodeticSample {
                latitude,
                longitude,
            });
        }
        Ok(GeodeticPoint::new(latitude, normalize_longitude(longitude)))
    }
}

/// Geodetic coordinates with ellipsoidal height, as produced by [`eci_to_geodetic`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodetic {
    pub latitude: Radian,
    pub longitude: Radian,
    pub height: Kilometer,
}

impl Geodetic {
    pub fn latitude_deg(&self) -> Degree {
        self.latitude.to_degrees()
    }

    pub fn longitude_deg(&self) -> Degree {
        self.longitude.to_degrees()
    }
}

/// Wrap a longitude into `(−180, 180]`.
pub fn normalize_longitude(longitude: Degree) -> Degree {
    let wrapped = (longitude + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Convert an inertial position to geodetic coordinates.
///
/// Arguments
/// -----------------
/// * `position`: ECI position in km.
/// * `gmst`: Greenwich Mean Sidereal Time of the sample instant, radians.
///
/// Return
/// ----------
/// * Latitude and longitude in radians (longitude in `[−π, π]`), height in km above the
///   WGS84 ellipsoid. Degenerate inputs propagate as NaN; callers validate with
///   [`GeodeticPoint::checked`].
pub fn eci_to_geodetic(position: &Vector3<Kilometer>, gmst: Radian) -> Geodetic {
    let a = EARTH_MAJOR_AXIS_KM;
    let f = (EARTH_MAJOR_AXIS_KM - EARTH_MINOR_AXIS_KM) / EARTH_MAJOR_AXIS_KM;
    let e2 = 2.0 * f - f * f;

    let r = position.x.hypot(position.y);

    let mut longitude = position.y.atan2(position.x) - gmst;
    longitude = (longitude + std::f64::consts::PI).rem_euclid(2.0 * std::f64::consts::PI)
        - std::f64::consts::PI;

    let mut latitude = position.z.atan2(r);
    let mut c = 1.0;
    for _ in 0..LATITUDE_ITERATIONS {
        let sin_lat = latitude.sin();
        c = 1.0 / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        latitude = (position.z + a * c * e2 * sin_lat).atan2(r);
    }

    Geodetic {
        latitude,
        longitude,
        height: r / latitude.cos() - a * c,
    }
}
