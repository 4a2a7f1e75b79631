//! # Constants and type definitions for `reentry`
//!
//! This module centralizes the **physical constants**, **unit conversions** and **type
//! aliases** shared by the propagation, projection and catalog modules.
//!
//! ## Overview
//!
//! - Time conversions (minutes ↔ days ↔ milliseconds)
//! - Earth figure (WGS84 ellipsoid, mean radius for plan views)
//! - Defaults of the ground-track sampler
//! - Core type aliases used across the crate

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of minutes in a day
pub const MINUTES_PER_DAY: f64 = 1_440.0;

/// Number of milliseconds in a day
pub const MILLIS_PER_DAY: f64 = SECONDS_PER_DAY * 1000.0;

/// Number of milliseconds in a minute
pub const MILLIS_PER_MINUTE: i64 = 60_000;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00)
pub const T2000: f64 = 51544.5;

/// Earth equatorial radius in kilometers (WGS84)
pub const EARTH_MAJOR_AXIS_KM: f64 = 6_378.137;

/// Earth polar radius in kilometers (WGS84)
pub const EARTH_MINOR_AXIS_KM: f64 = 6_356.752_314_2;

/// Mean Earth radius in kilometers, used to turn catalog altitudes into geocentric
/// distances and to size the Earth disk of plan and scene views.
pub const EARTH_MEAN_RADIUS_KM: f64 = 6_371.0;

/// Two-digit TLE epoch years below this pivot belong to the 21st century.
pub const TLE_YEAR_PIVOT: u32 = 57;

/// Expected width of a TLE line, checksum column included.
pub const TLE_LINE_LEN: usize = 69;

// -------------------------------------------------------------------------------------------------
// Ground-track defaults
// -------------------------------------------------------------------------------------------------

/// Number of orbital periods covered by a ground track.
pub const DEFAULT_ORBITS: f64 = 4.0;

/// Longitude jump (degrees) above which a ground track is split into a new segment.
pub const DEFAULT_DISCONTINUITY_DEG: f64 = 30.0;

/// Zoom level of the fallback view centered on the impact site.
pub const DEFAULT_FALLBACK_ZOOM: u8 = 3;

/// Upper bound on the samples of one run. Four revolutions of a 0.5 rev/day orbit fit.
pub const DEFAULT_MAX_SAMPLES: usize = 12_000;

/// Earth rotation applied to the 3D scene at each repaint (radians).
pub const EARTH_SPIN_PER_FRAME: f64 = 0.01;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Minutes elapsed since the TLE epoch
pub type Minutes = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
