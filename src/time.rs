//! # TLE epochs and sidereal time
//!
//! A TLE stamps its elements with a two-digit year and a fractional day of year.
//! [`EpochTime`] resolves that pair into an absolute UTC instant with millisecond
//! resolution, and [`gmst`] gives the Earth rotation angle needed to bring an inertial
//! position back onto the rotating Earth.
//!
//! ## Conventions
//! -----------------
//! - Two-digit years `< 57` map to `2000 + yy`, others to `1900 + yy`.
//! - `epoch = UTC(year, Jan 1, 00:00:00) + (day − 1)` days, the fraction truncated to whole
//!   milliseconds. Leap seconds are not counted, the way a millisecond UTC clock counts.
//! - Sidereal time is computed from the UTC Modified Julian Date, UT1 being approximated
//!   by UTC.
use std::fmt;

use hifitime::Epoch;
use sgp4::chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

use crate::constants::{Minutes, Radian, DPI, MILLIS_PER_DAY, MILLIS_PER_MINUTE, MJD, T2000};
use crate::{constants::TLE_YEAR_PIVOT, reentry_errors::ReentryError};

/// Resolve a two-digit TLE epoch year into a four-digit year.
///
/// Arguments
/// ---------
/// * `two_digit_year`: the `yy` field of TLE line 1 (`0..=99`).
///
/// Return
/// ------
/// * `2000 + yy` when `yy < 57`, `1900 + yy` otherwise.
pub fn resolve_epoch_year(two_digit_year: u32) -> i32 {
    if two_digit_year < TLE_YEAR_PIVOT {
        2000 + two_digit_year as i32
    } else {
        1900 + two_digit_year as i32
    }
}

/// Absolute UTC instant with millisecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EpochTime(NaiveDateTime);

impl EpochTime {
    /// Build the instant designated by a TLE epoch.
    ///
    /// Arguments
    /// ---------
    /// * `year`: resolved four-digit year (see [`resolve_epoch_year`]).
    /// * `day_of_year`: fractional day of year, `1.0` being January 1st at 00:00 UTC.
    ///
    /// Return
    /// ------
    /// * The epoch instant, or [`ReentryError::InvalidEpoch`] if the day is not a finite
    ///   value in `[0, 367)` or the date cannot be represented.
    pub fn from_tle_epoch(year: i32, day_of_year: f64) -> Result<Self, ReentryError> {
        if !day_of_year.is_finite() || !(0.0..367.0).contains(&day_of_year) {
            return Err(ReentryError::InvalidEpoch(format!(
                "day of year {day_of_year} out of range"
            )));
        }

        let jan_first = NaiveDate::from_ymd_opt(year, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| ReentryError::InvalidEpoch(format!("year {year} out of range")))?;

        let offset_ms = ((day_of_year - 1.0) * MILLIS_PER_DAY).trunc() as i64;
        EpochTime(jan_first)
            .plus_millis(offset_ms)
            .ok_or_else(|| ReentryError::InvalidEpoch(format!("{year} day {day_of_year}")))
    }

    pub fn from_naive_utc(datetime: NaiveDateTime) -> Self {
        EpochTime(datetime)
    }

    pub fn naive_utc(&self) -> NaiveDateTime {
        self.0
    }

    /// Shift the instant by a signed number of milliseconds, `None` on overflow.
    pub fn plus_millis(&self, millis: i64) -> Option<Self> {
        self.0
            .checked_add_signed(Duration::milliseconds(millis))
            .map(EpochTime)
    }

    /// Shift the instant by whole minutes, as the ground-track sampler does.
    pub fn plus_minutes(&self, minutes: i64) -> Option<Self> {
        minutes
            .checked_mul(MILLIS_PER_MINUTE)
            .and_then(|ms| self.plus_millis(ms))
    }

    /// Minutes elapsed from `origin` to `self` (negative when `self` is earlier).
    pub fn minutes_since(&self, origin: &EpochTime) -> Minutes {
        (self.0 - origin.0).num_milliseconds() as f64 / MILLIS_PER_MINUTE as f64
    }

    pub fn unix_millis(&self) -> i64 {
        self.0.and_utc().timestamp_millis()
    }

    /// Convert into a [`hifitime::Epoch`] on the UTC time scale.
    pub fn to_hifitime(&self) -> Epoch {
        let dt = self.0;
        Epoch::from_gregorian_utc(
            dt.year(),
            dt.month() as u8,
            dt.day() as u8,
            dt.hour() as u8,
            dt.minute() as u8,
            dt.second() as u8,
            dt.nanosecond(),
        )
    }

    /// Modified Julian Date of the instant, UTC time scale.
    pub fn mjd_utc(&self) -> MJD {
        self.to_hifitime().to_mjd_utc_days()
    }

    /// Greenwich Mean Sidereal Time of the instant, in radians.
    pub fn gmst(&self) -> Radian {
        gmst(self.mjd_utc())
    }
}

impl fmt::Display for EpochTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Z", self.0.format("%Y-%m-%dT%H:%M:%S%.3f"))
    }
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Modified Julian Date.
///
/// IAU 1982 polynomial for the mean sidereal time at 0h, plus the rotation accumulated
/// during the fraction of the day.
///
/// # Arguments
/// * `tjm` - Modified Julian Date (UT1, approximated here by UTC)
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
pub fn gmst(tjm: f64) -> Radian {
    // GMST at 0h, seconds
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // sidereal / solar day ratio
    const RAP: f64 = 1.00273790934;

    let itjm = tjm.floor();
    let t = (itjm - T2000) / 36525.0;

    let gmst0 = (((C3 * t + C2) * t + C1) * t + C0) * DPI / 86400.0;

    let h = tjm.fract() * DPI;
    (gmst0 + h * RAP).rem_euclid(DPI)
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_resolve_epoch_year_pivot() {
        assert_eq!(resolve_epoch_year(56), 2056);
        assert_eq!(resolve_epoch_year(57), 1957);
        assert_eq!(resolve_epoch_year(0), 2000);
        assert_eq!(resolve_epoch_year(99), 1999);
        assert_eq!(resolve_epoch_year(8), 2008);
    }

    #[test]
    fn test_epoch_from_tle() {
        let epoch = EpochTime::from_tle_epoch(2008, 264.51782528).unwrap();
        assert_eq!(epoch.to_string(), "2008-09-20T12:25:40.104Z");

        let jan_first = EpochTime::from_tle_epoch(2024, 1.0).unwrap();
        assert_eq!(jan_first.to_string(), "2024-01-01T00:00:00.000Z");
        assert_eq!(jan_first.unix_millis(), 1_704_067_200_000);
    }

    #[test]
    fn test_epoch_rejects_bad_day() {
        assert!(EpochTime::from_tle_epoch(2008, f64::NAN).is_err());
        assert!(EpochTime::from_tle_epoch(2008, 400.0).is_err());
        assert!(EpochTime::from_tle_epoch(2008, -1.0).is_err());
    }

    #[test]
    fn test_minute_arithmetic() {
        let epoch = EpochTime::from_tle_epoch(2020, 100.25).unwrap();
        let later = epoch.plus_minutes(90).unwrap();
        assert_eq!(later.minutes_since(&epoch), 90.0);
        assert_eq!(epoch.minutes_since(&later), -90.0);
        assert_eq!(later.unix_millis() - epoch.unix_millis(), 90 * 60_000);
    }

    #[test]
    fn test_gmst() {
        let tut = 57028.478514610404;
        assert_relative_eq!(gmst(tut), 4.851925725092499, epsilon = 1e-12);

        assert_relative_eq!(gmst(T2000), 4.894961212789145, epsilon = 1e-12);
    }

    #[test]
    fn test_epoch_gmst_matches_mjd() {
        let noon = EpochTime::from_tle_epoch(2000, 1.5).unwrap();
        assert_relative_eq!(noon.mjd_utc(), T2000, epsilon = 1e-9);
        assert_relative_eq!(noon.gmst(), 4.894961212789145, epsilon = 1e-6);
    }
}
