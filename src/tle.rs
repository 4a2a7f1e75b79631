//! # Two-Line Element parser
//!
//! Fixed-width parser turning a TLE record into an [`OrbitalElementSet`], the immutable
//! orbital state consumed by the propagator.
//!
//! ## Validation
//! -----------------
//! Both lines must be present and non-empty, at least 69 columns wide, carry their line
//! number in column 1, refer to the same catalog number and end with a valid modulo-10
//! checksum (digits count their value, `-` counts one, everything else zero). Any field
//! that does not parse is reported with its name and raw text.
//!
//! ## Field Layout (0-based byte ranges)
//! -----------------
//! Line 1: `2..7` catalog number, `7` classification, `9..17` international designator,
//! `18..20` epoch year, `20..32` epoch day, `33..43` ṅ/2, `44..52` n̈/6 (implied decimal),
//! `53..61` B* (implied decimal), `62` ephemeris type, `64..68` element set number.
//!
//! Line 2: `2..7` catalog number, `8..16` inclination, `17..25` RAAN, `26..33` eccentricity
//! (implied leading decimal), `34..42` argument of perigee, `43..51` mean anomaly,
//! `52..63` mean motion, `63..68` revolution number.
use std::ops::Range;

use thiserror::Error;

use crate::{
    constants::{Degree, Minutes, MINUTES_PER_DAY, TLE_LINE_LEN},
    reentry_errors::ReentryError,
    time::{resolve_epoch_year, EpochTime},
};

/// Line-level TLE parsing errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TleError {
    #[error("TLE line {0} is missing")]
    MissingLine(u8),
    #[error("TLE line {0} contains non-ASCII characters")]
    NotAscii(u8),
    #[error("TLE line {line} is too short ({len} < 69 columns)")]
    TooShortLine { line: u8, len: usize },
    #[error("TLE line {line} starts with {found:?} instead of its line number")]
    WrongLineNumber { line: u8, found: char },
    #[error("TLE line {line} checksum mismatch: expected {expected}, computed {computed}")]
    ChecksumMismatch {
        line: u8,
        expected: u32,
        computed: u32,
    },
    #[error("TLE lines refer to different objects ({first} / {second})")]
    SatelliteNumberMismatch { first: u64, second: u64 },
    #[error("Invalid TLE field {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },
}

/// Security classification of an element set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Unclassified,
    Classified,
    Secret,
}

impl From<Classification> for sgp4::Classification {
    fn from(value: Classification) -> Self {
        match value {
            Classification::Unclassified => sgp4::Classification::Unclassified,
            Classification::Classified => sgp4::Classification::Classified,
            Classification::Secret => sgp4::Classification::Secret,
        }
    }
}

/// Mean orbital elements of one object at the TLE epoch.
///
/// Units
/// -----
/// * angles: degrees
/// * `mean_motion`: revolutions per day
/// * `mean_motion_dot`: ṅ/2 as written, rev/day²
/// * `mean_motion_ddot`: n̈/6 as written, rev/day³
/// * `drag_term`: B*, inverse Earth radii
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalElementSet {
    pub object_name: Option<String>,
    pub norad_id: u64,
    pub classification: Classification,
    pub international_designator: Option<String>,
    /// Epoch year as written on line 1 (`yy`)
    pub epoch_year: u32,
    pub epoch_day: f64,
    pub mean_motion_dot: f64,
    pub mean_motion_ddot: f64,
    pub drag_term: f64,
    pub ephemeris_type: u8,
    pub element_set_number: u64,
    pub inclination: Degree,
    pub right_ascension: Degree,
    pub eccentricity: f64,
    pub argument_of_perigee: Degree,
    pub mean_anomaly: Degree,
    pub mean_motion: f64,
    pub revolution_number: u64,
    epoch: EpochTime,
}

impl OrbitalElementSet {
    /// Parse a two-line element record.
    ///
    /// Arguments
    /// -----------------
    /// * `line1`, `line2`: the two TLE lines; `None` or blank lines are reported as
    ///   [`TleError::MissingLine`].
    ///
    /// Return
    /// ----------
    /// * The parsed element set, or [`ReentryError::MalformedTle`].
    pub fn from_tle(line1: Option<&str>, line2: Option<&str>) -> Result<Self, ReentryError> {
        let line1 = checked_line(line1, 1)?;
        let line2 = checked_line(line2, 2)?;

        let norad_1 = parse_catalog_number(field(line1, 2..7))?;
        let norad_2 = parse_catalog_number(field(line2, 2..7))?;
        if norad_1 != norad_2 {
            return Err(TleError::SatelliteNumberMismatch {
                first: norad_1,
                second: norad_2,
            }
            .into());
        }

        let classification = match &line1[7..8] {
            "U" | " " => Classification::Unclassified,
            "C" => Classification::Classified,
            "S" => Classification::Secret,
            other => return Err(invalid("classification", other).into()),
        };

        let epoch_year: u32 = parse_number("epoch year", field(line1, 18..20))?;
        let epoch_day: f64 = parse_number("epoch day", field(line1, 20..32))?;
        let epoch = EpochTime::from_tle_epoch(resolve_epoch_year(epoch_year), epoch_day)
            .map_err(|_| invalid("epoch", &line1[18..32]))?;

        let eccentricity: f64 =
            parse_number("eccentricity", &format!("0.{}", field(line2, 26..33)))?;

        Ok(OrbitalElementSet {
            object_name: None,
            norad_id: norad_1,
            classification,
            international_designator: parse_designator(field(line1, 9..17)),
            epoch_year,
            epoch_day,
            mean_motion_dot: parse_number("mean motion dot", field(line1, 33..43))?,
            mean_motion_ddot: parse_implied_exponent("mean motion ddot", field(line1, 44..52))?,
            drag_term: parse_implied_exponent("drag term", field(line1, 53..61))?,
            ephemeris_type: parse_number_or_zero("ephemeris type", field(line1, 62..63))?,
            element_set_number: parse_number_or_zero("element set number", field(line1, 64..68))?,
            inclination: parse_number("inclination", field(line2, 8..16))?,
            right_ascension: parse_number("right ascension", field(line2, 17..25))?,
            eccentricity,
            argument_of_perigee: parse_number("argument of perigee", field(line2, 34..42))?,
            mean_anomaly: parse_number("mean anomaly", field(line2, 43..51))?,
            mean_motion: parse_number("mean motion", field(line2, 52..63))?,
            revolution_number: parse_number_or_zero("revolution number", field(line2, 63..68))?,
            epoch,
        })
    }

    /// Parse a three-line record, the first line carrying the object name
    /// (optionally prefixed by `0 `).
    pub fn from_3le(name: &str, line1: &str, line2: &str) -> Result<Self, ReentryError> {
        let mut set = Self::from_tle(Some(line1), Some(line2))?;
        let name = name.trim();
        let name = name.strip_prefix("0 ").unwrap_or(name).trim();
        set.object_name = (!name.is_empty()).then(|| name.to_string());
        Ok(set)
    }

    /// Absolute UTC epoch of the element set.
    pub fn epoch(&self) -> EpochTime {
        self.epoch
    }

    /// Four-digit epoch year.
    pub fn resolved_epoch_year(&self) -> i32 {
        resolve_epoch_year(self.epoch_year)
    }

    /// Orbital period in minutes, `1440 / mean_motion`.
    pub fn period_minutes(&self) -> Minutes {
        MINUTES_PER_DAY / self.mean_motion
    }

    /// Element set in the form expected by the `sgp4` crate.
    pub fn to_sgp4_elements(&self) -> sgp4::Elements {
        sgp4::Elements {
            object_name: self.object_name.clone(),
            international_designator: self.international_designator.clone(),
            norad_id: self.norad_id,
            classification: self.classification.into(),
            datetime: self.epoch.naive_utc(),
            mean_motion_dot: self.mean_motion_dot,
            mean_motion_ddot: self.mean_motion_ddot,
            drag_term: self.drag_term,
            element_set_number: self.element_set_number,
            inclination: self.inclination,
            right_ascension: self.right_ascension,
            eccentricity: self.eccentricity,
            argument_of_perigee: self.argument_of_perigee,
            mean_anomaly: self.mean_anomaly,
            mean_motion: self.mean_motion,
            revolution_number: self.revolution_number,
            ephemeris_type: self.ephemeris_type,
        }
    }
}

/// Modulo-10 TLE checksum of the first 68 columns.
pub fn tle_checksum(line: &str) -> u32 {
    line.bytes()
        .take(TLE_LINE_LEN - 1)
        .map(|b| match b {
            b'0'..=b'9' => (b - b'0') as u32,
            b'-' => 1,
            _ => 0,
        })
        .sum::<u32>()
        % 10
}

fn checked_line(line: Option<&str>, number: u8) -> Result<&str, TleError> {
    let line = line
        .map(|l| l.trim_end())
        .filter(|l| !l.trim().is_empty())
        .ok_or(TleError::MissingLine(number))?;

    if !line.is_ascii() {
        return Err(TleError::NotAscii(number));
    }
    if line.len() < TLE_LINE_LEN {
        return Err(TleError::TooShortLine {
            line: number,
            len: line.len(),
        });
    }

    let first = line.as_bytes()[0] as char;
    if first.to_digit(10) != Some(number as u32) || line.as_bytes()[1] != b' ' {
        return Err(TleError::WrongLineNumber {
            line: number,
            found: first,
        });
    }

    let expected = (line.as_bytes()[TLE_LINE_LEN - 1] as char)
        .to_digit(10)
        .ok_or_else(|| invalid("checksum", &line[TLE_LINE_LEN - 1..TLE_LINE_LEN]))?;
    let computed = tle_checksum(line);
    if expected != computed {
        return Err(TleError::ChecksumMismatch {
            line: number,
            expected,
            computed,
        });
    }

    Ok(line)
}

fn field(line: &str, range: Range<usize>) -> &str {
    line[range].trim()
}

fn invalid(field: &'static str, value: &str) -> TleError {
    TleError::InvalidField {
        field,
        value: value.to_string(),
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, TleError> {
    raw.parse().map_err(|_| invalid(name, raw))
}

fn parse_number_or_zero<T: std::str::FromStr + Default>(
    name: &'static str,
    raw: &str,
) -> Result<T, TleError> {
    if raw.is_empty() {
        Ok(T::default())
    } else {
        parse_number(name, raw)
    }
}

/// Catalog numbers are five digits, or "Alpha-5" (a letter standing for 10..33,
/// `I` and `O` skipped, followed by four digits).
fn parse_catalog_number(raw: &str) -> Result<u64, TleError> {
    let mut chars = raw.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() && c != 'I' && c != 'O' => {
            let mut rank = (c as u8 - b'A') as u64 + 10;
            if c > 'I' {
                rank -= 1;
            }
            if c > 'O' {
                rank -= 1;
            }
            let rest: u64 = parse_number("catalog number", chars.as_str())?;
            Ok(rank * 10_000 + rest)
        }
        _ => parse_number("catalog number", raw),
    }
}

/// `-11606-4` → -0.11606e-4, ` 00000+0` → 0.0
fn parse_implied_exponent(name: &'static str, raw: &str) -> Result<f64, TleError> {
    if raw.is_empty() {
        return Ok(0.0);
    }
    if raw.len() < 3 {
        return Err(invalid(name, raw));
    }

    let (mantissa, exponent) = raw.split_at(raw.len() - 2);
    let (sign, digits) = match mantissa.as_bytes().first() {
        Some(b'-') => ("-", &mantissa[1..]),
        Some(b'+') => ("", &mantissa[1..]),
        _ => ("", mantissa),
    };
    let digits = digits.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(name, raw));
    }

    let exponent: i32 = exponent
        .trim_start_matches('+')
        .parse()
        .map_err(|_| invalid(name, raw))?;

    parse_number(name, &format!("{sign}0.{digits}e{exponent}"))
}

fn parse_designator(raw: &str) -> Option<String> {
    if raw.len() < 5 {
        return None;
    }
    let year: u32 = raw[0..2].parse().ok()?;
    Some(format!("{}-{}", resolve_epoch_year(year), &raw[2..]))
}
