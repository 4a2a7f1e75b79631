use thiserror::Error;

use crate::constants::{Degree, Minutes};
use crate::tle::TleError;

#[derive(Error, Debug)]
pub enum ReentryError {
    #[error("Malformed TLE: {0}")]
    MalformedTle(TleError),

    #[error("SGP4 propagation did not converge at t = {minutes} min: {reason}")]
    PropagationDivergence { minutes: Minutes, reason: String },

    #[error("Invalid geodetic sample (lat = {latitude}, lon = {longitude})")]
    InvalidGeodeticSample {
        latitude: Degree,
        longitude: Degree,
    },

    #[error("Invalid TLE epoch: {0}")]
    InvalidEpoch(String),

    #[error("Unable to decode JSON input: {0}")]
    JsonDecode(#[from] serde_json::Error),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid track configuration: {0}")]
    InvalidConfig(String),
}

impl ReentryError {
    /// `true` when the failure means the record simply carries no orbital data,
    /// which the user-facing layer reports as "no orbital data available".
    pub fn is_missing_orbital_data(&self) -> bool {
        matches!(self, ReentryError::MalformedTle(TleError::MissingLine(_)))
    }
}

impl From<TleError> for ReentryError {
    fn from(err: TleError) -> Self {
        ReentryError::MalformedTle(err)
    }
}

impl PartialEq for ReentryError {
    fn eq(&self, other: &Self) -> bool {
        use ReentryError::*;
        match (self, other) {
            (MalformedTle(a), MalformedTle(b)) => a == b,
            (
                PropagationDivergence {
                    minutes: m1,
                    reason: r1,
                },
                PropagationDivergence {
                    minutes: m2,
                    reason: r2,
                },
            ) => m1 == m2 && r1 == r2,
            (
                InvalidGeodeticSample {
                    latitude: la1,
                    longitude: lo1,
                },
                InvalidGeodeticSample {
                    latitude: la2,
                    longitude: lo2,
                },
            ) => la1 == la2 && lo1 == lo2,
            (InvalidEpoch(a), InvalidEpoch(b)) => a == b,
            (InvalidConfig(a), InvalidConfig(b)) => a == b,

            // not comparable: equal when the variant matches
            (JsonDecode(_), JsonDecode(_)) => true,
            (IoError(_), IoError(_)) => true,

            _ => false,
        }
    }
}
