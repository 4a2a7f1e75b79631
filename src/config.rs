//! # Track configuration
//!
//! [`TrackConfig`] gathers the tunables of the sampling loop and of the view extent.
//! Defaults reproduce the reference behaviour (4 orbits, one sample per minute, 30° split
//! threshold); a configuration can also be read from JSON, missing keys falling back to
//! their defaults.
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        Degree, DEFAULT_DISCONTINUITY_DEG, DEFAULT_FALLBACK_ZOOM, DEFAULT_MAX_SAMPLES,
        DEFAULT_ORBITS,
    },
    reentry_errors::ReentryError,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    /// Number of orbital periods covered from the TLE epoch.
    pub orbits: f64,
    /// Minutes between two samples.
    pub step_minutes: u32,
    /// The window is cut after this many samples.
    pub max_samples: usize,
    /// Longitude jump above which a new segment starts.
    pub discontinuity_deg: Degree,
    /// Segments with fewer points are discarded.
    pub min_segment_points: usize,
    /// Zoom of the view centered on the impact site when no segment survives.
    pub fallback_zoom: u8,
    /// Padding (pixels) around the fitted trajectory bounds.
    pub fit_padding_px: u32,
}

impl Default for TrackConfig {
    fn default() -> Self {
        TrackConfig {
            orbits: DEFAULT_ORBITS,
            step_minutes: 1,
            max_samples: DEFAULT_MAX_SAMPLES,
            discontinuity_deg: DEFAULT_DISCONTINUITY_DEG,
            min_segment_points: 2,
            fallback_zoom: DEFAULT_FALLBACK_ZOOM,
            fit_padding_px: 20,
        }
    }
}

impl TrackConfig {
    /// Read a configuration from JSON and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ReentryError> {
        let config: TrackConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the sampler can run with these values.
    pub fn validate(&self) -> Result<(), ReentryError> {
        if !self.orbits.is_finite() || self.orbits <= 0.0 {
            return Err(ReentryError::InvalidConfig(format!(
                "orbits must be positive, got {}",
                self.orbits
            )));
        }
        if self.step_minutes == 0 {
            return Err(ReentryError::InvalidConfig("step_minutes must be at least 1".into()));
        }
        if self.max_samples == 0 {
            return Err(ReentryError::InvalidConfig("max_samples must be at least 1".into()));
        }
        if !(self.discontinuity_deg > 0.0 && self.discontinuity_deg <= 360.0) {
            return Err(ReentryError::InvalidConfig(format!(
                "discontinuity_deg must lie in (0, 360], got {}",
                self.discontinuity_deg
            )));
        }
        if self.min_segment_points < 2 {
            return Err(ReentryError::InvalidConfig("a segment needs at least 2 points".into()));
        }
        Ok(())
    }
}
