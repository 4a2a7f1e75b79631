//! Shared sampling loop of the 2D and 3D trajectory paths.
//!
//! [`sample_orbit`] walks the time window minute by minute from the element epoch,
//! propagates each sample through a [`StateSource`] and hands every converged state to a
//! [`SampleProjector`]. The projector decides what a sample becomes: a geodetic point
//! feeding the segmenter, or a scene-space vertex.
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use serde::Serialize;
use tracing::trace;

use crate::{
    config::TrackConfig,
    constants::Minutes,
    propagator::{PropagatedState, StateSource},
    reentry_errors::ReentryError,
    time::EpochTime,
};

/// Cooperative cancellation flag shared between a view and the loop filling it.
///
/// Clones observe the same flag. The sampling loop checks it before each sample.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// One converged propagation sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub minute: u64,
    pub time: EpochTime,
    pub state: PropagatedState,
}

/// Strategy turning converged samples into output geometry.
pub trait SampleProjector {
    type Output;

    /// Consume one sample, in time order. An error rejects the sample only.
    fn accept(&mut self, sample: &Sample) -> Result<(), ReentryError>;

    fn finish(self) -> Self::Output;
}

/// Bookkeeping of one sampling run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SamplingStats {
    /// Samples attempted, converged or not
    pub attempted: usize,
    /// Samples handed over to the projector and kept
    pub accepted: usize,
    /// Samples SGP4 could not solve
    pub diverged: usize,
    /// Converged samples the projector refused (invalid geodetic values)
    pub rejected: usize,
    /// `false` when the run was cancelled before the end of the window
    pub completed: bool,
}

/// Sample minutes of a window covering `config.orbits` periods: `0, step, 2·step, …`
/// up to and including the end of the window, at most `config.max_samples` of them.
///
/// A non-finite or negative span yields no sample.
pub fn sample_minutes(period_minutes: Minutes, config: &TrackConfig) -> impl Iterator<Item = u64> {
    let span = config.orbits * period_minutes;
    let step = config.step_minutes.max(1) as u64;
    let last = if span.is_finite() && span >= 0.0 {
        Some(span.floor() as u64)
    } else {
        None
    };

    last.into_iter()
        .flat_map(move |last| (0..=last).step_by(step as usize))
        .take(config.max_samples)
}

/// Run the sampling loop.
///
/// Arguments
/// -----------------
/// * `source`: propagation backend, anchored at its own epoch.
/// * `period_minutes`: orbital period used to size the window.
/// * `config`: window length and step.
/// * `cancel`: checked before each sample; a cancelled run stops early.
/// * `projector`: output strategy.
///
/// Return
/// ----------
/// * The projector output together with the [`SamplingStats`] of the run.
pub fn sample_orbit<S, P>(
    source: &S,
    period_minutes: Minutes,
    config: &TrackConfig,
    cancel: &CancelToken,
    mut projector: P,
) -> (P::Output, SamplingStats)
where
    S: StateSource + ?Sized,
    P: SampleProjector,
{
    let epoch = source.epoch();
    let mut stats = SamplingStats {
        completed: true,
        ..SamplingStats::default()
    };

    for minute in sample_minutes(period_minutes, config) {
        if cancel.is_cancelled() {
            stats.completed = false;
            break;
        }
        stats.attempted += 1;

        let Some(time) = epoch.plus_minutes(minute as i64) else {
            stats.diverged += 1;
            continue;
        };

        let state = match source.state_at_minutes(minute as f64) {
            Ok(state) => state,
            Err(err) => {
                trace!(minute, %err, "skipping sample");
                stats.diverged += 1;
                continue;
            }
        };

        match projector.accept(&Sample {
            minute,
            time,
            state,
        }) {
            Ok(()) => stats.accepted += 1,
            Err(err) => {
                trace!(minute, %err, "rejecting sample");
                stats.rejected += 1;
            }
        }
    }

    (projector.finish(), stats)
}
