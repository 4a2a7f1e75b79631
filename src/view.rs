//! # View lifetime
//!
//! Each open view (2D ground track or 3D orbit) owns a [`ViewContext`]. Closing or
//! dropping the context cancels the sampling run filling it and stops its repaint task,
//! so nothing outlives the view.
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::{
    constants::{Kilometer, Radian, DPI, EARTH_MEAN_RADIUS_KM, EARTH_SPIN_PER_FRAME},
    ground_track::CancelToken,
};

/// Periodic callback running on the tokio runtime until cancelled or dropped.
#[derive(Debug)]
pub struct RepaintTask {
    handle: JoinHandle<()>,
}

impl RepaintTask {
    /// Call `frame` every `interval`, first call immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(interval: Duration, mut frame: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                frame();
            }
        });
        RepaintTask { handle }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RepaintTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Rotation of the globe in the 3D view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarthSpin {
    angle: Radian,
    per_frame: Radian,
}

impl Default for EarthSpin {
    fn default() -> Self {
        EarthSpin {
            angle: 0.0,
            per_frame: EARTH_SPIN_PER_FRAME,
        }
    }
}

impl EarthSpin {
    pub fn angle(&self) -> Radian {
        self.angle
    }

    /// Advance one frame, returns the new angle in `[0, 2π)`.
    pub fn advance(&mut self) -> Radian {
        self.angle = (self.angle + self.per_frame).rem_euclid(DPI);
        self.angle
    }

    /// Distance of the scene camera to the Earth's center.
    pub fn camera_distance() -> Kilometer {
        3.0 * EARTH_MEAN_RADIUS_KM
    }
}

/// Resources bound to one open view.
#[derive(Debug, Default)]
pub struct ViewContext {
    cancel: CancelToken,
    repaint: Option<RepaintTask>,
}

impl ViewContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token to hand to the sampling run of this view.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Bind a repaint task to the view, stopping the previous one.
    pub fn attach_repaint(&mut self, task: RepaintTask) {
        if let Some(previous) = self.repaint.replace(task) {
            previous.cancel();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn close(self) {
        drop(self);
    }
}

impl Drop for ViewContext {
    fn drop(&mut self) {
        debug!("closing view");
        self.cancel.cancel();
        if let Some(task) = self.repaint.take() {
            task.cancel();
        }
    }
}

#[cfg(test)]
mod view_test {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    #[test]
    fn test_earth_spin() {
        let mut spin = EarthSpin::default();
        assert_eq!(spin.angle(), 0.0);
        for _ in 0..100 {
            spin.advance();
        }
        approx::assert_relative_eq!(spin.angle(), 1.0, epsilon = 1e-9);
        for _ in 0..600 {
            assert!(spin.advance() < DPI);
        }
        assert_eq!(EarthSpin::camera_distance(), 19_113.0);
    }

    #[test]
    fn test_dropping_view_cancels_sampling() {
        let view = ViewContext::new();
        let token = view.cancel_token();
        assert!(!token.is_cancelled());
        view.close();
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_repaint_stops_with_view() {
        let frames = Arc::new(AtomicUsize::new(0));
        let spin = Arc::new(Mutex::new(EarthSpin::default()));

        let mut view = ViewContext::new();
        let (f, s) = (frames.clone(), spin.clone());
        view.attach_repaint(RepaintTask::spawn(Duration::from_millis(2), move || {
            f.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut spin) = s.lock() {
                spin.advance();
            }
        }));

        tokio::time::sleep(Duration::from_millis(30)).await;
        let before_close = frames.load(Ordering::SeqCst);
        assert!(before_close > 0);
        assert!(spin.lock().unwrap().angle() > 0.0);

        drop(view);
        let after_close = frames.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(frames.load(Ordering::SeqCst), after_close);
    }

    #[tokio::test]
    async fn test_cancelled_task_finishes() {
        let task = RepaintTask::spawn(Duration::from_millis(1), || {});
        task.cancel();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(task.is_finished());
    }
}
