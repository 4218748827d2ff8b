//! Resting-position tracking.
//!
//! The tracker smooths a scalar derived from keypoints (for example the mean
//! hip height) and holds a separate baseline for where that scalar sits while
//! the subject rests. The baseline follows slow camera or posture drift but is
//! frozen while the subject is moving or away from the resting pose.

use crate::config::BaselineConfig;
use crate::filters::{exponential::ExponentialFilter, moving_average::MovingAverageFilter, SignalFilter};
use crate::Result;
use log::debug;

/// Smoothed reference position for one tracked quantity
#[derive(Debug, Clone)]
pub struct BaselineTracker {
    buffer: MovingAverageFilter,
    drift: ExponentialFilter,
    min_ready_samples: usize,
    stable_epsilon: f64,
    still_epsilon: f64,
    settle_tolerance: f64,
    smoothed: Option<f64>,
    previous_smoothed: Option<f64>,
    reanchor_pending: bool,
}

impl BaselineTracker {
    /// Create a tracker smoothing over `window` samples
    ///
    /// # Errors
    ///
    /// Returns an error if the window is zero or the drift weight is outside `[0, 1)`
    pub fn new(window: usize, config: &BaselineConfig) -> Result<Self> {
        Ok(Self {
            buffer: MovingAverageFilter::new(window)?,
            drift: ExponentialFilter::new(1.0 - config.drift_weight)?,
            min_ready_samples: config.min_ready_samples,
            stable_epsilon: config.stable_epsilon,
            still_epsilon: config.still_epsilon,
            settle_tolerance: config.settle_tolerance,
            smoothed: None,
            previous_smoothed: None,
            reanchor_pending: false,
        })
    }

    /// Append a sample, dropping the oldest when the buffer is full
    pub fn push(&mut self, sample: f64) {
        self.buffer.push(sample);
        if self.is_ready() {
            self.previous_smoothed = self.smoothed;
            self.smoothed = self.buffer.current();
        }
    }

    /// True once enough samples are buffered to trust the mean
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.buffer.len() >= self.min_ready_samples
    }

    /// Mean of the buffer, once ready
    #[must_use]
    pub fn smoothed(&self) -> Option<f64> {
        self.smoothed
    }

    /// Resting reference value, once initialized
    #[must_use]
    pub fn baseline(&self) -> Option<f64> {
        self.drift.current()
    }

    /// Smoothed value moved less than the stability epsilon since last frame
    #[must_use]
    pub fn is_stable(&self) -> bool {
        match (self.smoothed, self.previous_smoothed) {
            (Some(now), Some(before)) => (now - before).abs() < self.stable_epsilon,
            _ => false,
        }
    }

    /// Smoothed value moved no more than the still epsilon since last frame
    #[must_use]
    pub fn is_still(&self) -> bool {
        match (self.smoothed, self.previous_smoothed) {
            (Some(now), Some(before)) => (now - before).abs() <= self.still_epsilon,
            _ => false,
        }
    }

    /// Buffer is full, its spread is within the settle tolerance and the mean has stopped moving
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.buffer.is_full() && self.buffer.spread() <= self.settle_tolerance && self.is_still()
    }

    /// Update the baseline after a push.
    ///
    /// Initializes it on first readiness. Afterwards the baseline only moves
    /// while the caller reports the subject `at_rest` (resting phase, joint
    /// back past the release angle): a pending re-anchor is applied once the
    /// subject settles, and a stable, still subject pulls the baseline
    /// slightly towards the smoothed value whether or not a re-anchor waits.
    pub fn adapt(&mut self, at_rest: bool) {
        let Some(smoothed) = self.smoothed else {
            return;
        };

        if self.drift.current().is_none() {
            debug!("Baseline initialized at {smoothed:.4}");
            self.drift.seed(smoothed);
            return;
        }

        if !at_rest {
            return;
        }

        if self.reanchor_pending && self.is_settled() {
            debug!("Baseline re-anchored at {smoothed:.4}");
            self.drift.seed(smoothed);
            self.reanchor_pending = false;
        }

        if self.is_stable() && self.is_still() {
            self.drift.apply(smoothed);
        }
    }

    /// Replace the baseline with the resting value once the subject settles
    pub fn request_reanchor(&mut self) {
        self.reanchor_pending = true;
    }

    /// True while a re-anchor is waiting for the subject to settle
    #[must_use]
    pub fn reanchor_pending(&self) -> bool {
        self.reanchor_pending
    }

    /// Signed displacement of the smoothed value from the baseline
    #[must_use]
    pub fn displacement(&self) -> Option<f64> {
        Some(self.smoothed? - self.baseline()?)
    }

    /// Forget everything, including the baseline
    pub fn reset(&mut self) {
        self.buffer.reset();
        self.drift.reset();
        self.smoothed = None;
        self.previous_smoothed = None;
        self.reanchor_pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> BaselineTracker {
        BaselineTracker::new(5, &BaselineConfig::default()).unwrap()
    }

    #[test]
    fn test_requires_three_samples() {
        let mut t = tracker();
        t.push(0.5);
        t.adapt(true);
        t.push(0.5);
        t.adapt(true);
        assert!(!t.is_ready());
        assert_eq!(t.smoothed(), None);
        assert_eq!(t.baseline(), None);

        t.push(0.5);
        t.adapt(true);
        assert!(t.is_ready());
        assert_eq!(t.smoothed(), Some(0.5));
        assert_eq!(t.baseline(), Some(0.5));
    }

    #[test]
    fn test_drift_adaptation_when_stable_and_resting() {
        let mut t = tracker();
        for _ in 0..5 {
            t.push(0.50);
            t.adapt(true);
        }
        // Small shift: smoothed moves by 0.002, which is stable
        t.push(0.51);
        t.adapt(true);
        let smoothed = t.smoothed().unwrap();
        let expected = 0.95 * 0.50 + 0.05 * smoothed;
        assert!((t.baseline().unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_no_adaptation_away_from_rest() {
        let mut t = tracker();
        for _ in 0..5 {
            t.push(0.50);
            t.adapt(true);
        }
        t.push(0.51);
        t.adapt(false);
        assert_eq!(t.baseline(), Some(0.50));
    }

    #[test]
    fn test_no_adaptation_on_fast_motion() {
        let mut t = tracker();
        for _ in 0..5 {
            t.push(0.50);
            t.adapt(true);
        }
        // Jump of 0.25 moves the mean by 0.05, above epsilon
        t.push(0.75);
        t.adapt(true);
        assert!(!t.is_stable());
        assert_eq!(t.baseline(), Some(0.50));
    }

    #[test]
    fn test_reanchor_waits_for_settle() {
        let mut t = tracker();
        for _ in 0..5 {
            t.push(0.50);
            t.adapt(true);
        }
        t.request_reanchor();

        for sample in [0.56, 0.54, 0.52] {
            t.push(sample);
            t.adapt(true);
            assert!(t.reanchor_pending());
            assert_eq!(t.baseline(), Some(0.50));
        }

        for _ in 0..5 {
            t.push(0.52);
            t.adapt(true);
        }
        assert!(!t.reanchor_pending());
        assert!((t.baseline().unwrap() - 0.52).abs() < 0.005);
    }

    #[test]
    fn test_reanchor_waits_until_hips_stop_rising() {
        let mut t = tracker();
        for _ in 0..5 {
            t.push(0.50);
            t.adapt(true);
        }
        t.request_reanchor();

        // Steady climb back to rest: low spread, but still moving every frame
        for k in 0..15 {
            t.push(0.56 - 0.004 * f64::from(k));
            t.adapt(true);
            assert!(t.reanchor_pending(), "re-anchored mid-rise at step {k}");
            assert_eq!(t.baseline(), Some(0.50));
        }

        for _ in 0..10 {
            t.push(0.50);
            t.adapt(true);
        }
        assert!(!t.reanchor_pending());
        assert!((t.baseline().unwrap() - 0.50).abs() < 0.003);
    }

    #[test]
    fn test_drift_continues_while_reanchor_pending() {
        let mut t = tracker();
        for _ in 0..5 {
            t.push(0.50);
            t.adapt(true);
        }
        t.request_reanchor();

        // Periodic noise keeps the buffer spread above the settle tolerance,
        // while the camera drifts slowly downwards
        let noise = [0.02, -0.02, 0.01, -0.01, 0.0];
        for i in 0..100 {
            t.push(0.50 + 0.001 * f64::from(i) + noise[i as usize % noise.len()]);
            t.adapt(true);
        }

        assert!(t.reanchor_pending());
        let smoothed = t.smoothed().unwrap();
        let baseline = t.baseline().unwrap();
        assert!(smoothed > 0.59);
        assert!(smoothed - baseline < 0.03, "baseline {baseline} left behind by {smoothed}");
    }

    #[test]
    fn test_displacement_and_reset() {
        let mut t = tracker();
        for _ in 0..3 {
            t.push(0.50);
            t.adapt(true);
        }
        t.push(0.60);
        t.adapt(false);
        assert!((t.displacement().unwrap() - 0.025).abs() < 1e-12);

        t.reset();
        assert_eq!(t.displacement(), None);
        assert_eq!(t.baseline(), None);
    }
}
