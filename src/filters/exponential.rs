use super::SignalFilter;
use crate::{Error, Result};

/// Exponential smoothing filter
///
/// Each output is `alpha * input + (1 - alpha) * previous`. The baseline
/// tracker drives one of these with the drift-adaptation rate.
#[derive(Debug, Clone)]
pub struct ExponentialFilter {
    alpha: f64,
    last: Option<f64>,
}

impl ExponentialFilter {
    /// # Errors
    ///
    /// Returns an error unless `alpha` is in `(0, 1]`
    pub fn new(alpha: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(Error::FilterError(format!("Alpha must be in (0, 1], got {alpha}")));
        }
        Ok(Self { alpha, last: None })
    }

    /// Force the state to `value`, as if it had been the last output
    pub fn seed(&mut self, value: f64) {
        self.last = Some(value);
    }

    /// Last output, if any sample was seen
    #[must_use]
    pub fn current(&self) -> Option<f64> {
        self.last
    }
}

impl SignalFilter for ExponentialFilter {
    fn apply(&mut self, value: f64) -> f64 {
        let filtered = match self.last {
            Some(last) => last + self.alpha * (value - last),
            None => value,
        };
        self.last = Some(filtered);
        filtered
    }

    fn reset(&mut self) {
        self.last = None;
    }

    fn name(&self) -> &str {
        "ExponentialFilter"
    }
}
