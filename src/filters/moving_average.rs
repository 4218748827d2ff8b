use super::SignalFilter;
use crate::utils::{mean, std_dev};
use crate::{Error, Result};
use std::collections::VecDeque;

/// Moving average over a fixed-capacity ring buffer
///
/// The oldest sample is dropped once the buffer holds `window_size` values.
#[derive(Debug, Clone)]
pub struct MovingAverageFilter {
    window_size: usize,
    buffer: VecDeque<f64>,
}

impl MovingAverageFilter {
    /// Create a filter averaging the last `window_size` samples
    ///
    /// # Errors
    ///
    /// Returns an error if `window_size` is zero
    pub fn new(window_size: usize) -> Result<Self> {
        if window_size == 0 {
            return Err(Error::FilterError("Window size must be greater than 0".to_string()));
        }
        Ok(Self {
            window_size,
            buffer: VecDeque::with_capacity(window_size),
        })
    }

    /// Append a sample, evicting the oldest when full
    pub fn push(&mut self, value: f64) {
        if self.buffer.len() >= self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);
    }

    /// Mean of the buffered samples, `None` while empty
    #[must_use]
    pub fn current(&self) -> Option<f64> {
        (!self.buffer.is_empty()).then(|| mean(&self.buffer))
    }

    /// Population standard deviation of the buffered samples
    #[must_use]
    pub fn spread(&self) -> f64 {
        std_dev(&self.buffer)
    }

    /// Number of buffered samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True when nothing has been buffered yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// True once the buffer holds a full window
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.buffer.len() >= self.window_size
    }

    /// Configured capacity
    #[must_use]
    pub fn window_size(&self) -> usize {
        self.window_size
    }
}

impl SignalFilter for MovingAverageFilter {
    fn apply(&mut self, value: f64) -> f64 {
        self.push(value);
        mean(&self.buffer)
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }

    fn name(&self) -> &str {
        "MovingAverageFilter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moving_average() {
        let mut filter = MovingAverageFilter::new(3).unwrap();

        assert_eq!(filter.apply(10.0), 10.0);
        assert_eq!(filter.apply(20.0), 15.0);
        assert_eq!(filter.apply(30.0), 20.0);

        // Window is full, oldest value should be dropped
        assert_eq!(filter.apply(40.0), 30.0);
        assert_eq!(filter.len(), 3);
    }

    #[test]
    fn test_ring_buffer_state() {
        let mut filter = MovingAverageFilter::new(2).unwrap();
        assert!(filter.is_empty());
        assert_eq!(filter.current(), None);

        filter.push(1.0);
        assert!(!filter.is_full());
        filter.push(1.0);
        assert!(filter.is_full());
        assert_eq!(filter.spread(), 0.0);

        filter.push(3.0);
        assert_eq!(filter.current(), Some(2.0));
        assert_eq!(filter.spread(), 1.0);

        filter.reset();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_zero_window_rejected() {
        assert!(MovingAverageFilter::new(0).is_err());
    }
}
