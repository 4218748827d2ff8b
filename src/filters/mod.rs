//! Signal filtering algorithms for smoothing per-frame measurements.
//!
//! Joint angles and tracked positions jitter from frame to frame. Every value
//! compared against a counting threshold passes through one of these filters
//! first.

/// Moving average filter backed by a fixed-capacity ring buffer
pub mod moving_average;

/// Median filter for outlier rejection
pub mod median;

/// Exponential filter for responsive smoothing
pub mod exponential;

use crate::utils::safe_cast::f64_to_window;
use crate::{Error, Result};

/// Trait for all scalar smoothing filters
pub trait SignalFilter: Send + Sync {
    /// Feed one sample and return the smoothed value
    fn apply(&mut self, value: f64) -> f64;

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes through values unchanged
pub struct NoFilter;

impl SignalFilter for NoFilter {
    fn apply(&mut self, value: f64) -> f64 {
        value
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Create a filter from a `name[:param]` specification.
///
/// `default_window` is used by windowed filters when no parameter is given.
///
/// # Errors
///
/// Returns [`Error::FilterError`] for unknown names or invalid parameters
pub fn create_filter(spec: &str, default_window: usize) -> Result<Box<dyn SignalFilter>> {
    let spec = spec.trim().to_lowercase();
    let (name, param) = match spec.split_once(':') {
        Some((name, param)) => (name, Some(param)),
        None => (spec.as_str(), None),
    };

    let parse = |raw: &str| -> Result<f64> {
        raw.trim()
            .parse::<f64>()
            .map_err(|_| Error::FilterError(format!("Invalid filter parameter: {raw}")))
    };
    let window = |param: Option<&str>| -> Result<usize> {
        match param {
            Some(raw) => f64_to_window(parse(raw)?)
                .map_err(|_| Error::FilterError(format!("Window size must be a whole number, got {raw}"))),
            None => Ok(default_window),
        }
    };

    match name {
        "none" | "nofilter" => Ok(Box::new(NoFilter)),
        "moving_average" | "movingaverage" => Ok(Box::new(moving_average::MovingAverageFilter::new(window(param)?)?)),
        "median" => Ok(Box::new(median::MedianFilter::new(window(param)?)?)),
        "exponential" => {
            let alpha = param.map(parse).transpose()?.unwrap_or(0.5);
            Ok(Box::new(exponential::ExponentialFilter::new(alpha)?))
        }
        _ => Err(Error::FilterError(format!("Unknown filter type: {name}"))),
    }
}
