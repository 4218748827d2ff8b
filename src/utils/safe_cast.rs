//! Safe numeric conversions for scores and counters

use crate::constants::MAX_SCORE;
use crate::{Error, Result};

/// Round and clamp a raw score into `0..=100`
///
/// Non-finite input maps to 0 so a bad sub-score can never inflate a rating.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Clamping ensures safe truncation
#[allow(clippy::cast_sign_loss)] // Clamped to non-negative before the cast
pub fn score_clamp(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }

    value.round().clamp(0.0, MAX_SCORE) as u8
}

/// Convert a user supplied window length, rejecting negatives and fractions
///
/// # Errors
///
/// Returns an error if the value is not a finite non-negative whole number
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[allow(clippy::cast_precision_loss)]
pub fn f64_to_window(value: f64) -> Result<usize> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Ok(value as usize)
    } else {
        Err(Error::InvalidInput(format!(
            "Value {value} is not a valid window length"
        )))
    }
}
