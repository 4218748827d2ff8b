//! Geometry and statistics helpers shared by the counters and the scorer.
//!
//! Points are `(x, y)` tuples in whatever space the keypoints arrive in
//! (normalized `[0, 1]` or pixels). Callers keep units consistent within a
//! session.

pub mod safe_cast;

use crate::constants::EPSILON;

/// Angle at vertex `b` between rays `b→a` and `b→c`, in degrees within `[0, 180]`.
///
/// Computed as the difference of two `atan2` headings, with reflex angles
/// folded back (`360 - angle`). Returns `NaN` when either ray is shorter than
/// [`EPSILON`]; callers treat that as "no detection".
#[must_use]
pub fn angle(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    if distance(a, b) < EPSILON || distance(c, b) < EPSILON {
        return f64::NAN;
    }

    let radians = (c.1 - b.1).atan2(c.0 - b.0) - (a.1 - b.1).atan2(a.0 - b.0);
    let degrees = radians.to_degrees().abs();

    if degrees > 180.0 {
        360.0 - degrees
    } else {
        degrees
    }
}

/// Euclidean distance between two points
#[must_use]
pub fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

/// Arithmetic mean, `0.0` for an empty input
#[must_use]
#[allow(clippy::cast_precision_loss)] // Window lengths are tiny
pub fn mean<'a, I>(values: I) -> f64
where
    I: IntoIterator<Item = &'a f64>,
{
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));

    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Population variance, `0.0` for an empty input
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn variance<'a, I>(values: I) -> f64
where
    I: IntoIterator<Item = &'a f64>,
    I::IntoIter: Clone,
{
    let iter = values.into_iter();
    let n = iter.clone().count();
    if n == 0 {
        return 0.0;
    }

    let m = mean(iter.clone());
    iter.map(|x| (x - m).powi(2)).sum::<f64>() / n as f64
}

/// Population standard deviation
#[must_use]
pub fn std_dev<'a, I>(values: I) -> f64
where
    I: IntoIterator<Item = &'a f64>,
    I::IntoIter: Clone,
{
    variance(values).sqrt()
}

/// Midpoint of two points
#[must_use]
pub fn midpoint(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
}
