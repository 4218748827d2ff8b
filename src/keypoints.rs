//! Confidence-gated joint lookup.
//!
//! Every accessor returns `None` instead of guessing when a joint is missing,
//! below the confidence gate, or carries a non-finite position.

use crate::pose::{Joint, Keypoint, PoseFrame};
use crate::utils::{angle, midpoint};

/// Resolve `joint` in `frame` if it was detected with at least `min_score`
#[must_use]
pub fn find(frame: &PoseFrame, joint: Joint, min_score: f64) -> Option<&Keypoint> {
    frame
        .keypoints
        .iter()
        .find(|kp| kp.joint == joint)
        .filter(|kp| kp.score >= min_score && kp.x.is_finite() && kp.y.is_finite())
}

/// Planar position of `joint`, gated
#[must_use]
pub fn position(frame: &PoseFrame, joint: Joint, min_score: f64) -> Option<(f64, f64)> {
    find(frame, joint, min_score).map(Keypoint::position)
}

/// Positions of a three-joint chain, only when all three pass the gate
#[must_use]
pub fn chain(frame: &PoseFrame, joints: [Joint; 3], min_score: f64) -> Option<[(f64, f64); 3]> {
    Some([
        position(frame, joints[0], min_score)?,
        position(frame, joints[1], min_score)?,
        position(frame, joints[2], min_score)?,
    ])
}

/// Angle at the middle joint of a chain; `None` when absent or degenerate
#[must_use]
pub fn chain_angle(frame: &PoseFrame, joints: [Joint; 3], min_score: f64) -> Option<f64> {
    let [a, b, c] = chain(frame, joints, min_score)?;
    let value = angle(a, b, c);
    (!value.is_nan()).then_some(value)
}

/// Smallest (most bent) angle across the chains that could be evaluated
#[must_use]
pub fn most_bent_angle(frame: &PoseFrame, chains: &[[Joint; 3]], min_score: f64) -> Option<f64> {
    chains
        .iter()
        .filter_map(|joints| chain_angle(frame, *joints, min_score))
        .fold(None, |best: Option<f64>, value| {
            Some(best.map_or(value, |b| b.min(value)))
        })
}

/// Mean position of whichever of the two joints passed the gate
#[must_use]
pub fn pair_center(frame: &PoseFrame, left: Joint, right: Joint, min_score: f64) -> Option<(f64, f64)> {
    match (position(frame, left, min_score), position(frame, right, min_score)) {
        (Some(l), Some(r)) => Some(midpoint(l, r)),
        (Some(p), None) | (None, Some(p)) => Some(p),
        (None, None) => None,
    }
}

/// Both sides of a bilateral pair, only when both passed the gate
#[must_use]
pub fn pair(frame: &PoseFrame, left: Joint, right: Joint, min_score: f64) -> Option<((f64, f64), (f64, f64))> {
    Some((position(frame, left, min_score)?, position(frame, right, min_score)?))
}
