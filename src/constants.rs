//! Constants used throughout the engine

/// Minimum keypoint confidence for a joint to be considered detected
pub const DEFAULT_CONFIDENCE_GATE: f64 = 0.3;

/// Default ring buffer length for position and angle smoothing
pub const DEFAULT_SMOOTHING_WINDOW: usize = 5;

/// Samples required before a smoothed value is trusted
pub const MIN_READY_SAMPLES: usize = 3;

/// Smoothed-position change below which the subject counts as stable
pub const DEFAULT_STABLE_EPSILON: f64 = 0.03;

/// Weight kept by the old baseline on each drift-adaptation step
pub const DEFAULT_DRIFT_WEIGHT: f64 = 0.95;

/// Smoothed-position change at or below which the subject counts as still
pub const DEFAULT_STILL_EPSILON: f64 = 0.003;

/// Buffer standard deviation under which a pending re-anchor is applied
pub const DEFAULT_SETTLE_TOLERANCE: f64 = 0.01;

/// Fraction of the depth threshold the depth must fall under to release
pub const DEFAULT_RELEASE_DEPTH_RATIO: f64 = 0.5;

/// Engaged frames a candidate needs before it can be counted
pub const DEFAULT_MIN_ENGAGED_FRAMES: u32 = 2;

/// Squat defaults (normalized depth, knee angle in degrees)
pub const SQUAT_DEPTH_THRESHOLD: f64 = 0.05;
pub const SQUAT_ANGLE_THRESHOLD: f64 = 140.0;
pub const SQUAT_RELEASE_ANGLE: f64 = 160.0;
pub const SQUAT_TARGET_ANGLE: f64 = 90.0;

/// Push-up defaults (normalized depth, elbow angle in degrees)
pub const PUSHUP_DEPTH_THRESHOLD: f64 = 0.04;
pub const PUSHUP_ANGLE_THRESHOLD: f64 = 100.0;
pub const PUSHUP_RELEASE_ANGLE: f64 = 130.0;
pub const PUSHUP_TARGET_ANGLE: f64 = 90.0;

/// Lunge defaults (normalized hip displacement, front-knee angle in degrees)
pub const LUNGE_DEPTH_THRESHOLD: f64 = 0.08;
pub const LUNGE_ANGLE_THRESHOLD: f64 = 120.0;
pub const LUNGE_RELEASE_ANGLE: f64 = 150.0;
pub const LUNGE_TARGET_ANGLE: f64 = 90.0;

/// Scoring tolerances in normalized image units
pub const DEFAULT_SHOULDER_LEVEL_TOLERANCE: f64 = 0.05;
pub const DEFAULT_KNEE_OVER_ANKLE_TOLERANCE: f64 = 0.08;
pub const DEFAULT_HIP_LEVEL_TOLERANCE: f64 = 0.06;
pub const DEFAULT_TORSO_LEAN_TOLERANCE: f64 = 0.10;

/// Shoulder-hip-ankle angle under which a plank counts as broken
pub const DEFAULT_BODY_LINE_MIN_ANGLE: f64 = 160.0;

/// Fixed deduction applied per alignment violation
pub const DEFAULT_ALIGNMENT_PENALTY: f64 = 20.0;

/// Range deduction per degree short of the target angle
pub const DEFAULT_RANGE_PENALTY_PER_DEGREE: f64 = 1.0;

/// Range deduction at zero depth, scaled down linearly as depth nears the threshold
pub const DEPTH_SHORTFALL_PENALTY: f64 = 50.0;

/// Stability deduction per unit of lateral sway standard deviation
pub const DEFAULT_STABILITY_PENALTY_SCALE: f64 = 1000.0;

/// Sub-score weights used when all three sub-scores are available
pub const WEIGHT_ALIGNMENT: f64 = 0.4;
pub const WEIGHT_RANGE: f64 = 0.4;
pub const WEIGHT_STABILITY: f64 = 0.2;

/// Feedback attached to a sample with nothing to correct
pub const FEEDBACK_GOOD_FORM: &str = "good form";

/// Feedback attached to frames that cannot be evaluated
pub const FEEDBACK_MISSING: &str = "insufficient detection";

/// Feedback while the resting position is being learned
pub const FEEDBACK_CALIBRATING: &str = "calibrating resting position";

/// Feedback when a candidate rep is discarded
pub const FEEDBACK_INSUFFICIENT_RANGE: &str = "insufficient depth/range";

/// Feedback for frames arriving out of order
pub const FEEDBACK_STALE: &str = "stale frame ignored";

/// Upper bound of every score
pub const MAX_SCORE: f64 = 100.0;

/// Ray length below which an angle is undefined
pub const EPSILON: f64 = 1e-9;
