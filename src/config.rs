//! Configuration management for the repetition counting engine

use crate::constants::{
    DEFAULT_ALIGNMENT_PENALTY, DEFAULT_BODY_LINE_MIN_ANGLE, DEFAULT_CONFIDENCE_GATE, DEFAULT_DRIFT_WEIGHT, DEFAULT_HIP_LEVEL_TOLERANCE,
    DEFAULT_KNEE_OVER_ANKLE_TOLERANCE, DEFAULT_MIN_ENGAGED_FRAMES, DEFAULT_RANGE_PENALTY_PER_DEGREE,
    DEFAULT_RELEASE_DEPTH_RATIO, DEFAULT_SETTLE_TOLERANCE, DEFAULT_SHOULDER_LEVEL_TOLERANCE,
    DEFAULT_SMOOTHING_WINDOW, DEFAULT_STABILITY_PENALTY_SCALE, DEFAULT_STABLE_EPSILON, DEFAULT_STILL_EPSILON,
    DEFAULT_TORSO_LEAN_TOLERANCE, LUNGE_ANGLE_THRESHOLD,
    LUNGE_DEPTH_THRESHOLD, LUNGE_RELEASE_ANGLE, LUNGE_TARGET_ANGLE, MIN_READY_SAMPLES, PUSHUP_ANGLE_THRESHOLD,
    PUSHUP_DEPTH_THRESHOLD, PUSHUP_RELEASE_ANGLE, PUSHUP_TARGET_ANGLE, SQUAT_ANGLE_THRESHOLD,
    SQUAT_DEPTH_THRESHOLD, SQUAT_RELEASE_ANGLE, SQUAT_TARGET_ANGLE, WEIGHT_ALIGNMENT, WEIGHT_RANGE,
    WEIGHT_STABILITY,
};
use crate::filters::{create_filter, SignalFilter};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Supported exercise kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
    /// Hip drops, knees bend
    Squat,
    /// Shoulders drop, elbows bend
    Pushup,
    /// Hips drop, front knee bends
    Lunge,
}

impl ExerciseKind {
    /// Lowercase identifier
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Squat => "squat",
            Self::Pushup => "pushup",
            Self::Lunge => "lunge",
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "squat" => Ok(Self::Squat),
            "pushup" | "push-up" | "push_up" => Ok(Self::Pushup),
            "lunge" => Ok(Self::Lunge),
            other => Err(Error::ConfigError(format!("Unknown exercise kind: {other}"))),
        }
    }
}

/// Static parameters of one counting session
///
/// Thresholds stay fixed for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseConfig {
    /// Which movement is being counted
    pub kind: ExerciseKind,

    /// Displacement from baseline that must be exceeded to engage
    pub depth_threshold: f64,

    /// Joint angle (degrees) that must be undercut to engage
    pub angle_threshold: f64,

    /// Ring buffer length for position and angle smoothing
    #[serde(default = "default_smoothing_window")]
    pub smoothing_window: usize,

    /// Minimum keypoint confidence
    #[serde(default = "default_confidence_gate")]
    pub confidence_gate: f64,

    /// Angle (degrees) above which an engaged rep releases; kind default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_angle_threshold: Option<f64>,

    /// Fraction of the depth threshold the depth must fall under to release
    #[serde(default = "default_release_depth_ratio")]
    pub release_depth_ratio: f64,

    /// Engaged frames a candidate needs to be counted
    #[serde(default = "default_min_engaged_frames")]
    pub min_engaged_frames: u32,
}

fn default_smoothing_window() -> usize {
    DEFAULT_SMOOTHING_WINDOW
}

fn default_confidence_gate() -> f64 {
    DEFAULT_CONFIDENCE_GATE
}

fn default_release_depth_ratio() -> f64 {
    DEFAULT_RELEASE_DEPTH_RATIO
}

fn default_min_engaged_frames() -> u32 {
    DEFAULT_MIN_ENGAGED_FRAMES
}

impl ExerciseConfig {
    /// Representative defaults for `kind`
    #[must_use]
    pub fn for_kind(kind: ExerciseKind) -> Self {
        let (depth_threshold, angle_threshold) = match kind {
            ExerciseKind::Squat => (SQUAT_DEPTH_THRESHOLD, SQUAT_ANGLE_THRESHOLD),
            ExerciseKind::Pushup => (PUSHUP_DEPTH_THRESHOLD, PUSHUP_ANGLE_THRESHOLD),
            ExerciseKind::Lunge => (LUNGE_DEPTH_THRESHOLD, LUNGE_ANGLE_THRESHOLD),
        };

        Self {
            kind,
            depth_threshold,
            angle_threshold,
            smoothing_window: DEFAULT_SMOOTHING_WINDOW,
            confidence_gate: DEFAULT_CONFIDENCE_GATE,
            release_angle_threshold: None,
            release_depth_ratio: DEFAULT_RELEASE_DEPTH_RATIO,
            min_engaged_frames: DEFAULT_MIN_ENGAGED_FRAMES,
        }
    }

    /// Replace both engage thresholds
    #[must_use]
    pub fn with_thresholds(mut self, depth_threshold: f64, angle_threshold: f64) -> Self {
        self.depth_threshold = depth_threshold;
        self.angle_threshold = angle_threshold;
        self
    }

    /// Replace the smoothing window
    #[must_use]
    pub fn with_smoothing_window(mut self, window: usize) -> Self {
        self.smoothing_window = window;
        self
    }

    /// Angle above which an engaged rep releases
    #[must_use]
    pub fn release_angle(&self) -> f64 {
        self.release_angle_threshold.unwrap_or_else(|| {
            let kind_default = match self.kind {
                ExerciseKind::Squat => SQUAT_RELEASE_ANGLE,
                ExerciseKind::Pushup => PUSHUP_RELEASE_ANGLE,
                ExerciseKind::Lunge => LUNGE_RELEASE_ANGLE,
            };
            kind_default.max(self.angle_threshold)
        })
    }

    /// Depth under which an engaged rep releases
    #[must_use]
    pub fn release_depth(&self) -> f64 {
        self.depth_threshold * self.release_depth_ratio
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first invalid field
    pub fn validate(&self) -> Result<()> {
        if !(self.depth_threshold.is_finite() && self.depth_threshold > 0.0) {
            return Err(Error::ConfigError(format!(
                "Depth threshold must be positive, got {}",
                self.depth_threshold
            )));
        }
        if !(self.angle_threshold.is_finite() && self.angle_threshold > 0.0 && self.angle_threshold <= 180.0) {
            return Err(Error::ConfigError(format!(
                "Angle threshold must be in (0, 180], got {}",
                self.angle_threshold
            )));
        }
        if self.smoothing_window < MIN_READY_SAMPLES {
            return Err(Error::ConfigError(format!(
                "Smoothing window must be at least {MIN_READY_SAMPLES}, got {}",
                self.smoothing_window
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence_gate) {
            return Err(Error::ConfigError(
                "Confidence gate must be between 0.0 and 1.0".to_string(),
            ));
        }
        if let Some(release) = self.release_angle_threshold {
            if !(release.is_finite() && release >= self.angle_threshold && release <= 180.0) {
                return Err(Error::ConfigError(format!(
                    "Release angle must be between the angle threshold and 180, got {release}"
                )));
            }
        }
        if !(self.release_depth_ratio > 0.0 && self.release_depth_ratio <= 1.0) {
            return Err(Error::ConfigError(
                "Release depth ratio must be in (0, 1]".to_string(),
            ));
        }
        if self.min_engaged_frames == 0 {
            return Err(Error::ConfigError(
                "Minimum engaged frames must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ExerciseConfig {
    fn default() -> Self {
        Self::for_kind(ExerciseKind::Squat)
    }
}

/// Baseline tracker parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineConfig {
    /// Smoothed change below which the subject counts as stable
    pub stable_epsilon: f64,

    /// Smoothed change at or below which the subject counts as still
    pub still_epsilon: f64,

    /// Weight kept by the old baseline on each adaptation step
    pub drift_weight: f64,

    /// Samples needed before the smoothed value is trusted
    pub min_ready_samples: usize,

    /// Buffer standard deviation under which a re-anchor is applied
    pub settle_tolerance: f64,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            stable_epsilon: DEFAULT_STABLE_EPSILON,
            still_epsilon: DEFAULT_STILL_EPSILON,
            drift_weight: DEFAULT_DRIFT_WEIGHT,
            min_ready_samples: MIN_READY_SAMPLES,
            settle_tolerance: DEFAULT_SETTLE_TOLERANCE,
        }
    }
}

impl BaselineConfig {
    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first invalid field
    pub fn validate(&self) -> Result<()> {
        if !(self.stable_epsilon.is_finite() && self.stable_epsilon > 0.0) {
            return Err(Error::ConfigError("Stable epsilon must be positive".to_string()));
        }
        if !(self.still_epsilon.is_finite() && self.still_epsilon > 0.0) {
            return Err(Error::ConfigError("Still epsilon must be positive".to_string()));
        }
        if !(0.0..1.0).contains(&self.drift_weight) {
            return Err(Error::ConfigError(
                "Drift weight must be in [0.0, 1.0)".to_string(),
            ));
        }
        if self.min_ready_samples == 0 {
            return Err(Error::ConfigError(
                "Minimum ready samples must be greater than 0".to_string(),
            ));
        }
        if !(self.settle_tolerance.is_finite() && self.settle_tolerance >= 0.0) {
            return Err(Error::ConfigError("Settle tolerance must be non-negative".to_string()));
        }
        Ok(())
    }
}

/// Angle smoothing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Filter spec (`moving_average`, `median:5`, `exponential:0.4`, `none`)
    pub angle_filter: String,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            angle_filter: "moving_average".to_string(),
        }
    }
}

/// Form scoring parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Attach a single-frame score to every evaluable frame
    pub live_feedback: bool,

    /// Allowed left/right shoulder height difference
    pub shoulder_level_tolerance: f64,

    /// Allowed horizontal knee-to-ankle offset
    pub knee_over_ankle_tolerance: f64,

    /// Allowed left/right hip height difference
    pub hip_level_tolerance: f64,

    /// Allowed horizontal shoulder-to-hip offset
    pub torso_lean_tolerance: f64,

    /// Shoulder-hip-ankle angle (degrees) a plank must stay above
    pub body_line_min_angle: f64,

    /// Points deducted per alignment violation
    pub alignment_penalty: f64,

    /// Points deducted per degree short of the target angle
    pub range_penalty_per_degree: f64,

    /// Points deducted per unit of lateral sway standard deviation
    pub stability_penalty_scale: f64,

    /// Angle counted as full range; kind default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_angle: Option<f64>,

    /// Weight of the alignment sub-score in three-part scoring
    pub weight_alignment: f64,

    /// Weight of the range sub-score in three-part scoring
    pub weight_range: f64,

    /// Weight of the stability sub-score in three-part scoring
    pub weight_stability: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            live_feedback: false,
            shoulder_level_tolerance: DEFAULT_SHOULDER_LEVEL_TOLERANCE,
            knee_over_ankle_tolerance: DEFAULT_KNEE_OVER_ANKLE_TOLERANCE,
            hip_level_tolerance: DEFAULT_HIP_LEVEL_TOLERANCE,
            torso_lean_tolerance: DEFAULT_TORSO_LEAN_TOLERANCE,
            body_line_min_angle: DEFAULT_BODY_LINE_MIN_ANGLE,
            alignment_penalty: DEFAULT_ALIGNMENT_PENALTY,
            range_penalty_per_degree: DEFAULT_RANGE_PENALTY_PER_DEGREE,
            stability_penalty_scale: DEFAULT_STABILITY_PENALTY_SCALE,
            target_angle: None,
            weight_alignment: WEIGHT_ALIGNMENT,
            weight_range: WEIGHT_RANGE,
            weight_stability: WEIGHT_STABILITY,
        }
    }
}

impl ScoringConfig {
    /// Angle treated as full range of motion for `kind`
    #[must_use]
    pub fn target_angle_for(&self, kind: ExerciseKind) -> f64 {
        self.target_angle.unwrap_or(match kind {
            ExerciseKind::Squat => SQUAT_TARGET_ANGLE,
            ExerciseKind::Pushup => PUSHUP_TARGET_ANGLE,
            ExerciseKind::Lunge => LUNGE_TARGET_ANGLE,
        })
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first invalid field
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("Shoulder level tolerance", self.shoulder_level_tolerance),
            ("Knee over ankle tolerance", self.knee_over_ankle_tolerance),
            ("Hip level tolerance", self.hip_level_tolerance),
            ("Torso lean tolerance", self.torso_lean_tolerance),
            ("Body line angle", self.body_line_min_angle),
            ("Alignment penalty", self.alignment_penalty),
            ("Range penalty", self.range_penalty_per_degree),
            ("Stability penalty scale", self.stability_penalty_scale),
            ("Alignment weight", self.weight_alignment),
            ("Range weight", self.weight_range),
            ("Stability weight", self.weight_stability),
        ];
        for (label, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::ConfigError(format!("{label} must be non-negative, got {value}")));
            }
        }
        if self.weight_alignment + self.weight_range + self.weight_stability <= 0.0 {
            return Err(Error::ConfigError("Score weights must not all be zero".to_string()));
        }
        if let Some(target) = self.target_angle {
            if !(target.is_finite() && target > 0.0 && target <= 180.0) {
                return Err(Error::ConfigError(format!("Target angle must be in (0, 180], got {target}")));
            }
        }
        Ok(())
    }
}

/// Engine configuration as loaded from file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Exercise being counted
    pub exercise: ExerciseConfig,

    /// Baseline tracking
    pub baseline: BaselineConfig,

    /// Angle smoothing
    pub smoothing: SmoothingConfig,

    /// Form scoring
    pub scoring: ScoringConfig,
}

impl Config {
    /// Defaults for one exercise kind
    #[must_use]
    pub fn for_exercise(exercise: ExerciseConfig) -> Self {
        Self {
            exercise,
            ..Self::default()
        }
    }

    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Create the angle smoothing filter from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the filter spec is unknown or invalid
    pub fn create_angle_filter(&self) -> Result<Box<dyn SignalFilter>> {
        create_filter(&self.smoothing.angle_filter, self.exercise.smoothing_window)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first invalid field
    pub fn validate(&self) -> Result<()> {
        self.exercise.validate()?;
        self.baseline.validate()?;
        self.scoring.validate()?;

        if self.baseline.min_ready_samples > self.exercise.smoothing_window {
            return Err(Error::ConfigError(format!(
                "Smoothing window {} cannot hold {} ready samples",
                self.exercise.smoothing_window, self.baseline.min_ready_samples
            )));
        }

        self.create_angle_filter()
            .map_err(|e| Error::ConfigError(format!("Invalid angle filter: {e}")))?;

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Repetition counter configuration

# Exercise being counted
exercise:
  kind: squat               # squat | pushup | lunge
  depth_threshold: 0.05     # normalized displacement from resting position
  angle_threshold: 140.0    # joint angle (degrees) that must be undercut
  smoothing_window: 5
  confidence_gate: 0.3
  # release_angle_threshold: 160.0
  release_depth_ratio: 0.5
  min_engaged_frames: 2

# Resting position tracking
baseline:
  stable_epsilon: 0.03
  still_epsilon: 0.003      # drift and re-anchoring only while the hips barely move
  drift_weight: 0.95
  min_ready_samples: 3
  settle_tolerance: 0.01

# Angle smoothing
smoothing:
  angle_filter: "moving_average"

# Form scoring
scoring:
  live_feedback: false
  shoulder_level_tolerance: 0.05
  knee_over_ankle_tolerance: 0.08
  hip_level_tolerance: 0.06
  torso_lean_tolerance: 0.1
  body_line_min_angle: 160.0
  alignment_penalty: 20.0
  range_penalty_per_degree: 1.0
  stability_penalty_scale: 1000.0
  weight_alignment: 0.4
  weight_range: 0.4
  weight_stability: 0.2
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        for kind in [ExerciseKind::Squat, ExerciseKind::Pushup, ExerciseKind::Lunge] {
            ExerciseConfig::for_kind(kind).validate().unwrap();
            Config::for_exercise(ExerciseConfig::for_kind(kind)).validate().unwrap();
        }
    }

    #[test]
    fn test_example_config_parses() {
        let config: Config = serde_yaml::from_str(EXAMPLE_CONFIG).unwrap();
        config.validate().unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_rejects_non_positive_thresholds() {
        let config = ExerciseConfig::default().with_thresholds(0.0, 140.0);
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));

        let config = ExerciseConfig::default().with_thresholds(0.05, -1.0);
        assert!(config.validate().is_err());

        let config = ExerciseConfig::default().with_thresholds(f64::NAN, 140.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_windows_and_gates() {
        assert!(ExerciseConfig::default().with_smoothing_window(2).validate().is_err());

        let mut config = ExerciseConfig::default();
        config.confidence_gate = 1.5;
        assert!(config.validate().is_err());

        let mut config = ExerciseConfig::default();
        config.release_angle_threshold = Some(100.0);
        assert!(config.validate().is_err());

        let mut config = ExerciseConfig::default();
        config.min_engaged_frames = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_release_angle_defaults() {
        assert_eq!(ExerciseConfig::for_kind(ExerciseKind::Pushup).release_angle(), 130.0);
        assert_eq!(ExerciseConfig::for_kind(ExerciseKind::Squat).release_angle(), 160.0);

        // Release never sits below the engage threshold
        let config = ExerciseConfig::for_kind(ExerciseKind::Pushup).with_thresholds(0.04, 150.0);
        assert_eq!(config.release_angle(), 150.0);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Push-Up".parse::<ExerciseKind>().unwrap(), ExerciseKind::Pushup);
        assert_eq!("lunge".parse::<ExerciseKind>().unwrap(), ExerciseKind::Lunge);
        assert!("deadlift".parse::<ExerciseKind>().is_err());

        let parsed: std::result::Result<ExerciseConfig, _> =
            serde_yaml::from_str("kind: burpee\ndepth_threshold: 0.1\nangle_threshold: 90.0\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_window_must_hold_ready_samples() {
        let mut config = Config::default();
        config.baseline.min_ready_samples = 6;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_baseline_tolerances() {
        let mut config = Config::default();
        config.baseline.still_epsilon = 0.0;
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));

        let mut config = Config::default();
        config.baseline.stable_epsilon = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_angle_filter_rejected() {
        let mut config = Config::default();
        config.smoothing.angle_filter = "kalman".to_string();
        assert!(config.validate().is_err());
    }
}
