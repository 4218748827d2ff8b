//! Form scoring for single frames and completed repetitions.
//!
//! A score is built from up to three sub-scores, each starting at 100:
//! alignment (fixed deduction per violated rule), range (shortfall from the
//! target angle and depth) and stability (lateral sway over a rep). Checks
//! that cannot be evaluated because joints are missing are skipped, never
//! penalized.

use crate::config::{Config, ExerciseConfig, ScoringConfig};
use crate::constants::{DEPTH_SHORTFALL_PENALTY, FEEDBACK_GOOD_FORM, MAX_SCORE};
use crate::exercises::{Movement, RepCapture};
use crate::pose::PoseFrame;
use crate::utils::safe_cast::score_clamp;
use crate::utils::std_dev;
use serde::{Deserialize, Serialize};

/// Individual components of a score, each in `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    /// Symmetry and joint placement
    pub alignment: f64,
    /// How close the movement came to full range
    pub range: f64,
    /// Lateral steadiness; only computed over a whole rep
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stability: Option<f64>,
}

/// Quality evaluation of a frame or repetition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSample {
    /// Combined score in `0..=100`
    pub overall: u8,
    /// Components the overall score was derived from
    pub sub_scores: SubScores,
    /// Corrections, or a single affirmation when there are none
    pub feedback: Vec<String>,
}

/// Scores frames and reps for one exercise
#[derive(Debug, Clone)]
pub struct FormScorer {
    exercise: ExerciseConfig,
    scoring: ScoringConfig,
}

impl FormScorer {
    /// Create a scorer from engine configuration
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            exercise: config.exercise.clone(),
            scoring: config.scoring.clone(),
        }
    }

    /// Score one frame. `depth` and `angle` are the smoothed metrics, if any.
    #[must_use]
    pub fn score_frame(
        &self,
        movement: &dyn Movement,
        frame: &PoseFrame,
        depth: Option<f64>,
        angle: Option<f64>,
    ) -> ScoreSample {
        self.score(movement, frame, depth, angle, None)
    }

    /// Score a counted rep on its deepest frame, including sway stability
    #[must_use]
    pub fn score_rep(&self, movement: &dyn Movement, capture: &RepCapture) -> ScoreSample {
        let stability = if capture.sway.is_empty() {
            None
        } else {
            let penalty = std_dev(&capture.sway) * self.scoring.stability_penalty_scale;
            Some(bounded(MAX_SCORE - penalty))
        };

        self.score(
            movement,
            &capture.peak_frame,
            Some(capture.event.peak_depth),
            Some(capture.event.peak_angle),
            stability,
        )
    }

    fn score(
        &self,
        movement: &dyn Movement,
        frame: &PoseFrame,
        depth: Option<f64>,
        angle: Option<f64>,
        stability: Option<f64>,
    ) -> ScoreSample {
        let mut feedback = movement.alignment_faults(frame, self.exercise.confidence_gate, &self.scoring);
        #[allow(clippy::cast_precision_loss)]
        let alignment = bounded(MAX_SCORE - feedback.len() as f64 * self.scoring.alignment_penalty);

        let shortfall = self.range_shortfall(movement, depth, angle);
        if shortfall > 0.0 {
            feedback.push(movement.range_cue().to_string());
        }
        let range = bounded(MAX_SCORE - shortfall);

        if feedback.is_empty() {
            feedback.push(FEEDBACK_GOOD_FORM.to_string());
        }

        let sub_scores = SubScores {
            alignment,
            range,
            stability,
        };

        ScoreSample {
            overall: self.combine(&sub_scores),
            sub_scores,
            feedback,
        }
    }

    /// Points lost to incomplete range
    fn range_shortfall(&self, movement: &dyn Movement, depth: Option<f64>, angle: Option<f64>) -> f64 {
        let mut shortfall = 0.0;

        if let Some(angle) = angle.filter(|a| a.is_finite()) {
            let target = self.scoring.target_angle_for(movement.kind());
            if angle > target {
                shortfall += (angle - target) * self.scoring.range_penalty_per_degree;
            }
        }

        if let Some(depth) = depth.filter(|d| d.is_finite()) {
            let threshold = self.exercise.depth_threshold;
            if depth < threshold {
                let reached = (depth / threshold).max(0.0);
                shortfall += (1.0 - reached) * DEPTH_SHORTFALL_PENALTY;
            }
        }

        shortfall
    }

    /// Weighted mean when stability is known, plain mean of the other two otherwise
    fn combine(&self, sub: &SubScores) -> u8 {
        match sub.stability {
            Some(stability) => {
                let s = &self.scoring;
                let total = s.weight_alignment + s.weight_range + s.weight_stability;
                if total <= 0.0 {
                    return score_clamp((sub.alignment + sub.range) / 2.0);
                }
                score_clamp(
                    (sub.alignment * s.weight_alignment + sub.range * s.weight_range + stability * s.weight_stability)
                        / total,
                )
            }
            None => score_clamp((sub.alignment + sub.range) / 2.0),
        }
    }
}

fn bounded(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, MAX_SCORE)
    } else {
        0.0
    }
}
