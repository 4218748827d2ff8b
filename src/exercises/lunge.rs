use super::{observe_pair_and_chains, Movement, Observation, Phase};
use crate::config::{ExerciseConfig, ExerciseKind, ScoringConfig};
use crate::constants::FEEDBACK_GOOD_FORM;
use crate::keypoints::{chain_angle, pair_center, position};
use crate::pose::{Joint, PoseFrame};

const KNEE_CHAINS: [[Joint; 3]; 2] = [
    [Joint::LeftHip, Joint::LeftKnee, Joint::LeftAnkle],
    [Joint::RightHip, Joint::RightKnee, Joint::RightAnkle],
];

/// Lunge counter: depth from hip drop, angle at the front (more bent) knee
pub struct Lunge;

impl Lunge {
    /// Knee and ankle of whichever leg is bent more
    fn front_leg(frame: &PoseFrame, min_score: f64) -> Option<((f64, f64), (f64, f64))> {
        let (_, joints) = KNEE_CHAINS
            .iter()
            .filter_map(|joints| chain_angle(frame, *joints, min_score).map(|angle| (angle, joints)))
            .min_by(|a, b| a.0.total_cmp(&b.0))?;

        Some((position(frame, joints[1], min_score)?, position(frame, joints[2], min_score)?))
    }
}

impl Movement for Lunge {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::Lunge
    }

    fn phase_label(&self, phase: Phase) -> &'static str {
        match phase {
            Phase::Resting => "standing",
            Phase::Engaged => "lunging",
        }
    }

    fn observe(&self, frame: &PoseFrame, min_score: f64) -> Observation {
        observe_pair_and_chains(frame, min_score, (Joint::LeftHip, Joint::RightHip), &KNEE_CHAINS)
    }

    fn advise(&self, phase: Phase, depth: f64, angle: f64, config: &ExerciseConfig) -> String {
        match phase {
            Phase::Engaged if angle > config.angle_threshold - 20.0 => "front knee angle insufficient".to_string(),
            Phase::Engaged => FEEDBACK_GOOD_FORM.to_string(),
            Phase::Resting if depth > config.release_depth() => "step deeper into the lunge".to_string(),
            Phase::Resting => "ready".to_string(),
        }
    }

    fn alignment_faults(&self, frame: &PoseFrame, min_score: f64, scoring: &ScoringConfig) -> Vec<String> {
        let mut faults = Vec::new();

        if let Some((knee, ankle)) = Self::front_leg(frame, min_score) {
            if (knee.0 - ankle.0).abs() > scoring.knee_over_ankle_tolerance {
                faults.push("front knee past ankle".to_string());
            }
        }

        let shoulders = pair_center(frame, Joint::LeftShoulder, Joint::RightShoulder, min_score);
        let hips = pair_center(frame, Joint::LeftHip, Joint::RightHip, min_score);
        if let (Some(s), Some(h)) = (shoulders, hips) {
            if (s.0 - h.0).abs() > scoring.torso_lean_tolerance {
                faults.push("keep your torso upright".to_string());
            }
        }

        faults
    }

    fn range_cue(&self) -> &'static str {
        "drop your back knee lower"
    }
}
