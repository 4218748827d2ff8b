use super::{observe_pair_and_chains, Movement, Observation, Phase};
use crate::config::{ExerciseConfig, ExerciseKind, ScoringConfig};
use crate::keypoints::{chain_angle, pair};
use crate::pose::{Joint, PoseFrame};

const ELBOW_CHAINS: [[Joint; 3]; 2] = [
    [Joint::LeftShoulder, Joint::LeftElbow, Joint::LeftWrist],
    [Joint::RightShoulder, Joint::RightElbow, Joint::RightWrist],
];

const BODY_LINES: [[Joint; 3]; 2] = [
    [Joint::LeftShoulder, Joint::LeftHip, Joint::LeftAnkle],
    [Joint::RightShoulder, Joint::RightHip, Joint::RightAnkle],
];

/// Push-up counter: depth from shoulder drop, angle at the more bent elbow
pub struct PushUp;

impl Movement for PushUp {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::Pushup
    }

    fn phase_label(&self, phase: Phase) -> &'static str {
        match phase {
            Phase::Resting => "up",
            Phase::Engaged => "down",
        }
    }

    fn observe(&self, frame: &PoseFrame, min_score: f64) -> Observation {
        observe_pair_and_chains(
            frame,
            min_score,
            (Joint::LeftShoulder, Joint::RightShoulder),
            &ELBOW_CHAINS,
        )
    }

    fn advise(&self, phase: Phase, _depth: f64, angle: f64, config: &ExerciseConfig) -> String {
        match phase {
            Phase::Engaged => "push back up".to_string(),
            Phase::Resting if angle < config.release_angle() => "extend your arms fully".to_string(),
            Phase::Resting => "ready".to_string(),
        }
    }

    fn alignment_faults(&self, frame: &PoseFrame, min_score: f64, scoring: &ScoringConfig) -> Vec<String> {
        let mut faults = Vec::new();

        if let Some((left, right)) = pair(frame, Joint::LeftShoulder, Joint::RightShoulder, min_score) {
            if (left.1 - right.1).abs() > scoring.shoulder_level_tolerance {
                faults.push("shoulders uneven".to_string());
            }
        }

        let sagging = BODY_LINES
            .iter()
            .filter_map(|joints| chain_angle(frame, *joints, min_score))
            .any(|angle| angle < scoring.body_line_min_angle);
        if sagging {
            faults.push("keep your body in a straight line".to_string());
        }

        faults
    }

    fn range_cue(&self) -> &'static str {
        "lower your chest further"
    }
}
