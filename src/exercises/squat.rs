use super::{observe_pair_and_chains, Movement, Observation, Phase};
use crate::config::{ExerciseConfig, ExerciseKind, ScoringConfig};
use crate::constants::FEEDBACK_GOOD_FORM;
use crate::keypoints::{pair, position};
use crate::pose::{Joint, PoseFrame};

const KNEE_CHAINS: [[Joint; 3]; 2] = [
    [Joint::LeftHip, Joint::LeftKnee, Joint::LeftAnkle],
    [Joint::RightHip, Joint::RightKnee, Joint::RightAnkle],
];

/// Squat counter: depth from hip drop, angle at the more bent knee
pub struct Squat;

impl Movement for Squat {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::Squat
    }

    fn phase_label(&self, phase: Phase) -> &'static str {
        match phase {
            Phase::Resting => "standing",
            Phase::Engaged => "squatting",
        }
    }

    fn observe(&self, frame: &PoseFrame, min_score: f64) -> Observation {
        observe_pair_and_chains(frame, min_score, (Joint::LeftHip, Joint::RightHip), &KNEE_CHAINS)
    }

    fn advise(&self, phase: Phase, depth: f64, angle: f64, config: &ExerciseConfig) -> String {
        match phase {
            Phase::Engaged if angle > config.angle_threshold - 20.0 => "knee angle insufficient".to_string(),
            Phase::Engaged => FEEDBACK_GOOD_FORM.to_string(),
            Phase::Resting if depth > config.release_depth() => "lower your hips".to_string(),
            Phase::Resting => "ready".to_string(),
        }
    }

    fn alignment_faults(&self, frame: &PoseFrame, min_score: f64, scoring: &ScoringConfig) -> Vec<String> {
        let mut faults = Vec::new();

        for (side, knee, ankle) in [
            ("left", Joint::LeftKnee, Joint::LeftAnkle),
            ("right", Joint::RightKnee, Joint::RightAnkle),
        ] {
            if let (Some(k), Some(a)) = (position(frame, knee, min_score), position(frame, ankle, min_score)) {
                if (k.0 - a.0).abs() > scoring.knee_over_ankle_tolerance {
                    faults.push(format!("{side} knee drifting past ankle"));
                }
            }
        }

        if let Some((left, right)) = pair(frame, Joint::LeftHip, Joint::RightHip, min_score) {
            if (left.1 - right.1).abs() > scoring.hip_level_tolerance {
                faults.push("hips uneven".to_string());
            }
        }

        faults
    }

    fn range_cue(&self) -> &'static str {
        "bend your knees more"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(knee_x: f64, right_hip_y: f64) -> PoseFrame {
        PoseFrame::empty(0)
            .with_keypoint(Joint::LeftHip, 0.4, 0.5, 0.9)
            .with_keypoint(Joint::RightHip, 0.6, right_hip_y, 0.9)
            .with_keypoint(Joint::LeftKnee, knee_x, 0.7, 0.9)
            .with_keypoint(Joint::LeftAnkle, 0.4, 0.9, 0.9)
    }

    #[test]
    fn test_observe_uses_hip_height() {
        match Squat.observe(&frame(0.4, 0.5), 0.3) {
            Observation::Measured(m) => {
                assert!((m.tracked - 0.5).abs() < 1e-12);
                assert!((m.sway - 0.5).abs() < 1e-12);
                assert!((m.angle - 180.0).abs() < 1e-9);
            }
            other => panic!("expected measurement, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_knees_is_missing() {
        let f = PoseFrame::empty(0).with_keypoint(Joint::LeftHip, 0.4, 0.5, 0.9);
        assert_eq!(Squat.observe(&f, 0.3), Observation::Missing);
    }

    #[test]
    fn test_alignment_faults() {
        let scoring = ScoringConfig::default();
        assert!(Squat.alignment_faults(&frame(0.4, 0.5), 0.3, &scoring).is_empty());

        let faults = Squat.alignment_faults(&frame(0.55, 0.6), 0.3, &scoring);
        assert_eq!(faults, vec!["left knee drifting past ankle".to_string(), "hips uneven".to_string()]);
    }

    #[test]
    fn test_advice_is_phase_specific() {
        let config = ExerciseConfig::default();
        assert_eq!(Squat.advise(Phase::Engaged, 0.08, 130.0, &config), "knee angle insufficient");
        assert_eq!(Squat.advise(Phase::Engaged, 0.08, 95.0, &config), "good form");
        assert_eq!(Squat.advise(Phase::Resting, 0.0, 175.0, &config), "ready");
    }
}
