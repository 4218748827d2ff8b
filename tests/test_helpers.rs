//! Synthetic pose builders shared by the integration tests
#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rep_counter::{ExerciseKind, Joint, PoseFrame, RepEngine};

/// Resting height of the tracked joints
pub const REST_Y: f64 = 0.5;

/// Segment length of every limb
const LIMB: f64 = 0.2;

/// Middle and end joint of a limb hanging from `top`, bent to `angle` at the middle
fn bent_limb(top: (f64, f64), angle: f64) -> ((f64, f64), (f64, f64)) {
    let theta = (180.0 - angle).to_radians();
    let mid = (top.0 + LIMB * theta.sin(), top.1 + LIMB * theta.cos());
    let end = (mid.0, mid.1 + LIMB);
    (mid, end)
}

/// Squat pose: hips lowered by `depth`, both knees at `knee_angle`
pub fn squat_frame(ts: u64, depth: f64, knee_angle: f64) -> PoseFrame {
    let hip_y = REST_Y + depth;
    let mut frame = PoseFrame::empty(ts);
    for (hip, knee, ankle, x) in [
        (Joint::LeftHip, Joint::LeftKnee, Joint::LeftAnkle, 0.45),
        (Joint::RightHip, Joint::RightKnee, Joint::RightAnkle, 0.55),
    ] {
        let (k, a) = bent_limb((x, hip_y), knee_angle);
        frame = frame
            .with_keypoint(hip, x, hip_y, 0.9)
            .with_keypoint(knee, k.0, k.1, 0.9)
            .with_keypoint(ankle, a.0, a.1, 0.9);
    }
    frame
}

/// Side-on push-up: shoulders lowered by `depth`, elbows at `elbow_angle`, body straight
pub fn pushup_frame(ts: u64, depth: f64, elbow_angle: f64) -> PoseFrame {
    let shoulder_y = REST_Y + depth;
    let mut frame = PoseFrame::empty(ts);
    for (shoulder, elbow, wrist, hip, ankle) in [
        (Joint::LeftShoulder, Joint::LeftElbow, Joint::LeftWrist, Joint::LeftHip, Joint::LeftAnkle),
        (Joint::RightShoulder, Joint::RightElbow, Joint::RightWrist, Joint::RightHip, Joint::RightAnkle),
    ] {
        let (e, w) = bent_limb((0.3, shoulder_y), elbow_angle);
        frame = frame
            .with_keypoint(shoulder, 0.3, shoulder_y, 0.9)
            .with_keypoint(elbow, e.0, e.1, 0.9)
            .with_keypoint(wrist, w.0, w.1, 0.9)
            .with_keypoint(hip, 0.55, shoulder_y, 0.9)
            .with_keypoint(ankle, 0.8, shoulder_y, 0.9);
    }
    frame
}

/// Lunge: hips lowered by `depth`, front (left) knee at `knee_angle`, back leg straight
pub fn lunge_frame(ts: u64, depth: f64, knee_angle: f64) -> PoseFrame {
    let hip_y = REST_Y + depth;
    let (k, a) = bent_limb((0.5, hip_y), knee_angle);
    PoseFrame::empty(ts)
        .with_keypoint(Joint::LeftShoulder, 0.5, hip_y - 0.3, 0.9)
        .with_keypoint(Joint::RightShoulder, 0.5, hip_y - 0.3, 0.9)
        .with_keypoint(Joint::LeftHip, 0.5, hip_y, 0.9)
        .with_keypoint(Joint::RightHip, 0.5, hip_y, 0.9)
        .with_keypoint(Joint::LeftKnee, k.0, k.1, 0.9)
        .with_keypoint(Joint::LeftAnkle, a.0, a.1, 0.9)
        .with_keypoint(Joint::RightKnee, 0.5, hip_y + LIMB, 0.9)
        .with_keypoint(Joint::RightAnkle, 0.5, hip_y + 2.0 * LIMB, 0.9)
}

/// Frame builder for `kind`
pub fn frame_for(kind: ExerciseKind, ts: u64, depth: f64, angle: f64) -> PoseFrame {
    match kind {
        ExerciseKind::Squat => squat_frame(ts, depth, angle),
        ExerciseKind::Pushup => pushup_frame(ts, depth, angle),
        ExerciseKind::Lunge => lunge_frame(ts, depth, angle),
    }
}

/// Depth and angle of a clean rep for `kind`, well past the default thresholds
pub fn deep_pose(kind: ExerciseKind) -> (f64, f64) {
    match kind {
        ExerciseKind::Squat => (0.08, 110.0),
        ExerciseKind::Pushup => (0.08, 80.0),
        ExerciseKind::Lunge => (0.12, 90.0),
    }
}

/// Angle while resting
pub const REST_ANGLE: f64 = 175.0;

/// One full cycle: settle at rest, hold the bottom, stand back up
pub fn ideal_cycle(kind: ExerciseKind, ts: &mut u64) -> Vec<PoseFrame> {
    let (depth, angle) = deep_pose(kind);
    let mut frames = Vec::new();
    for (d, a, n) in [(0.0, REST_ANGLE, 6), (depth, angle, 6), (0.0, REST_ANGLE, 8)] {
        for _ in 0..n {
            *ts += 100;
            frames.push(frame_for(kind, *ts, d, a));
        }
    }
    frames
}

/// `cycles` consecutive ideal cycles
pub fn ideal_session(kind: ExerciseKind, cycles: usize) -> Vec<PoseFrame> {
    let mut ts = 0;
    (0..cycles).flat_map(|_| ideal_cycle(kind, &mut ts)).collect()
}

/// Rest frames before and after a paced session
pub const PACED_REST_FRAMES: usize = 10;

/// One rep at a steady pace: a cosine ease from rest to the bottom and back over `frames_per_rep` frames
pub fn paced_rep(kind: ExerciseKind, frames_per_rep: usize, ts: &mut u64) -> Vec<PoseFrame> {
    let (depth, angle) = deep_pose(kind);
    (0..frames_per_rep)
        .map(|t| {
            let progress = (1.0 - (std::f64::consts::TAU * t as f64 / frames_per_rep as f64).cos()) / 2.0;
            *ts += 100;
            frame_for(kind, *ts, depth * progress, REST_ANGLE - (REST_ANGLE - angle) * progress)
        })
        .collect()
}

/// `reps` paced reps between two stretches of standing still
pub fn paced_session(kind: ExerciseKind, reps: usize, frames_per_rep: usize) -> Vec<PoseFrame> {
    let mut ts = 0;
    let mut frames = Vec::new();
    let rest = |ts: &mut u64, frames: &mut Vec<PoseFrame>| {
        for _ in 0..PACED_REST_FRAMES {
            *ts += 100;
            frames.push(frame_for(kind, *ts, 0.0, REST_ANGLE));
        }
    };

    rest(&mut ts, &mut frames);
    for _ in 0..reps {
        frames.extend(paced_rep(kind, frames_per_rep, &mut ts));
    }
    rest(&mut ts, &mut frames);
    frames
}

/// Move every keypoint down by `per_frame` more on each successive frame
pub fn with_drift(frames: &[PoseFrame], per_frame: f64) -> Vec<PoseFrame> {
    frames
        .iter()
        .enumerate()
        .map(|(i, frame)| {
            let mut drifted = frame.clone();
            for kp in &mut drifted.keypoints {
                kp.y += per_frame * i as f64;
            }
            drifted
        })
        .collect()
}

/// Shift every keypoint by uniform noise in `[-amplitude, amplitude]`
pub fn jitter(frames: &[PoseFrame], amplitude: f64, seed: u64) -> Vec<PoseFrame> {
    let mut rng = StdRng::seed_from_u64(seed);
    frames
        .iter()
        .map(|frame| {
            let mut noisy = frame.clone();
            for kp in &mut noisy.keypoints {
                kp.x += rng.gen_range(-amplitude..=amplitude);
                kp.y += rng.gen_range(-amplitude..=amplitude);
            }
            noisy
        })
        .collect()
}

/// Submit every frame and return the final count
pub fn run(engine: &mut RepEngine, frames: &[PoseFrame]) -> u32 {
    frames.iter().map(|f| engine.submit_frame(f).count).last().unwrap_or(0)
}
