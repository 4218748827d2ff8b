//! Per-exercise repetition state machines.
//!
//! Every exercise is a two-phase machine, Resting ⇄ Engaged. The phase logic,
//! smoothing and counting rules are shared and live in [`step`]; what differs
//! per exercise (which joints are tracked, how form is judged, what the phases
//! are called) sits behind the [`Movement`] trait, chosen once when a session
//! is built.

/// Squat: hips drop, knees bend
pub mod squat;

/// Push-up: shoulders drop, elbows bend
pub mod pushup;

/// Lunge: hips drop, front knee bends
pub mod lunge;

use crate::baseline::BaselineTracker;
use crate::config::{Config, ExerciseConfig, ExerciseKind, ScoringConfig};
use crate::constants::{FEEDBACK_CALIBRATING, FEEDBACK_INSUFFICIENT_RANGE, FEEDBACK_MISSING, FEEDBACK_STALE};
use crate::filters::SignalFilter;
use crate::keypoints::{chain, most_bent_angle, pair_center};
use crate::pose::{Joint, PoseFrame};
use crate::scoring::ScoreSample;
use crate::Result;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Phase of the two-state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Standing, arms extended, back at rest
    Resting,
    /// Inside a candidate repetition
    Engaged,
}

/// How a frame was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameStatus {
    /// Metrics computed and transitions evaluated
    Evaluated,
    /// Required joints absent or under the confidence gate
    MissingDetection,
    /// Joints present but too close together for a reliable angle
    DegenerateGeometry,
    /// Resting position not established yet
    Calibrating,
    /// A candidate repetition ended without enough range and was dropped
    InsufficientRange,
    /// Timestamp went backwards; frame ignored
    Stale,
}

/// One completed, counted repetition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepetitionEvent {
    /// 1-based position in the session
    pub sequence: u32,
    /// Set the rep belongs to
    pub set_number: u32,
    /// Most bent smoothed angle reached, degrees
    pub peak_angle: f64,
    /// Deepest smoothed displacement from baseline
    pub peak_depth: f64,
    /// When the candidate started
    pub started_ms: u64,
    /// When the rep completed
    pub timestamp_ms: u64,
    /// Frames spent engaged
    pub engaged_frames: u32,
}

/// Data captured for scoring a counted repetition
#[derive(Debug, Clone)]
pub struct RepCapture {
    /// The emitted event
    pub event: RepetitionEvent,
    /// Frame at which the deepest point was reached
    pub peak_frame: PoseFrame,
    /// Lateral position of the tracked joints on every engaged frame
    pub sway: Vec<f64>,
}

/// Per-frame output handed back to the caller
#[derive(Debug, Clone, Serialize)]
pub struct FrameResult {
    /// Reps counted so far in the session
    pub count: u32,
    /// Phase after this frame
    pub phase: Phase,
    /// Exercise-specific name of the phase
    pub phase_label: &'static str,
    /// Smoothed displacement from baseline, when computable
    pub depth: Option<f64>,
    /// Smoothed joint angle, when computable
    pub angle: Option<f64>,
    /// How the frame was handled
    pub status: FrameStatus,
    /// Advisory text; never affects counting
    pub feedback: String,
    /// Set when this frame completed a counted rep
    pub repetition: Option<RepetitionEvent>,
    /// Score of the rep completed on this frame
    pub rep_score: Option<ScoreSample>,
    /// Single-frame score, when live feedback is enabled
    pub live_score: Option<ScoreSample>,
}

/// Raw per-frame values extracted by a [`Movement`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Vertical position of the tracked joint pair
    pub tracked: f64,
    /// Horizontal position of the tracked joint pair
    pub sway: f64,
    /// Most bent pivot angle, degrees
    pub angle: f64,
}

/// Outcome of extracting a [`Measurement`] from a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Observation {
    /// Everything required was found
    Measured(Measurement),
    /// Required joints missing or below the gate
    Missing,
    /// Joints found but every pivot angle was undefined
    Degenerate,
}

/// Exercise-specific behaviour plugged into the shared state machine
pub trait Movement: Send + Sync {
    /// Which exercise this is
    fn kind(&self) -> ExerciseKind;

    /// Human-readable phase name
    fn phase_label(&self, phase: Phase) -> &'static str;

    /// Extract the tracked position and pivot angle from a frame
    fn observe(&self, frame: &PoseFrame, min_score: f64) -> Observation;

    /// Advisory text for an evaluated frame
    fn advise(&self, phase: Phase, depth: f64, angle: f64, config: &ExerciseConfig) -> String;

    /// Violated alignment rules, one message each; unevaluable rules are skipped
    fn alignment_faults(&self, frame: &PoseFrame, min_score: f64, scoring: &ScoringConfig) -> Vec<String>;

    /// Cue given when the pivot angle falls short of full range
    fn range_cue(&self) -> &'static str;
}

/// Select the movement implementation for `kind`
#[must_use]
pub fn movement_for(kind: ExerciseKind) -> Box<dyn Movement> {
    match kind {
        ExerciseKind::Squat => Box::new(squat::Squat),
        ExerciseKind::Pushup => Box::new(pushup::PushUp),
        ExerciseKind::Lunge => Box::new(lunge::Lunge),
    }
}

/// Shared observation logic: center of a bilateral pair plus the most bent chain.
///
/// Reports `Degenerate` when at least one chain was fully detected but none
/// produced a usable angle.
#[must_use]
pub fn observe_pair_and_chains(
    frame: &PoseFrame,
    min_score: f64,
    tracked: (Joint, Joint),
    chains: &[[Joint; 3]],
) -> Observation {
    let Some(center) = pair_center(frame, tracked.0, tracked.1, min_score) else {
        return Observation::Missing;
    };

    match most_bent_angle(frame, chains, min_score) {
        Some(angle) => Observation::Measured(Measurement {
            tracked: center.1,
            sway: center.0,
            angle,
        }),
        None if chains.iter().any(|joints| chain(frame, *joints, min_score).is_some()) => {
            Observation::Degenerate
        }
        None => Observation::Missing,
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    started_ms: u64,
    peak_depth: f64,
    peak_angle: f64,
    peak_frame: PoseFrame,
    engaged_frames: u32,
    sway: Vec<f64>,
}

impl Candidate {
    fn open(frame: &PoseFrame, depth: f64, angle: f64, sway: f64) -> Self {
        Self {
            started_ms: frame.timestamp_ms,
            peak_depth: depth,
            peak_angle: angle,
            peak_frame: frame.clone(),
            engaged_frames: 1,
            sway: vec![sway],
        }
    }

    fn extend(&mut self, frame: &PoseFrame, depth: f64, angle: f64, sway: f64) {
        self.engaged_frames += 1;
        self.sway.push(sway);
        self.peak_angle = self.peak_angle.min(angle);
        if depth > self.peak_depth {
            self.peak_depth = depth;
            self.peak_frame = frame.clone();
        }
    }
}

/// Mutable per-session progress of one exercise counter
///
/// Owned by exactly one frame-processing sequence.
pub struct CounterState {
    phase: Phase,
    count: u32,
    set_number: u32,
    baseline: BaselineTracker,
    angle_filter: Box<dyn SignalFilter>,
    candidate: Option<Candidate>,
    last_timestamp_ms: Option<u64>,
    last_depth: Option<f64>,
    last_angle: Option<f64>,
}

impl CounterState {
    /// Fresh state in the Resting phase of set 1
    ///
    /// # Errors
    ///
    /// Returns an error if the smoothing or baseline settings are invalid
    pub fn new(config: &Config) -> Result<Self> {
        let angle_filter = config.create_angle_filter()?;
        debug!("Angle smoothing with {}", angle_filter.name());

        Ok(Self {
            phase: Phase::Resting,
            count: 0,
            set_number: 1,
            baseline: BaselineTracker::new(config.exercise.smoothing_window, &config.baseline)?,
            angle_filter,
            candidate: None,
            last_timestamp_ms: None,
            last_depth: None,
            last_angle: None,
        })
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Reps counted so far
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Set that new reps are attributed to
    #[must_use]
    pub fn set_number(&self) -> u32 {
        self.set_number
    }

    /// Resting-position tracker
    #[must_use]
    pub fn baseline(&self) -> &BaselineTracker {
        &self.baseline
    }

    /// True while a candidate rep is open
    #[must_use]
    pub fn in_candidate(&self) -> bool {
        self.candidate.is_some()
    }

    /// Drop any in-flight candidate and return to Resting
    pub fn cancel_candidate(&mut self) {
        if self.candidate.take().is_some() {
            debug!("Candidate repetition cancelled");
        }
        self.phase = Phase::Resting;
    }

    /// Move to a new set: peak tracking restarts, the baseline is kept
    pub fn begin_set(&mut self, set_number: u32) {
        self.cancel_candidate();
        self.set_number = set_number;
    }

    /// Return to the freshly-constructed state
    pub fn reset(&mut self) {
        self.cancel_candidate();
        self.count = 0;
        self.set_number = 1;
        self.baseline.reset();
        self.angle_filter.reset();
        self.last_timestamp_ms = None;
        self.last_depth = None;
        self.last_angle = None;
    }

    fn unchanged(&self, movement: &dyn Movement, status: FrameStatus, feedback: &str) -> FrameResult {
        FrameResult {
            count: self.count,
            phase: self.phase,
            phase_label: movement.phase_label(self.phase),
            depth: self.last_depth,
            angle: self.last_angle,
            status,
            feedback: feedback.to_string(),
            repetition: None,
            rep_score: None,
            live_score: None,
        }
    }
}

/// Advance `state` by one frame.
///
/// Frames without the required joints leave the state untouched. Thresholds
/// are only ever compared against smoothed values. A counted rep is returned
/// alongside the result so it can be scored.
pub fn step(
    movement: &dyn Movement,
    config: &ExerciseConfig,
    state: &mut CounterState,
    frame: &PoseFrame,
) -> (FrameResult, Option<RepCapture>) {
    if state.last_timestamp_ms.is_some_and(|last| frame.timestamp_ms < last) {
        return (state.unchanged(movement, FrameStatus::Stale, FEEDBACK_STALE), None);
    }
    state.last_timestamp_ms = Some(frame.timestamp_ms);

    let measurement = match movement.observe(frame, config.confidence_gate) {
        Observation::Measured(m) => m,
        Observation::Missing => {
            return (state.unchanged(movement, FrameStatus::MissingDetection, FEEDBACK_MISSING), None);
        }
        Observation::Degenerate => {
            return (state.unchanged(movement, FrameStatus::DegenerateGeometry, FEEDBACK_MISSING), None);
        }
    };

    let angle = state.angle_filter.apply(measurement.angle);
    state.last_angle = Some(angle);

    // The baseline only learns from the resting pose, never from the way down or up
    let at_rest = state.phase == Phase::Resting && angle > config.release_angle();
    state.baseline.push(measurement.tracked);
    state.baseline.adapt(at_rest);

    let Some(depth) = state.baseline.displacement() else {
        return (
            state.unchanged(movement, FrameStatus::Calibrating, FEEDBACK_CALIBRATING),
            None,
        );
    };
    state.last_depth = Some(depth);

    let mut status = FrameStatus::Evaluated;
    let mut capture = None;

    match state.phase {
        Phase::Resting => {
            if depth > config.depth_threshold && angle < config.angle_threshold {
                debug!(
                    "{} engaged at {} ms (depth {depth:.3}, angle {angle:.1})",
                    movement.kind(),
                    frame.timestamp_ms
                );
                state.phase = Phase::Engaged;
                state.candidate = Some(Candidate::open(frame, depth, angle, measurement.sway));
            }
        }
        Phase::Engaged => {
            if depth < config.release_depth() || angle > config.release_angle() {
                state.phase = Phase::Resting;
                if let Some(candidate) = state.candidate.take() {
                    if candidate.peak_depth >= config.depth_threshold
                        && candidate.engaged_frames >= config.min_engaged_frames
                    {
                        state.count += 1;
                        state.baseline.request_reanchor();
                        let event = RepetitionEvent {
                            sequence: state.count,
                            set_number: state.set_number,
                            peak_angle: candidate.peak_angle,
                            peak_depth: candidate.peak_depth,
                            started_ms: candidate.started_ms,
                            timestamp_ms: frame.timestamp_ms,
                            engaged_frames: candidate.engaged_frames,
                        };
                        info!(
                            "{} rep {} counted (set {}, depth {:.3}, angle {:.1})",
                            movement.kind(),
                            event.sequence,
                            event.set_number,
                            event.peak_depth,
                            event.peak_angle
                        );
                        capture = Some(RepCapture {
                            event,
                            peak_frame: candidate.peak_frame,
                            sway: candidate.sway,
                        });
                    } else {
                        debug!(
                            "{} candidate discarded (peak depth {:.3}, {} frames)",
                            movement.kind(),
                            candidate.peak_depth,
                            candidate.engaged_frames
                        );
                        status = FrameStatus::InsufficientRange;
                    }
                }
            } else if let Some(candidate) = state.candidate.as_mut() {
                candidate.extend(frame, depth, angle, measurement.sway);
            }
        }
    }

    let feedback = if status == FrameStatus::InsufficientRange {
        FEEDBACK_INSUFFICIENT_RANGE.to_string()
    } else {
        movement.advise(state.phase, depth, angle, config)
    };

    let result = FrameResult {
        count: state.count,
        phase: state.phase,
        phase_label: movement.phase_label(state.phase),
        depth: Some(depth),
        angle: Some(angle),
        status,
        feedback,
        repetition: capture.as_ref().map(|c| c.event.clone()),
        rep_score: None,
        live_score: None,
    };

    (result, capture)
}
