//! Session engine: the single entry point a host application drives.

use crate::{
    config::{Config, ExerciseConfig, ExerciseKind},
    error::Result,
    exercises::{movement_for, step, CounterState, FrameResult, FrameStatus, Movement, Phase},
    pose::PoseFrame,
    scoring::FormScorer,
    session::{FrameRef, SessionAggregator, SessionSummary},
};
use log::info;

/// Counts and scores repetitions for one subject.
///
/// Each engine owns its counter, baseline and aggregate outright; run one per
/// concurrent session.
pub struct RepEngine {
    config: Config,
    movement: Box<dyn Movement>,
    state: CounterState,
    scorer: FormScorer,
    aggregator: SessionAggregator,
    frames_seen: u64,
}

impl RepEngine {
    /// Create an engine, validating the configuration first
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ConfigError`] if any setting is invalid
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        info!(
            "Counting {} (depth > {}, angle < {}, window {})",
            config.exercise.kind,
            config.exercise.depth_threshold,
            config.exercise.angle_threshold,
            config.exercise.smoothing_window
        );

        Ok(Self {
            movement: movement_for(config.exercise.kind),
            state: CounterState::new(&config)?,
            scorer: FormScorer::new(&config),
            aggregator: SessionAggregator::new(),
            frames_seen: 0,
            config,
        })
    }

    /// Create an engine with default baseline, smoothing and scoring settings
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ConfigError`] if the exercise settings are invalid
    pub fn from_exercise(exercise: ExerciseConfig) -> Result<Self> {
        Self::new(Config::for_exercise(exercise))
    }

    /// Process one frame. Counted reps are scored and recorded before returning.
    pub fn submit_frame(&mut self, frame: &PoseFrame) -> FrameResult {
        let frame_ref = FrameRef {
            frame_index: self.frames_seen,
            timestamp_ms: frame.timestamp_ms,
        };
        self.frames_seen += 1;

        let (mut result, capture) = step(self.movement.as_ref(), &self.config.exercise, &mut self.state, frame);

        if let Some(capture) = capture {
            let score = self.scorer.score_rep(self.movement.as_ref(), &capture);
            self.aggregator
                .record(score.clone(), frame_ref, capture.event.set_number);
            result.rep_score = Some(score);
        }

        let evaluable = matches!(result.status, FrameStatus::Evaluated | FrameStatus::InsufficientRange);
        if self.config.scoring.live_feedback && evaluable {
            result.live_score = Some(
                self.scorer
                    .score_frame(self.movement.as_ref(), frame, result.depth, result.angle),
            );
        }

        result
    }

    /// Close the current set; the baseline carries over. Returns the new set number.
    pub fn start_new_set(&mut self) -> u32 {
        let set_number = self.aggregator.start_new_set();
        self.state.begin_set(set_number);
        info!("Starting set {set_number}");
        set_number
    }

    /// Snapshot the session statistics
    #[must_use]
    pub fn finalize_session(&self) -> SessionSummary {
        self.aggregator.finalize()
    }

    /// Discard all progress, including the learned baseline
    pub fn reset(&mut self) {
        self.state.reset();
        self.aggregator.reset();
        self.frames_seen = 0;
        info!("Session reset");
    }

    /// Reps counted so far
    #[must_use]
    pub fn count(&self) -> u32 {
        self.state.count()
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Set new reps are attributed to
    #[must_use]
    pub fn current_set(&self) -> u32 {
        self.state.set_number()
    }

    /// Exercise being counted
    #[must_use]
    pub fn kind(&self) -> ExerciseKind {
        self.movement.kind()
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Frames submitted since construction or the last reset
    #[must_use]
    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }
}
