//! Repetition detection and form scoring from streamed body keypoints.
//!
//! The engine consumes one [`PoseFrame`] at a time (typically ~10 Hz from an
//! external pose estimator) and turns the stream into counted repetitions with
//! a 0–100 quality score, while tolerating noisy, occluded and jittery input.
//!
//! The per-frame pipeline:
//! 1. Required joints are resolved through a confidence gate
//! 2. The tracked position is smoothed and compared with a drifting baseline
//! 3. The joint angle is smoothed through a configurable filter
//! 4. A two-phase state machine with hysteresis decides when a rep completes
//! 5. Completed reps are scored and folded into session statistics
//!
//! # Examples
//!
//! ## Counting squats
//!
//! ```
//! use rep_counter::{Config, ExerciseConfig, ExerciseKind, Joint, PoseFrame, RepEngine};
//!
//! # fn main() -> rep_counter::Result<()> {
//! let exercise = ExerciseConfig::for_kind(ExerciseKind::Squat).with_thresholds(0.05, 140.0);
//! let mut engine = RepEngine::new(Config::for_exercise(exercise))?;
//!
//! let frame = PoseFrame::empty(0)
//!     .with_keypoint(Joint::LeftHip, 0.45, 0.50, 0.9)
//!     .with_keypoint(Joint::LeftKnee, 0.45, 0.70, 0.9)
//!     .with_keypoint(Joint::LeftAnkle, 0.45, 0.90, 0.9);
//!
//! let result = engine.submit_frame(&frame);
//! println!("{} reps, phase {}, {}", result.count, result.phase_label, result.feedback);
//!
//! engine.start_new_set();
//! let summary = engine.finalize_session();
//! assert_eq!(summary.total_count, 0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Smoothing filters
//!
//! ```
//! use rep_counter::filters::create_filter;
//!
//! # fn main() -> rep_counter::Result<()> {
//! let mut filter = create_filter("median:3", 5)?;
//! for angle in [170.0, 20.0, 168.0] {
//!     let smoothed = filter.apply(angle);
//!     println!("{smoothed:.1}");
//! }
//! filter.reset();
//! # Ok(())
//! # }
//! ```

/// Geometry and statistics helpers
pub mod utils;

/// Joints, keypoints and frames
pub mod pose;

/// Confidence-gated joint lookup
pub mod keypoints;

/// Signal filtering algorithms for smoothing metrics
pub mod filters;

/// Resting-position tracking
pub mod baseline;

/// Per-exercise state machines
pub mod exercises;

/// Form scoring
pub mod scoring;

/// Session statistics
pub mod session;

/// Session engine
pub mod engine;

/// Recorded stream replay
pub mod replay;

/// Command-line arguments
pub mod cli;

/// Error types and result handling
pub mod error;

/// Constants used throughout the engine
pub mod constants;

/// Configuration management
pub mod config;

pub use config::{Config, ExerciseConfig, ExerciseKind};
pub use engine::RepEngine;
pub use error::{Error, Result};
pub use exercises::{FrameResult, FrameStatus, Phase, RepetitionEvent};
pub use pose::{Joint, Keypoint, PoseFrame};
pub use scoring::{ScoreSample, SubScores};
pub use session::{SessionSummary, SetSummary};
