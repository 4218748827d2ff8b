//! Command-line arguments for the replay binary.

use crate::config::{Config, ExerciseConfig, ExerciseKind};
use crate::error::Result;
use clap::Parser;
use log::info;

/// Count and score repetitions in a recorded keypoint stream
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Exercise to count (squat, pushup, lunge)
    #[arg(short, long)]
    pub exercise: Option<ExerciseKind>,

    /// JSON-lines frame stream, `-` for stdin
    #[arg(short, long, default_value = "-")]
    pub input: String,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    pub config: Option<String>,

    /// Override the depth threshold
    #[arg(long)]
    pub depth_threshold: Option<f64>,

    /// Override the angle threshold, degrees
    #[arg(long)]
    pub angle_threshold: Option<f64>,

    /// Override the smoothing window length
    #[arg(short, long)]
    pub window: Option<usize>,

    /// Score every evaluable frame, not just completed reps
    #[arg(long)]
    pub live_feedback: bool,

    /// Print the session summary as JSON
    #[arg(long)]
    pub summary_json: bool,

    /// Print an example configuration file and exit
    #[arg(long)]
    pub example_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,
}

impl Args {
    /// Resolve the engine configuration: file (if any), then exercise, then overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be loaded
    pub fn build_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading configuration from: {path}");
                Config::from_file(path)?
            }
            None => Config::default(),
        };

        if let Some(kind) = self.exercise {
            if kind != config.exercise.kind {
                config.exercise = ExerciseConfig::for_kind(kind);
            }
        }
        if let Some(depth) = self.depth_threshold {
            config.exercise.depth_threshold = depth;
        }
        if let Some(angle) = self.angle_threshold {
            config.exercise.angle_threshold = angle;
        }
        if let Some(window) = self.window {
            config.exercise.smoothing_window = window;
        }
        if self.live_feedback {
            config.scoring.live_feedback = true;
        }

        Ok(config)
    }
}
