//! Replays a recorded frame stream through a [`RepEngine`].
//!
//! Input is JSON lines, one record per line:
//!
//! ```text
//! {"type":"frame","timestamp_ms":0,"keypoints":[{"joint":"left_hip","x":0.45,"y":0.5,"score":0.9}]}
//! {"type":"new_set"}
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Lines that fail to
//! parse are skipped with a warning; read errors abort the replay.

use crate::engine::RepEngine;
use crate::error::{Error, Result};
use crate::exercises::RepetitionEvent;
use crate::pose::PoseFrame;
use crate::scoring::ScoreSample;
use crate::session::SessionSummary;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::io::BufRead;

/// One line of a recorded session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayRecord {
    /// A pose sample
    Frame(PoseFrame),
    /// Set boundary
    NewSet,
}

impl ReplayRecord {
    /// Parse a single line
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReplayError`] if the line is not a valid record
    pub fn parse(line: &str) -> Result<Self> {
        serde_json::from_str(line).map_err(|e| Error::ReplayError(format!("Invalid record: {e}")))
    }
}

/// A counted rep with its score, as seen during replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayedRep {
    /// The repetition
    pub event: RepetitionEvent,
    /// Its score, when one was produced
    pub score: Option<ScoreSample>,
}

/// Outcome of a replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    /// Frames submitted to the engine
    pub frames: u64,
    /// Malformed lines skipped
    pub skipped: u64,
    /// Reps in the order they were counted
    pub reps: Vec<ReplayedRep>,
    /// Session statistics at end of input
    pub summary: SessionSummary,
}

/// Feed every record from `reader` into `engine`
///
/// # Errors
///
/// Returns an error if reading from `reader` fails
pub fn replay<R: BufRead>(engine: &mut RepEngine, reader: R) -> Result<ReplayReport> {
    let mut frames = 0u64;
    let mut skipped = 0u64;
    let mut reps = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match ReplayRecord::parse(trimmed) {
            Ok(ReplayRecord::Frame(frame)) => {
                frames += 1;
                let result = engine.submit_frame(&frame);
                debug!(
                    "t={} {} count={} {:?}",
                    frame.timestamp_ms, result.phase_label, result.count, result.status
                );
                if let Some(event) = result.repetition {
                    info!(
                        "Rep {} at {} ms, score {}",
                        event.sequence,
                        event.timestamp_ms,
                        result.rep_score.as_ref().map_or(0, |s| s.overall)
                    );
                    reps.push(ReplayedRep {
                        event,
                        score: result.rep_score,
                    });
                }
            }
            Ok(ReplayRecord::NewSet) => {
                engine.start_new_set();
            }
            Err(e) => {
                warn!("Skipping line {}: {}", index + 1, e);
                skipped += 1;
            }
        }
    }

    Ok(ReplayReport {
        frames,
        skipped,
        reps,
        summary: engine.finalize_session(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::pose::Joint;
    use std::io::Cursor;

    #[test]
    fn test_parse_records() {
        let frame = ReplayRecord::parse(
            r#"{"type":"frame","timestamp_ms":40,"keypoints":[{"joint":"left_hip","x":0.4,"y":0.5,"score":0.9}]}"#,
        )
        .unwrap();
        assert_eq!(
            frame,
            ReplayRecord::Frame(PoseFrame::empty(40).with_keypoint(Joint::LeftHip, 0.4, 0.5, 0.9))
        );

        assert_eq!(ReplayRecord::parse(r#"{"type":"new_set"}"#).unwrap(), ReplayRecord::NewSet);
        assert!(ReplayRecord::parse(r#"{"type":"frame","keypoints":"nope"}"#).is_err());
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let input = "\
# recorded session
{\"type\":\"frame\",\"timestamp_ms\":0}

not json
{\"type\":\"new_set\"}
{\"type\":\"frame\",\"timestamp_ms\":100,\"keypoints\":[]}
";
        let mut engine = RepEngine::new(Config::default()).unwrap();
        let report = replay(&mut engine, Cursor::new(input)).unwrap();

        assert_eq!(report.frames, 2);
        assert_eq!(report.skipped, 1);
        assert!(report.reps.is_empty());
        assert_eq!(report.summary.sets.len(), 2);
        assert_eq!(engine.current_set(), 2);
    }
}
