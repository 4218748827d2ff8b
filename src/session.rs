//! Session-level statistics over scored repetitions.

use crate::error::Result;
use crate::scoring::ScoreSample;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where in the input stream a scored sample came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRef {
    /// 0-based index of the frame among all submitted frames
    pub frame_index: u64,
    /// Timestamp carried by the frame
    pub timestamp_ms: u64,
}

/// A score together with the frame it refers to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredFrame {
    /// The score
    pub score: ScoreSample,
    /// The frame it was taken on
    pub frame: FrameRef,
}

/// Statistics for one set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetSummary {
    /// 1-based set number
    pub set_number: u32,
    /// Reps recorded in the set
    pub count: u32,
    /// Mean overall score, 0 when empty
    pub average_score: f64,
    /// Highest-scoring rep of the set
    pub best: Option<ScoredFrame>,
    /// Lowest-scoring rep of the set
    pub worst: Option<ScoredFrame>,
}

/// Immutable snapshot handed off at the end of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Reps recorded across all sets
    pub total_count: u32,
    /// Mean overall score, 0 when empty
    pub average_score: f64,
    /// Highest-scoring rep of the session
    pub best: Option<ScoredFrame>,
    /// Lowest-scoring rep of the session
    pub worst: Option<ScoredFrame>,
    /// Per-set breakdown in set order
    pub sets: Vec<SetSummary>,
}

impl SessionSummary {
    /// Pretty-printed JSON for hand-off to storage or display
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Running count, mean and extremes
#[derive(Debug, Clone, Default)]
struct RunningStats {
    count: u32,
    mean: f64,
    best: Option<ScoredFrame>,
    worst: Option<ScoredFrame>,
}

impl RunningStats {
    fn record(&mut self, scored: &ScoredFrame) {
        self.count += 1;
        let value = f64::from(scored.score.overall);
        self.mean += (value - self.mean) / f64::from(self.count);

        // Strict comparisons: ties keep the earlier sample
        if self.best.as_ref().map_or(true, |b| scored.score.overall > b.score.overall) {
            self.best = Some(scored.clone());
        }
        if self.worst.as_ref().map_or(true, |w| scored.score.overall < w.score.overall) {
            self.worst = Some(scored.clone());
        }
    }
}

/// Folds scored repetitions into session statistics
#[derive(Debug, Clone)]
pub struct SessionAggregator {
    overall: RunningStats,
    sets: BTreeMap<u32, RunningStats>,
    current_set: u32,
}

impl Default for SessionAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionAggregator {
    /// Empty aggregator positioned on set 1
    #[must_use]
    pub fn new() -> Self {
        let mut sets = BTreeMap::new();
        sets.insert(1, RunningStats::default());
        Self {
            overall: RunningStats::default(),
            sets,
            current_set: 1,
        }
    }

    /// Set that is currently open
    #[must_use]
    pub fn current_set(&self) -> u32 {
        self.current_set
    }

    /// Reps recorded so far
    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.overall.count
    }

    /// Fold one scored rep into the session and into bucket `set_number`
    pub fn record(&mut self, sample: ScoreSample, frame: FrameRef, set_number: u32) {
        let scored = ScoredFrame { score: sample, frame };
        self.overall.record(&scored);
        self.sets.entry(set_number).or_default().record(&scored);
    }

    /// Close the current set and open the next; returns the new set number
    pub fn start_new_set(&mut self) -> u32 {
        let closed = self.sets.get(&self.current_set).map_or(0, |s| s.count);
        info!("Set {} closed with {} reps", self.current_set, closed);

        self.current_set += 1;
        self.sets.entry(self.current_set).or_default();
        self.current_set
    }

    /// Snapshot of everything recorded so far
    #[must_use]
    pub fn finalize(&self) -> SessionSummary {
        let summary = SessionSummary {
            total_count: self.overall.count,
            average_score: self.overall.mean,
            best: self.overall.best.clone(),
            worst: self.overall.worst.clone(),
            sets: self
                .sets
                .iter()
                .map(|(set_number, stats)| SetSummary {
                    set_number: *set_number,
                    count: stats.count,
                    average_score: stats.mean,
                    best: stats.best.clone(),
                    worst: stats.worst.clone(),
                })
                .collect(),
        };

        info!(
            "Session finalized: {} reps over {} sets, average score {:.1}",
            summary.total_count,
            summary.sets.len(),
            summary.average_score
        );

        summary
    }

    /// Discard everything and return to set 1
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::SubScores;

    fn sample(overall: u8) -> ScoreSample {
        ScoreSample {
            overall,
            sub_scores: SubScores {
                alignment: f64::from(overall),
                range: f64::from(overall),
                stability: None,
            },
            feedback: vec!["good form".to_string()],
        }
    }

    fn at(index: u64) -> FrameRef {
        FrameRef {
            frame_index: index,
            timestamp_ms: index * 100,
        }
    }

    #[test]
    fn test_empty_session() {
        let summary = SessionAggregator::new().finalize();
        assert_eq!(summary.total_count, 0);
        assert_eq!(summary.average_score, 0.0);
        assert!(summary.best.is_none());
        assert!(summary.worst.is_none());
        assert_eq!(summary.sets.len(), 1);
        assert_eq!(summary.sets[0].count, 0);
    }

    #[test]
    fn test_running_mean_and_extremes() {
        let mut agg = SessionAggregator::new();
        agg.record(sample(80), at(1), 1);
        agg.record(sample(90), at(2), 1);
        agg.record(sample(70), at(3), 1);

        let summary = agg.finalize();
        assert_eq!(summary.total_count, 3);
        assert!((summary.average_score - 80.0).abs() < 1e-9);
        assert_eq!(summary.best.unwrap().frame.frame_index, 2);
        assert_eq!(summary.worst.unwrap().frame.frame_index, 3);
    }

    #[test]
    fn test_ties_keep_earlier_sample() {
        let mut agg = SessionAggregator::new();
        agg.record(sample(85), at(1), 1);
        agg.record(sample(85), at(2), 1);

        let summary = agg.finalize();
        assert_eq!(summary.best.unwrap().frame.frame_index, 1);
        assert_eq!(summary.worst.unwrap().frame.frame_index, 1);
    }

    #[test]
    fn test_sets_are_bucketed() {
        let mut agg = SessionAggregator::new();
        agg.record(sample(60), at(1), 1);
        assert_eq!(agg.start_new_set(), 2);
        agg.record(sample(100), at(5), 2);
        agg.record(sample(90), at(6), 2);

        let summary = agg.finalize();
        assert_eq!(summary.total_count, 3);
        assert_eq!(summary.sets.len(), 2);
        assert_eq!(summary.sets[0].count, 1);
        assert_eq!(summary.sets[1].count, 2);
        assert!((summary.sets[1].average_score - 95.0).abs() < 1e-9);
        // Session extremes span sets
        assert_eq!(summary.best.unwrap().score.overall, 100);
        assert_eq!(summary.worst.unwrap().score.overall, 60);
    }

    #[test]
    fn test_reset() {
        let mut agg = SessionAggregator::new();
        agg.record(sample(60), at(1), 1);
        agg.start_new_set();
        agg.reset();

        assert_eq!(agg.current_set(), 1);
        assert_eq!(agg.total_count(), 0);
        assert_eq!(agg.finalize().sets.len(), 1);
    }
}
