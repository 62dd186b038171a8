//! Enumeration statistics.

use std::time::Duration;

/// Counts for one stage of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageStats {
    pub label: String,
    /// Tuples generated before filtering.
    pub candidates: u64,
    /// Tuples that passed the stage's checks.
    pub survivors: u64,
    pub duration: Duration,
}

impl StageStats {
    /// Fraction of candidates that survived, `1.0` for an empty stage.
    pub fn survival_rate(&self) -> f64 {
        if self.candidates == 0 {
            1.0
        } else {
            self.survivors as f64 / self.candidates as f64
        }
    }

    /// Candidates rejected by the stage.
    pub fn pruned(&self) -> u64 {
        self.candidates - self.survivors
    }
}

/// Run-level statistics.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use rosterforge_solver::{RunStats, StageStats};
///
/// let mut stats = RunStats::default();
/// stats.record(StageStats {
///     label: "pg_sg".into(),
///     candidates: 100,
///     survivors: 40,
///     duration: Duration::from_millis(2),
/// });
///
/// assert_eq!(stats.candidates(), 100);
/// assert_eq!(stats.stage("pg_sg").unwrap().pruned(), 60);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub stages: Vec<StageStats>,
    pub elapsed: Duration,
    /// Memoized aggregation entries at the end of the run.
    pub cache_entries: usize,
    /// Complete lineups before deduplication.
    pub raw_lineups: usize,
}

impl RunStats {
    pub fn record(&mut self, stage: StageStats) {
        self.stages.push(stage);
    }

    pub fn stage(&self, label: &str) -> Option<&StageStats> {
        self.stages.iter().find(|stage| stage.label == label)
    }

    /// Total tuples generated across all stages.
    pub fn candidates(&self) -> u64 {
        self.stages.iter().map(|stage| stage.candidates).sum()
    }
}
