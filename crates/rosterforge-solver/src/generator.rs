//! Staged cross-product enumeration with stage-local pruning.

use std::time::Instant;

use rayon::prelude::*;
use rayon::ThreadPool;
use rosterforge_core::{EntityId, Result, RosterForgeError, Tuple};
use rosterforge_scoring::{Checker, RuleSet, StageId};
use tracing::debug;

use crate::partition::Partitions;
use crate::plan::{Source, StagePlan};
use crate::stats::StageStats;
use crate::termination::Termination;

/// Left-hand rows per work unit. Termination is polled once per unit.
pub const DEFAULT_CHUNK_SIZE: usize = 256;

/// Survivors of the stages of a run, in plan order.
///
/// Intermediate stages are released once every stage reading them has run,
/// unless the generator was told to retain them. Stats cover every stage
/// either way.
#[derive(Debug, Clone, Default)]
pub struct StageOutputs {
    labels: Vec<String>,
    tuples: Vec<Vec<Tuple>>,
    released: Vec<bool>,
    stats: Vec<StageStats>,
}

impl StageOutputs {
    /// Survivors of the stage with this label; `None` if unknown or released.
    pub fn get(&self, label: &str) -> Option<&[Tuple]> {
        self.labels
            .iter()
            .position(|l| l == label)
            .and_then(|index| self.at(index))
    }

    pub fn at(&self, stage: StageId) -> Option<&[Tuple]> {
        if self.released.get(stage).copied().unwrap_or(true) {
            return None;
        }
        self.tuples.get(stage).map(Vec::as_slice)
    }

    pub fn is_released(&self, stage: StageId) -> bool {
        self.released.get(stage).copied().unwrap_or(false)
    }

    /// Survivors of the last stage: complete lineups in slot order.
    pub fn final_tuples(&self) -> &[Tuple] {
        self.tuples.last().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn stats(&self) -> &[StageStats] {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    fn push(&mut self, label: String, tuples: Vec<Tuple>, stats: StageStats) {
        self.labels.push(label);
        self.tuples.push(tuples);
        self.released.push(false);
        self.stats.push(stats);
    }

    fn release(&mut self, stage: StageId) {
        if let Some(tuples) = self.tuples.get_mut(stage) {
            *tuples = Vec::new();
            self.released[stage] = true;
        }
    }
}

/// Runs a [`StagePlan`] against a [`Checker`].
///
/// Stage `i` of the plan is checked as stage id `i` of the checker's table.
/// Every stage materializes its survivors before the next one starts; a
/// stage's input is never revisited once it has been filtered.
pub struct StagedGenerator<'g, 'a, R: RuleSet, T: Termination> {
    checker: &'g Checker<'a, R>,
    plan: &'g StagePlan,
    partitions: &'g Partitions,
    termination: T,
    pool: Option<ThreadPool>,
    chunk_size: usize,
    retain_stages: bool,
    started: Instant,
}

impl<'g, 'a, R: RuleSet, T: Termination> StagedGenerator<'g, 'a, R, T> {
    pub fn new(
        checker: &'g Checker<'a, R>,
        plan: &'g StagePlan,
        partitions: &'g Partitions,
        termination: T,
    ) -> Self {
        Self {
            checker,
            plan,
            partitions,
            termination,
            pool: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            retain_stages: false,
            started: Instant::now(),
        }
    }

    /// Evaluates cross stages on a dedicated pool of `threads` workers.
    /// One thread keeps everything on the calling thread.
    ///
    /// # Errors
    ///
    /// `Internal` if the thread pool cannot be built.
    pub fn with_threads(mut self, threads: usize) -> Result<Self> {
        self.pool = if threads > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("rosterforge-stage-{}", i))
                .build()
                .map_err(|err| RosterForgeError::Internal(err.to_string()))?;
            Some(pool)
        } else {
            None
        };
        Ok(self)
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Keeps every intermediate stage's survivors in the outputs.
    pub fn with_retained_stages(mut self, retain: bool) -> Self {
        self.retain_stages = retain;
        self
    }

    /// Measures the termination deadline from `started` instead of from
    /// construction.
    pub fn with_start(mut self, started: Instant) -> Self {
        self.started = started;
        self
    }

    fn should_stop(&self) -> bool {
        self.termination.is_terminated(self.started.elapsed())
    }

    /// Runs every stage in order.
    ///
    /// # Errors
    ///
    /// `Cancelled` if the termination condition fires between stages or
    /// between chunks. Aggregation faults propagate unchanged.
    pub fn run(&self) -> Result<StageOutputs> {
        let mut outputs = StageOutputs::default();
        let last_reader = self.last_readers();

        for (stage, spec) in self.plan.stages().iter().enumerate() {
            if self.should_stop() {
                return Err(RosterForgeError::Cancelled);
            }

            debug!(
                event = "stage_start",
                stage = %spec.label,
                index = stage,
                rule = %spec.rule,
            );
            let stage_started = Instant::now();

            let (candidates, survivors) = match spec.source {
                Source::Slot(slot) => {
                    let singles = self
                        .partitions
                        .slot(slot)
                        .iter()
                        .map(|id| Tuple::from_slice(&[*id]))
                        .collect();
                    self.filter(stage, singles)?
                }
                Source::Combinations { slot, k } => {
                    self.filter(stage, combinations(self.partitions.slot(slot), k))?
                }
                Source::Cross(left, right) => {
                    let (Some(left), Some(right)) = (outputs.at(left), outputs.at(right)) else {
                        return Err(RosterForgeError::Internal(format!(
                            "stage '{}' references a later stage",
                            spec.label
                        )));
                    };
                    self.cross(stage, left, right)?
                }
            };

            let stats = StageStats {
                label: spec.label.clone(),
                candidates,
                survivors: survivors.len() as u64,
                duration: stage_started.elapsed(),
            };
            debug!(
                event = "stage_end",
                stage = %spec.label,
                candidates = stats.candidates,
                survivors = stats.survivors,
                duration_ms = stats.duration.as_millis() as u64,
            );
            outputs.push(spec.label.clone(), survivors, stats);

            if !self.retain_stages {
                for (input, reader) in last_reader.iter().enumerate() {
                    if *reader == Some(stage) {
                        outputs.release(input);
                    }
                }
            }
        }

        Ok(outputs)
    }

    /// For each stage, the last stage that reads it as a cross input. The
    /// final stage and stages nothing reads map to `None`.
    fn last_readers(&self) -> Vec<Option<StageId>> {
        let mut readers = vec![None; self.plan.len()];
        for (stage, spec) in self.plan.stages().iter().enumerate() {
            if let Source::Cross(left, right) = spec.source {
                for input in [left, right] {
                    if let Some(reader) = readers.get_mut(input) {
                        *reader = Some(stage);
                    }
                }
            }
        }
        readers
    }

    /// Checks generated tuples in chunks on the calling thread.
    fn filter(&self, stage: StageId, tuples: Vec<Tuple>) -> Result<(u64, Vec<Tuple>)> {
        let candidates = tuples.len() as u64;
        let mut kept = Vec::new();
        for chunk in tuples.chunks(self.chunk_size) {
            if self.should_stop() {
                return Err(RosterForgeError::Cancelled);
            }
            for tuple in chunk {
                if self.checker.check(stage, tuple)? {
                    kept.push(tuple.clone());
                }
            }
        }
        Ok((candidates, kept))
    }

    /// Every left row concatenated with every right row, filtered.
    ///
    /// The left input is split into disjoint chunks; with a pool the chunks
    /// run in parallel and are reassembled in input order.
    fn cross(&self, stage: StageId, left: &[Tuple], right: &[Tuple]) -> Result<(u64, Vec<Tuple>)> {
        if left.is_empty() || right.is_empty() {
            return Ok((0, Vec::new()));
        }
        let candidates = left.len() as u64 * right.len() as u64;

        let work = |rows: &[Tuple]| -> Result<Vec<Tuple>> {
            if self.should_stop() {
                return Err(RosterForgeError::Cancelled);
            }
            let mut kept = Vec::new();
            for head in rows {
                for tail in right {
                    let mut tuple = head.clone();
                    tuple.extend_from_slice(tail);
                    if self.checker.check(stage, &tuple)? {
                        kept.push(tuple);
                    }
                }
            }
            Ok(kept)
        };

        let parts: Vec<Vec<Tuple>> = match &self.pool {
            Some(pool) => pool.install(|| {
                left.par_chunks(self.chunk_size)
                    .map(&work)
                    .collect::<Result<Vec<_>>>()
            })?,
            None => left
                .chunks(self.chunk_size)
                .map(&work)
                .collect::<Result<Vec<_>>>()?,
        };

        Ok((candidates, parts.into_iter().flatten().collect()))
    }
}

/// Unordered `k`-subsets of `ids`, each in input order.
pub fn combinations(ids: &[EntityId], k: usize) -> Vec<Tuple> {
    let n = ids.len();
    if k == 0 || k > n {
        return Vec::new();
    }

    let mut result = Vec::new();
    let mut indices: Vec<usize> = (0..k).collect();
    loop {
        result.push(indices.iter().map(|&i| ids[i]).collect());

        // Rightmost index that can still advance.
        let Some(pivot) = (0..k).rev().find(|&i| indices[i] < n - k + i) else {
            return result;
        };
        indices[pivot] += 1;
        for i in pivot + 1..k {
            indices[i] = indices[i - 1] + 1;
        }
    }
}
