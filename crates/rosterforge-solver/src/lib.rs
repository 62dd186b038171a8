//! RosterForge Solver Engine
//!
//! This crate provides the staged enumeration engine:
//! - Stage plans per site format (`StagePlan`)
//! - Per-stage cost bounds (`CostBounds`)
//! - The staged cross-product generator with optional parallel stages
//! - Termination conditions
//! - Deduplication and ranking of complete lineups
//! - The `enumerate_lineups` entry point

pub mod bounds;
pub mod generator;
pub mod partition;
pub mod plan;
pub mod ranker;
pub mod run;
pub mod stats;
pub mod termination;

pub use bounds::CostBounds;
pub use generator::{combinations, StageOutputs, StagedGenerator, DEFAULT_CHUNK_SIZE};
pub use partition::Partitions;
pub use plan::{Source, StagePlan, StageSpec};
pub use ranker::{Lineup, LineupRecord, LineupTable, Ranker, SlotAssignment};
pub use run::{enumerate_lineups, run_plan, RunOptions, RunOutcome};
pub use stats::{RunStats, StageStats};
pub use termination::{ExternalTermination, OrTermination, Termination, TimeTermination};
