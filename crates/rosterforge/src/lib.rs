//! RosterForge - staged lineup enumeration in Rust
//!
//! Hand a pool of players and a run configuration to [`LineupEngine`] and get
//! back every lineup the rule profile admits, best first.
//!
//! # Example
//!
//! ```rust
//! use rosterforge::prelude::*;
//!
//! let pool = vec![PoolRecord::new("A", "PG", 3_000, 20.0, "BOS")];
//! let engine = LineupEngine::new(pool, RunConfig::default()).unwrap();
//! let table = engine.create_lineups().unwrap();
//! assert!(table.is_empty());
//! ```

mod engine;

pub use engine::LineupEngine;

pub use rosterforge_config::{
    ConfigError, Mode, ProfileConfig, RuleProfile, RunConfig, SalaryBand, SiteFormat,
    TerminationConfig, ThreadCount,
};
pub use rosterforge_core::{
    Attribute, CanonicalTuple, EntityId, EntityStore, PoolRecord, Result, Role, RosterForgeError,
    RosterTemplate, Slot, SlotSet,
};
pub use rosterforge_scoring::{ForwardRules, HistoricalRules, RuleSet};
pub use rosterforge_solver::{
    enumerate_lineups, run_plan, Lineup, LineupRecord, LineupTable, RunOptions, RunOutcome,
    RunStats, SlotAssignment, StagePlan, StageStats,
};

#[cfg(feature = "console")]
pub use rosterforge_console as console;

pub mod prelude {
    pub use super::{
        LineupEngine, LineupRecord, LineupTable, Mode, PoolRecord, RosterForgeError, RuleProfile,
        RunConfig, SiteFormat,
    };
}
