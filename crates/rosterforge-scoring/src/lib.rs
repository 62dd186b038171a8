//! Memoized aggregation and constraint checking for RosterForge.
//!
//! This crate provides:
//! - The `Aggregator`, a per-run memo of sums and collections keyed by canonical tuple
//! - The stage table (`StageTable`, `StageCheck`, `RuleKind`)
//! - The `Checker` and the two mode strategies, `HistoricalRules` and `ForwardRules`
//!
//! # Architecture
//!
//! The checker is generic over its `RuleSet`, so a run is monomorphized for
//! one mode and no predicate branches on a mode flag.

pub mod aggregator;
pub mod checker;

// ============================================================================
// Aggregation
// ============================================================================

pub use aggregator::{Aggregator, Distribution, Tally};

// ============================================================================
// Constraint Checking
// ============================================================================

pub use checker::{
    BannedPairs, Checker, ForwardRules, HistoricalRules, RuleKind, RuleSet, StageCheck, StageId,
    StageTable, TupleView,
};
