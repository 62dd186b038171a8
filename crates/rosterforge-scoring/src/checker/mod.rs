//! Stage-indexed constraint checking.
//!
//! A [`StageTable`] is built once per run and maps each stage id to the rule
//! kind and the precomputed cost bounds for that stage. The [`Checker`] looks
//! the stage up, applies the duplicate rule, canonicalizes the tuple and hands
//! it to the mode's [`RuleSet`].

mod banned;
mod rules;

#[cfg(test)]
mod tests;

use std::fmt;

use rosterforge_core::{has_duplicates, CanonicalTuple, EntityId, Result};

use crate::Aggregator;

pub use banned::BannedPairs;
pub use rules::{ForwardRules, HistoricalRules, RuleSet, TupleView};

/// Index of a stage in its [`StageTable`].
pub type StageId = usize;

/// Which family of rules a stage applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Singles and other unchecked stages.
    Identity,
    /// Two entities.
    Pair,
    /// Three entities. Checked with the partial rules.
    Triple,
    /// Any incomplete roster.
    Partial,
    /// A complete roster.
    Full,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleKind::Identity => "identity",
            RuleKind::Pair => "pair",
            RuleKind::Triple => "triple",
            RuleKind::Partial => "partial",
            RuleKind::Full => "full",
        };
        f.write_str(name)
    }
}

/// One row of the stage table.
#[derive(Debug, Clone, PartialEq)]
pub struct StageCheck {
    pub label: String,
    pub kind: RuleKind,
    /// Highest admissible tuple cost at this stage.
    pub ceiling: i64,
    /// Lowest admissible tuple cost at this stage.
    pub floor: i64,
    /// Minimum number of distinct teams (forward partial stages).
    pub min_teams: Option<usize>,
}

impl StageCheck {
    /// A stage with no cost bounds.
    pub fn new(label: impl Into<String>, kind: RuleKind) -> Self {
        Self {
            label: label.into(),
            kind,
            ceiling: i64::MAX,
            floor: i64::MIN,
            min_teams: None,
        }
    }

    pub fn with_bounds(mut self, floor: i64, ceiling: i64) -> Self {
        self.floor = floor;
        self.ceiling = ceiling;
        self
    }

    pub fn with_min_teams(mut self, min_teams: usize) -> Self {
        self.min_teams = Some(min_teams);
        self
    }

    /// Returns true if `cost` lies within `[floor, ceiling]`.
    pub fn admits_cost(&self, cost: i64) -> bool {
        self.floor <= cost && cost <= self.ceiling
    }
}

/// Stage id to check mapping, built once before enumeration.
#[derive(Debug, Clone, Default)]
pub struct StageTable {
    checks: Vec<StageCheck>,
}

impl StageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage and returns its id.
    pub fn push(&mut self, check: StageCheck) -> StageId {
        self.checks.push(check);
        self.checks.len() - 1
    }

    pub fn get(&self, stage: StageId) -> Option<&StageCheck> {
        self.checks.get(stage)
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StageId, &StageCheck)> {
        self.checks.iter().enumerate()
    }
}

/// Evaluates tuples against the stage table with one mode's rules.
///
/// # Example
///
/// ```
/// use rosterforge_config::{Mode, RuleProfile, SiteFormat};
/// use rosterforge_core::{EntityStore, PoolRecord};
/// use rosterforge_scoring::{
///     Aggregator, Checker, HistoricalRules, RuleKind, StageCheck, StageTable,
/// };
///
/// let store = EntityStore::from_records(
///     vec![
///         PoolRecord::new("A", "PG", 9_000, 40.0, "BOS"),
///         PoolRecord::new("B", "SG", 9_500, 42.0, "BOS"),
///     ],
///     &[],
/// ).unwrap();
/// let profile = RuleProfile::preset(SiteFormat::Classic8, Mode::Historical);
///
/// let mut table = StageTable::new();
/// let pair = table.push(StageCheck::new("pg_sg", RuleKind::Pair).with_bounds(0, 18_000));
///
/// let aggregator = Aggregator::new(&store);
/// let checker = Checker::new(&aggregator, HistoricalRules::new(&profile), table);
/// let a = store.id_of("A").unwrap();
/// let b = store.id_of("B").unwrap();
/// assert!(!checker.check(pair, &[a, b]).unwrap());
/// assert!(!checker.check(pair, &[a, a]).unwrap());
/// ```
#[derive(Debug)]
pub struct Checker<'a, R: RuleSet> {
    aggregator: &'a Aggregator<'a>,
    rules: R,
    table: StageTable,
}

impl<'a, R: RuleSet> Checker<'a, R> {
    pub fn new(aggregator: &'a Aggregator<'a>, rules: R, table: StageTable) -> Self {
        Self {
            aggregator,
            rules,
            table,
        }
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn table(&self) -> &StageTable {
        &self.table
    }

    pub fn aggregator(&self) -> &'a Aggregator<'a> {
        self.aggregator
    }

    /// Returns true if `ids` passes every rule of `stage`.
    ///
    /// Tuples with a repeated id are rejected at every stage. A stage id
    /// missing from the table, or an identity stage, passes unchecked.
    ///
    /// # Errors
    ///
    /// Propagates `UnknownEntity` / `UnknownAttribute` from aggregation.
    pub fn check(&self, stage: StageId, ids: &[EntityId]) -> Result<bool> {
        if has_duplicates(ids) {
            return Ok(false);
        }
        let Some(check) = self.table.get(stage) else {
            return Ok(true);
        };
        if check.kind == RuleKind::Identity {
            return Ok(true);
        }

        let key = CanonicalTuple::new(ids);
        let view = TupleView::new(self.aggregator, &key);
        match check.kind {
            RuleKind::Identity => Ok(true),
            RuleKind::Pair => self.rules.pair(&view, check),
            RuleKind::Triple | RuleKind::Partial => self.rules.partial(&view, check),
            RuleKind::Full => self.rules.full(&view, check),
        }
    }
}
