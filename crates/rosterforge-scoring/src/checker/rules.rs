//! The two rule sets: feasibility-only and heuristic pruning.

use std::fmt;
use std::sync::Arc;

use rosterforge_config::RuleProfile;
use rosterforge_core::{
    Attribute, CanonicalTuple, EntityId, EntityStore, Result, Role, SlotSet, Value,
};

use super::{BannedPairs, StageCheck};
use crate::aggregator::{Distribution, Tally};
use crate::Aggregator;

/// A canonical tuple together with the aggregator that prices it.
#[derive(Debug, Clone, Copy)]
pub struct TupleView<'v> {
    aggregator: &'v Aggregator<'v>,
    key: &'v CanonicalTuple,
}

impl<'v> TupleView<'v> {
    pub fn new(aggregator: &'v Aggregator<'v>, key: &'v CanonicalTuple) -> Self {
        Self { aggregator, key }
    }

    pub fn ids(&self) -> &[EntityId] {
        self.key.ids()
    }

    pub fn len(&self) -> usize {
        self.key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }

    pub fn cost(&self) -> Result<i64> {
        self.aggregator.cost_of(self.key)
    }

    pub fn teams(&self) -> Result<Arc<[Value]>> {
        self.aggregator.collect_of(self.key, &Attribute::Team)
    }

    pub fn team_tally(&self) -> Result<Tally> {
        self.aggregator.tally_of(self.key, &Attribute::Team)
    }

    pub fn team_distribution(&self) -> Result<Distribution> {
        self.aggregator.distribution_of(self.key, &Attribute::Team)
    }

    pub fn game_distribution(&self) -> Result<Distribution> {
        self.aggregator.distribution_of(self.key, &Attribute::Game)
    }

    /// Number of entities priced strictly below `salary`.
    pub fn count_below(&self, salary: i64) -> Result<usize> {
        let costs = self.aggregator.collect_of(self.key, &Attribute::Cost)?;
        Ok(costs
            .iter()
            .filter(|value| matches!(value, Value::Int(cost) if *cost < salary))
            .count())
    }
}

/// A mode's predicates for each rule kind.
///
/// Implementations receive tuples that are already duplicate-free and
/// canonical.
pub trait RuleSet: Send + Sync + fmt::Debug {
    /// Short name used in log events.
    fn name(&self) -> &'static str;

    fn pair(&self, view: &TupleView<'_>, check: &StageCheck) -> Result<bool>;

    fn partial(&self, view: &TupleView<'_>, check: &StageCheck) -> Result<bool>;

    fn full(&self, view: &TupleView<'_>, check: &StageCheck) -> Result<bool>;

    /// Minimum cost for candidates of a slot accepting `accepts`.
    fn candidate_floor(&self, _accepts: SlotSet) -> Option<i64> {
        None
    }
}

fn within_hard_cap(tally: &Tally, hard_team_max: Option<usize>) -> bool {
    hard_team_max.map_or(true, |cap| tally.iter().all(|(_, count)| *count <= cap))
}

/// Feasibility-only rules.
///
/// Never rejects a tuple that can still complete into a lineup inside the
/// budget window and under the site's hard team cap.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalRules {
    min_cost: i64,
    max_cost: i64,
    hard_team_max: Option<usize>,
}

impl HistoricalRules {
    pub fn new(profile: &RuleProfile) -> Self {
        Self {
            min_cost: profile.min_cost,
            max_cost: profile.max_cost,
            hard_team_max: profile.hard_team_max,
        }
    }

    fn hard_cap_ok(&self, view: &TupleView<'_>) -> Result<bool> {
        if self.hard_team_max.is_none() {
            return Ok(true);
        }
        Ok(within_hard_cap(&view.team_tally()?, self.hard_team_max))
    }
}

impl RuleSet for HistoricalRules {
    fn name(&self) -> &'static str {
        "historical"
    }

    fn pair(&self, view: &TupleView<'_>, check: &StageCheck) -> Result<bool> {
        self.partial(view, check)
    }

    fn partial(&self, view: &TupleView<'_>, check: &StageCheck) -> Result<bool> {
        if !check.admits_cost(view.cost()?) {
            return Ok(false);
        }
        self.hard_cap_ok(view)
    }

    fn full(&self, view: &TupleView<'_>, _check: &StageCheck) -> Result<bool> {
        let cost = view.cost()?;
        if cost < self.min_cost || cost > self.max_cost {
            return Ok(false);
        }
        self.hard_cap_ok(view)
    }
}

/// Feasibility plus the statistical pruning heuristics of the profile.
#[derive(Debug, Clone)]
pub struct ForwardRules {
    profile: RuleProfile,
    banned: BannedPairs,
}

impl ForwardRules {
    /// Builds the rule set, resolving banned pair names against `store`.
    pub fn new(profile: &RuleProfile, store: &EntityStore) -> Self {
        Self {
            profile: profile.clone(),
            banned: BannedPairs::resolve(&profile.banned_pairs, store),
        }
    }

    pub fn banned(&self) -> &BannedPairs {
        &self.banned
    }

    fn team_caps_ok(&self, tally: &Tally) -> bool {
        tally
            .iter()
            .all(|(team, count)| *count <= self.profile.team_allowance(team))
            && within_hard_cap(tally, self.profile.hard_team_max)
    }

    fn teams_at_max_ok(&self, tally: &Tally) -> bool {
        let Some(limit) = self.profile.teams_at_max_limit else {
            return true;
        };
        let at_max = tally
            .iter()
            .filter(|(_, count)| *count >= self.profile.team_max)
            .count();
        at_max <= limit
    }

    fn no_banned_teammates(&self, view: &TupleView<'_>) -> Result<bool> {
        if self.banned.is_empty() {
            return Ok(true);
        }
        let teams = view.teams()?;
        Ok(!self
            .banned
            .any_linked(view.ids(), |i, j| teams[i] == teams[j]))
    }

    fn salary_bands_ok(&self, view: &TupleView<'_>) -> Result<bool> {
        for band in &self.profile.salary_bands {
            if band.applies(view.len()) && !band.admits(view.count_below(band.below)?) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl RuleSet for ForwardRules {
    fn name(&self) -> &'static str {
        "forward"
    }

    fn pair(&self, view: &TupleView<'_>, check: &StageCheck) -> Result<bool> {
        if !check.admits_cost(view.cost()?) {
            return Ok(false);
        }
        let tally = view.team_tally()?;
        if tally.len() == 1 && (!self.team_caps_ok(&tally) || !self.no_banned_teammates(view)?) {
            return Ok(false);
        }
        self.salary_bands_ok(view)
    }

    fn partial(&self, view: &TupleView<'_>, check: &StageCheck) -> Result<bool> {
        if !check.admits_cost(view.cost()?) {
            return Ok(false);
        }
        let tally = view.team_tally()?;
        if tally.len() <= 1 {
            return Ok(false);
        }
        if check.min_teams.is_some_and(|min| tally.len() < min) {
            return Ok(false);
        }
        if !self.team_caps_ok(&tally) || !self.teams_at_max_ok(&tally) {
            return Ok(false);
        }
        if !self.no_banned_teammates(view)? {
            return Ok(false);
        }
        self.salary_bands_ok(view)
    }

    fn full(&self, view: &TupleView<'_>, _check: &StageCheck) -> Result<bool> {
        let cost = view.cost()?;
        if cost < self.profile.min_cost || cost > self.profile.max_cost {
            return Ok(false);
        }
        let tally = view.team_tally()?;
        if !self.team_caps_ok(&tally) {
            return Ok(false);
        }
        if let Some(allowed) = &self.profile.team_distributions {
            let distro = view.team_distribution()?;
            if !allowed.iter().any(|entry| entry.as_slice() == distro.as_slice()) {
                return Ok(false);
            }
        }
        if !self.teams_at_max_ok(&tally) {
            return Ok(false);
        }
        if let Some(allowed) = &self.profile.game_distributions {
            let distro = view.game_distribution()?;
            if !allowed.iter().any(|entry| entry.as_slice() == distro.as_slice()) {
                return Ok(false);
            }
        }
        if !self.no_banned_teammates(view)? {
            return Ok(false);
        }
        self.salary_bands_ok(view)
    }

    fn candidate_floor(&self, accepts: SlotSet) -> Option<i64> {
        if accepts == SlotSet::of(&[Role::Center]) {
            self.profile.anchor_salary_floor
        } else {
            None
        }
    }
}
