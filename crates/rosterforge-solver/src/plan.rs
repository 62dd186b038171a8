//! Stage plans: the fixed order in which partial rosters are composed.

use rosterforge_config::SiteFormat;
use rosterforge_core::RosterTemplate;
use rosterforge_scoring::{RuleKind, StageCheck, StageTable};

use crate::bounds::CostBounds;

/// Where a stage's tuples come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// One tuple per candidate of a template slot.
    Slot(usize),
    /// Unordered `k`-subsets of a slot's candidates, for slots repeated `k`
    /// times in the template.
    Combinations { slot: usize, k: usize },
    /// Concatenation of every survivor of one earlier stage with every
    /// survivor of another.
    Cross(usize, usize),
}

/// One stage of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSpec {
    pub label: String,
    pub source: Source,
    /// Template slot indices filled by this stage, in tuple order.
    pub slots: Vec<usize>,
    pub rule: RuleKind,
    pub min_teams: Option<usize>,
}

impl StageSpec {
    pub fn arity(&self) -> usize {
        self.slots.len()
    }
}

/// An ordered list of stages whose last stage yields complete lineups.
///
/// Cross stages only reference earlier stages, so the plan can be run in
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagePlan {
    stages: Vec<StageSpec>,
}

impl StagePlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in plan for a site format.
    pub fn for_format(format: SiteFormat) -> Self {
        match format {
            SiteFormat::Classic8 => Self::classic8(),
            SiteFormat::Classic9 => Self::classic9(),
        }
    }

    /// `PG SG SF PF C G F UTIL`: singles, then one slot at a time.
    pub fn classic8() -> Self {
        let mut plan = Self::new();
        let labels = ["pg", "sg", "sf", "pf", "c", "g", "f", "util"];
        let singles: Vec<usize> = labels
            .iter()
            .enumerate()
            .map(|(slot, label)| plan.single(label, slot))
            .collect();

        let mut acc = plan.cross("pg_sg", singles[0], singles[1], RuleKind::Pair);
        acc = plan.cross("pg_sg_sf", acc, singles[2], RuleKind::Triple);
        acc = plan.cross("pg_sg_sf_pf", acc, singles[3], RuleKind::Partial);
        acc = plan.cross("pg_sg_sf_pf_c", acc, singles[4], RuleKind::Partial);
        acc = plan.cross("pg_sg_sf_pf_c_g", acc, singles[5], RuleKind::Partial);
        acc = plan.cross("pg_sg_sf_pf_c_g_f", acc, singles[6], RuleKind::Partial);
        plan.stages[acc].min_teams = Some(3);
        plan.cross("lineup", acc, singles[7], RuleKind::Full);
        plan
    }

    /// `PG PG SG SG SF SF PF PF C`: role pairs, guards and forwards, then the
    /// center.
    pub fn classic9() -> Self {
        let mut plan = Self::new();
        let pg = plan.combinations("pg_pairs", 0, 2);
        let sg = plan.combinations("sg_pairs", 2, 2);
        let sf = plan.combinations("sf_pairs", 4, 2);
        let pf = plan.combinations("pf_pairs", 6, 2);

        let guards = plan.cross("guards", pg, sg, RuleKind::Partial);
        let forwards = plan.cross("forwards", sf, pf, RuleKind::Partial);
        let no_center = plan.cross("no_center", guards, forwards, RuleKind::Partial);
        let centers = plan.single("centers", 8);
        plan.cross("lineup", no_center, centers, RuleKind::Full);
        plan
    }

    /// Fills the template's slots one at a time, in template order.
    ///
    /// Works for any template; the last stage is checked with the full rules.
    pub fn sequential(template: &RosterTemplate) -> Self {
        let mut plan = Self::new();
        let size = template.len();
        let singles: Vec<usize> = template
            .slots()
            .iter()
            .enumerate()
            .map(|(slot, spec)| plan.single(&spec.label.to_lowercase(), slot))
            .collect();

        let Some((&first, rest)) = singles.split_first() else {
            return plan;
        };
        if rest.is_empty() {
            plan.stages[first].rule = RuleKind::Full;
            plan.stages[first].label = "lineup".to_string();
            return plan;
        }

        let mut acc = first;
        for (i, &next) in rest.iter().enumerate() {
            let arity = i + 2;
            let (label, rule) = match arity {
                n if n == size => ("lineup".to_string(), RuleKind::Full),
                2 => (format!("stage_{}", arity), RuleKind::Pair),
                3 => (format!("stage_{}", arity), RuleKind::Triple),
                _ => (format!("stage_{}", arity), RuleKind::Partial),
            };
            acc = plan.cross(&label, acc, next, rule);
        }
        plan
    }

    fn push(&mut self, spec: StageSpec) -> usize {
        self.stages.push(spec);
        self.stages.len() - 1
    }

    /// Adds a single-slot stage and returns its index.
    pub fn single(&mut self, label: &str, slot: usize) -> usize {
        self.push(StageSpec {
            label: label.to_string(),
            source: Source::Slot(slot),
            slots: vec![slot],
            rule: RuleKind::Identity,
            min_teams: None,
        })
    }

    /// Adds a stage drawing `k`-subsets for the `k` consecutive slots starting
    /// at `slot`, checked with the pair rules.
    pub fn combinations(&mut self, label: &str, slot: usize, k: usize) -> usize {
        let rule = match k {
            0 | 1 => RuleKind::Identity,
            2 => RuleKind::Pair,
            3 => RuleKind::Triple,
            _ => RuleKind::Partial,
        };
        self.push(StageSpec {
            label: label.to_string(),
            source: Source::Combinations { slot, k },
            slots: (slot..slot + k).collect(),
            rule,
            min_teams: None,
        })
    }

    /// Adds the cross product of two earlier stages.
    pub fn cross(&mut self, label: &str, left: usize, right: usize, rule: RuleKind) -> usize {
        let slots = self.stages[left]
            .slots
            .iter()
            .chain(&self.stages[right].slots)
            .copied()
            .collect();
        self.push(StageSpec {
            label: label.to_string(),
            source: Source::Cross(left, right),
            slots,
            rule,
            min_teams: None,
        })
    }

    pub fn stages(&self) -> &[StageSpec] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.stages.iter().position(|stage| stage.label == label)
    }

    /// Index of the stage producing complete lineups.
    pub fn final_stage(&self) -> Option<usize> {
        self.stages.len().checked_sub(1)
    }

    /// Builds the stage table, one row per stage in plan order.
    pub fn stage_table(&self, bounds: &CostBounds) -> StageTable {
        let mut table = StageTable::new();
        for (index, stage) in self.stages.iter().enumerate() {
            let (floor, ceiling) = bounds.get(index);
            let mut check = StageCheck::new(stage.label.clone(), stage.rule).with_bounds(floor, ceiling);
            check.min_teams = stage.min_teams;
            table.push(check);
        }
        table
    }
}
