//! Per-stage cost bounds derived from the cheapest and most expensive
//! completion of the unfilled slots.

use rosterforge_config::RuleProfile;
use rosterforge_core::{EntityStore, Result};
use rosterforge_scoring::RuleKind;
use tracing::trace;

use crate::partition::Partitions;
use crate::plan::StagePlan;

const UNBOUNDED: (i64, i64) = (i64::MIN, i64::MAX);

/// `(floor, ceiling)` for every stage of a plan.
///
/// For a partial stage:
///
/// ```text
/// ceiling = max_cost - sum(cheapest candidate of each unfilled slot) - budget_slack
/// floor   = min_cost - sum(most expensive candidate of each unfilled slot)
/// ```
///
/// The full stage uses the budget window itself. With zero slack no bound
/// rejects a tuple that has a completion inside the window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CostBounds {
    stages: Vec<(i64, i64)>,
}

impl CostBounds {
    /// Bounds that never prune.
    pub fn unbounded(len: usize) -> Self {
        Self {
            stages: vec![UNBOUNDED; len],
        }
    }

    /// Computes the bounds once, before enumeration.
    ///
    /// A stage whose unfilled slots include one with no candidates gets no
    /// bound; nothing can complete it anyway.
    pub fn derive(
        plan: &StagePlan,
        partitions: &Partitions,
        store: &EntityStore,
        profile: &RuleProfile,
    ) -> Result<Self> {
        let mut ranges = Vec::with_capacity(partitions.len());
        for slot in 0..partitions.len() {
            ranges.push(partitions.cost_range(slot, store)?);
        }

        let mut stages = Vec::with_capacity(plan.len());
        for stage in plan.stages() {
            let bounds = if stage.rule == RuleKind::Full {
                (profile.min_cost, profile.max_cost)
            } else {
                let mut cheapest = 0i64;
                let mut priciest = 0i64;
                let mut complete = true;
                for (slot, range) in ranges.iter().enumerate() {
                    if stage.slots.contains(&slot) {
                        continue;
                    }
                    match range {
                        Some((low, high)) => {
                            cheapest = cheapest.saturating_add(*low);
                            priciest = priciest.saturating_add(*high);
                        }
                        None => complete = false,
                    }
                }
                if complete {
                    (
                        profile.min_cost.saturating_sub(priciest),
                        profile
                            .max_cost
                            .saturating_sub(cheapest)
                            .saturating_sub(profile.budget_slack),
                    )
                } else {
                    UNBOUNDED
                }
            };
            trace!(
                event = "stage_bounds",
                stage = %stage.label,
                floor = bounds.0,
                ceiling = bounds.1,
            );
            stages.push(bounds);
        }

        Ok(Self { stages })
    }

    /// `(floor, ceiling)` of a stage; unbounded for an unknown index.
    pub fn get(&self, stage: usize) -> (i64, i64) {
        self.stages.get(stage).copied().unwrap_or(UNBOUNDED)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
