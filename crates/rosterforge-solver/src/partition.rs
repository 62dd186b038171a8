//! Candidate lists per template slot.

use rosterforge_core::{EntityId, EntityStore, Result, RosterTemplate, SlotSet};

/// Eligible entity ids for every slot of a template, in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partitions {
    slots: Vec<Vec<EntityId>>,
}

impl Partitions {
    /// Collects candidates per slot, dropping those priced under the slot's
    /// floor.
    pub fn build<F>(template: &RosterTemplate, store: &EntityStore, floor: F) -> Result<Self>
    where
        F: Fn(SlotSet) -> Option<i64>,
    {
        let mut slots = Vec::with_capacity(template.len());
        for slot in template.slots() {
            let mut candidates = store.candidates(slot.accepts);
            if let Some(min_salary) = floor(slot.accepts) {
                let mut kept = Vec::with_capacity(candidates.len());
                for id in candidates {
                    if store.salary(id)? >= min_salary {
                        kept.push(id);
                    }
                }
                candidates = kept;
            }
            slots.push(candidates);
        }
        Ok(Self { slots })
    }

    pub fn slot(&self, index: usize) -> &[EntityId] {
        self.slots.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns true if some slot has no candidate at all.
    pub fn has_empty_slot(&self) -> bool {
        self.slots.iter().any(Vec::is_empty)
    }

    /// Cheapest and most expensive candidate cost of a slot.
    pub fn cost_range(&self, index: usize, store: &EntityStore) -> Result<Option<(i64, i64)>> {
        let mut range: Option<(i64, i64)> = None;
        for id in self.slot(index) {
            let salary = store.salary(*id)?;
            range = Some(match range {
                Some((low, high)) => (low.min(salary), high.max(salary)),
                None => (salary, salary),
            });
        }
        Ok(range)
    }
}
