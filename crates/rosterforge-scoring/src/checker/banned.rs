use std::collections::HashSet;

use rosterforge_core::{EntityId, EntityStore};
use tracing::trace;

/// Teammate pairs that may not appear together, resolved to entity ids.
#[derive(Debug, Clone, Default)]
pub struct BannedPairs {
    pairs: HashSet<(EntityId, EntityId)>,
}

impl BannedPairs {
    /// Resolves name pairs against the store. Pairs naming an entity that is
    /// not in the pool are dropped.
    pub fn resolve(names: &[(String, String)], store: &EntityStore) -> Self {
        let mut pairs = HashSet::with_capacity(names.len());
        for (a, b) in names {
            match (store.id_of(a), store.id_of(b)) {
                (Some(a), Some(b)) if a != b => {
                    pairs.insert(ordered(a, b));
                }
                _ => trace!(
                    event = "banned_pair_skipped",
                    first = %a,
                    second = %b,
                ),
            }
        }
        Self { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn contains(&self, a: EntityId, b: EntityId) -> bool {
        self.pairs.contains(&ordered(a, b))
    }

    /// Returns true if two ids at positions `i < j` form a banned pair and
    /// `linked(i, j)` holds (typically "same team").
    pub fn any_linked(&self, ids: &[EntityId], linked: impl Fn(usize, usize) -> bool) -> bool {
        if self.pairs.is_empty() {
            return false;
        }
        (0..ids.len()).any(|i| {
            (i + 1..ids.len()).any(|j| linked(i, j) && self.contains(ids[i], ids[j]))
        })
    }
}

fn ordered(a: EntityId, b: EntityId) -> (EntityId, EntityId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
