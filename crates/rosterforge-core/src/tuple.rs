//! Candidate tuples and their canonical form.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::entity::EntityId;

/// Inline capacity covers the largest supported roster.
pub const MAX_INLINE: usize = 9;

/// Entity ids in slot order; a partial or complete lineup.
pub type Tuple = SmallVec<[EntityId; MAX_INLINE]>;

/// Returns true if any id appears more than once.
#[inline]
pub fn has_duplicates(ids: &[EntityId]) -> bool {
    ids.iter()
        .enumerate()
        .any(|(i, id)| ids[i + 1..].contains(id))
}

/// Ids sorted into canonical (ascending) order.
///
/// Two tuples holding the same entity set map to the same canonical tuple
/// regardless of slot order, which makes this both the memoization key and
/// the deduplication key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct CanonicalTuple(Tuple);

impl CanonicalTuple {
    pub fn new(ids: &[EntityId]) -> Self {
        let mut sorted: Tuple = ids.iter().copied().collect();
        sorted.sort_unstable();
        CanonicalTuple(sorted)
    }

    pub fn ids(&self) -> &[EntityId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Re-canonicalizing returns an equal tuple.
    pub fn canonical(&self) -> CanonicalTuple {
        CanonicalTuple::new(&self.0)
    }
}

impl From<&Tuple> for CanonicalTuple {
    fn from(tuple: &Tuple) -> Self {
        CanonicalTuple::new(tuple)
    }
}

impl fmt::Display for CanonicalTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|id| id.0.to_string()).collect();
        write!(f, "({})", parts.join(","))
    }
}
