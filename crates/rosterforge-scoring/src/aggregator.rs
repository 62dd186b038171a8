//! Memoized aggregation of attributes over entity sets.
//!
//! Every operation canonicalizes its ids first, so one entity set maps to one
//! cache entry regardless of discovery order. The memo tables belong to the
//! `Aggregator` instance and are dropped with it; nothing is shared across
//! runs.

use std::sync::Arc;

use dashmap::DashMap;
use rosterforge_core::{
    Attribute, CanonicalTuple, EntityId, EntityStore, Result, RosterForgeError, Value,
};
use smallvec::SmallVec;

/// Sorted occurrence counts of one attribute inside a tuple.
pub type Distribution = SmallVec<[usize; 9]>;

/// Occurrences per distinct text value, in first-seen canonical order.
pub type Tally = SmallVec<[(Arc<str>, usize); 9]>;

/// Memoized sums and collections over a read-only [`EntityStore`].
///
/// Safe to share between worker threads: each table is a `DashMap` and a
/// value is computed at most once per key while the shard is held.
///
/// # Example
///
/// ```
/// use rosterforge_core::{Attribute, EntityStore, PoolRecord};
/// use rosterforge_scoring::Aggregator;
///
/// let store = EntityStore::from_records(
///     vec![
///         PoolRecord::new("A", "PG", 3_000, 20.0, "BOS"),
///         PoolRecord::new("B", "SG", 4_000, 25.0, "BOS"),
///     ],
///     &[],
/// ).unwrap();
/// let aggregator = Aggregator::new(&store);
/// let ids: Vec<_> = store.iter().map(|(id, _)| id).collect();
///
/// assert_eq!(aggregator.cost(&ids).unwrap(), 7_000);
/// assert_eq!(aggregator.distinct_count(&ids, &Attribute::Team).unwrap(), 1);
/// ```
#[derive(Debug)]
pub struct Aggregator<'a> {
    store: &'a EntityStore,
    costs: DashMap<CanonicalTuple, i64>,
    sums: DashMap<(CanonicalTuple, Attribute), f64>,
    collected: DashMap<(CanonicalTuple, Attribute), Arc<[Value]>>,
}

impl<'a> Aggregator<'a> {
    pub fn new(store: &'a EntityStore) -> Self {
        Self {
            store,
            costs: DashMap::new(),
            sums: DashMap::new(),
            collected: DashMap::new(),
        }
    }

    pub fn store(&self) -> &'a EntityStore {
        self.store
    }

    /// Total cost of the entity set.
    pub fn cost(&self, ids: &[EntityId]) -> Result<i64> {
        self.cost_of(&CanonicalTuple::new(ids))
    }

    /// Total cost of an already-canonical tuple.
    pub fn cost_of(&self, key: &CanonicalTuple) -> Result<i64> {
        if let Some(cost) = self.costs.get(key) {
            return Ok(*cost);
        }
        let entry = self
            .costs
            .entry(key.clone())
            .or_try_insert_with(|| -> Result<i64> {
                key.ids()
                    .iter()
                    .try_fold(0i64, |total, id| Ok(total + self.store.salary(*id)?))
            })?;
        Ok(*entry)
    }

    /// Order-independent sum of a numeric attribute.
    ///
    /// # Errors
    ///
    /// `UnknownEntity` / `UnknownAttribute` from the store; a text-valued
    /// attribute is reported as `UnknownAttribute` since it cannot be summed.
    pub fn sum(&self, ids: &[EntityId], attribute: &Attribute) -> Result<f64> {
        self.sum_of(&CanonicalTuple::new(ids), attribute)
    }

    pub fn sum_of(&self, key: &CanonicalTuple, attribute: &Attribute) -> Result<f64> {
        let cache_key = (key.clone(), attribute.clone());
        if let Some(total) = self.sums.get(&cache_key) {
            return Ok(*total);
        }
        let entry = self.sums.entry(cache_key).or_try_insert_with(|| -> Result<f64> {
            let mut total = 0.0;
            for id in key.ids() {
                let value = self.store.attribute(*id, attribute)?;
                total += value
                    .as_f64()
                    .ok_or_else(|| RosterForgeError::UnknownAttribute {
                        entity: self.store.name(*id).unwrap_or_default().to_string(),
                        attribute: format!("{} (numeric)", attribute),
                    })?;
            }
            Ok(total)
        })?;
        Ok(*entry)
    }

    /// Per-entity values, one per id, in canonical order.
    pub fn collect(&self, ids: &[EntityId], attribute: &Attribute) -> Result<Arc<[Value]>> {
        self.collect_of(&CanonicalTuple::new(ids), attribute)
    }

    pub fn collect_of(&self, key: &CanonicalTuple, attribute: &Attribute) -> Result<Arc<[Value]>> {
        let cache_key = (key.clone(), attribute.clone());
        if let Some(values) = self.collected.get(&cache_key) {
            return Ok(Arc::clone(&values));
        }
        let entry = self
            .collected
            .entry(cache_key)
            .or_try_insert_with(|| -> Result<Arc<[Value]>> {
                let values = key
                    .ids()
                    .iter()
                    .map(|id| self.store.attribute(*id, attribute))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Arc::from(values))
            })?;
        Ok(Arc::clone(&entry))
    }

    /// Number of distinct values of the attribute.
    pub fn distinct_count(&self, ids: &[EntityId], attribute: &Attribute) -> Result<usize> {
        let values = self.collect(ids, attribute)?;
        let mut distinct: Vec<&Value> = Vec::with_capacity(values.len());
        for value in values.iter() {
            if !distinct.contains(&value) {
                distinct.push(value);
            }
        }
        Ok(distinct.len())
    }

    /// Occurrences of each distinct text value (teams, games).
    pub fn tally_of(&self, key: &CanonicalTuple, attribute: &Attribute) -> Result<Tally> {
        let values = self.collect_of(key, attribute)?;
        let mut tally = Tally::new();
        for value in values.iter() {
            let text = value.as_text().unwrap_or_default();
            match tally.iter_mut().find(|(seen, _)| &**seen == text) {
                Some((_, count)) => *count += 1,
                None => tally.push((Arc::from(text), 1)),
            }
        }
        Ok(tally)
    }

    /// Sorted per-value counts, e.g. the team distribution `(1, 1, 2, 2, 3)`.
    pub fn counts(&self, ids: &[EntityId], attribute: &Attribute) -> Result<Vec<usize>> {
        Ok(self
            .distribution_of(&CanonicalTuple::new(ids), attribute)?
            .into_vec())
    }

    pub fn distribution_of(&self, key: &CanonicalTuple, attribute: &Attribute) -> Result<Distribution> {
        let mut counts: Distribution = self
            .tally_of(key, attribute)?
            .into_iter()
            .map(|(_, count)| count)
            .collect();
        counts.sort_unstable();
        Ok(counts)
    }

    /// Number of memoized entries across all tables.
    pub fn cache_len(&self) -> usize {
        self.costs.len() + self.sums.len() + self.collected.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rayon::prelude::*;
    use rosterforge_core::PoolRecord;

    fn store() -> EntityStore {
        EntityStore::from_records(
            vec![
                PoolRecord::new("A", "PG", 3_000, 20.5, "BOS").with_opp("NYK").with_extra("e_fpts", 21.0),
                PoolRecord::new("B", "SG", 4_200, 25.0, "BOS").with_opp("NYK").with_extra("e_fpts", 24.0),
                PoolRecord::new("C", "SF", 5_100, 30.25, "NYK").with_opp("BOS").with_extra("e_fpts", 29.0),
                PoolRecord::new("D", "PF", 6_000, 33.0, "MIA").with_opp("ORL").with_extra("e_fpts", 35.5),
                PoolRecord::new("E", "C", 7_300, 41.0, "ORL").with_opp("MIA").with_extra("e_fpts", 40.0),
            ],
            &["e_fpts".to_string()],
        )
        .unwrap()
    }

    fn ids(raw: &[u32]) -> Vec<EntityId> {
        raw.iter().copied().map(EntityId).collect()
    }

    #[test]
    fn test_cost_and_sum() {
        let store = store();
        let aggregator = Aggregator::new(&store);
        assert_eq!(aggregator.cost(&ids(&[0, 1, 2])).unwrap(), 12_300);
        assert_eq!(aggregator.sum(&ids(&[0, 1]), &Attribute::Score).unwrap(), 45.5);
        assert_eq!(
            aggregator.sum(&ids(&[3, 4]), &Attribute::custom("e_fpts")).unwrap(),
            75.5
        );
    }

    #[test]
    fn test_permutations_share_one_entry() {
        let store = store();
        let aggregator = Aggregator::new(&store);
        aggregator.cost(&ids(&[2, 0, 1])).unwrap();
        aggregator.cost(&ids(&[1, 2, 0])).unwrap();
        aggregator.cost(&ids(&[0, 1, 2])).unwrap();
        assert_eq!(aggregator.cache_len(), 1);
    }

    #[test]
    fn test_collect_in_canonical_order() {
        let store = store();
        let aggregator = Aggregator::new(&store);
        let teams = aggregator.collect(&ids(&[2, 0]), &Attribute::Team).unwrap();
        assert_eq!(teams[0], Value::Text(Arc::from("BOS")));
        assert_eq!(teams[1], Value::Text(Arc::from("NYK")));
    }

    #[test]
    fn test_distinct_count_and_distribution() {
        let store = store();
        let aggregator = Aggregator::new(&store);
        let all = ids(&[0, 1, 2, 3, 4]);
        assert_eq!(aggregator.distinct_count(&all, &Attribute::Team).unwrap(), 4);
        assert_eq!(aggregator.distinct_count(&all, &Attribute::Game).unwrap(), 2);

        let key = CanonicalTuple::new(&all);
        let teams = aggregator.distribution_of(&key, &Attribute::Team).unwrap();
        assert_eq!(teams.as_slice(), &[1, 1, 1, 2]);
        let games = aggregator.distribution_of(&key, &Attribute::Game).unwrap();
        assert_eq!(games.as_slice(), &[2, 3]);
        assert_eq!(aggregator.counts(&ids(&[4, 0, 1]), &Attribute::Team).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_unknown_entity_is_an_error() {
        let store = store();
        let aggregator = Aggregator::new(&store);
        assert!(matches!(
            aggregator.cost(&ids(&[0, 42])),
            Err(RosterForgeError::UnknownEntity(42))
        ));
        assert!(aggregator.sum(&ids(&[0]), &Attribute::custom("minutes")).is_err());
        assert!(aggregator.sum(&ids(&[0]), &Attribute::Team).is_err());
    }

    #[test]
    fn test_concurrent_readers_agree() {
        let store = store();
        let aggregator = Aggregator::new(&store);
        let totals: Vec<i64> = (0..64usize)
            .into_par_iter()
            .map(|i| {
                let mut tuple = ids(&[0, 1, 2, 3, 4]);
                tuple.rotate_left(i % 5);
                aggregator.cost(&tuple).unwrap()
            })
            .collect();
        assert!(totals.iter().all(|total| *total == 25_600));
        assert_eq!(aggregator.cache_len(), 1);
    }

    proptest! {
        #[test]
        fn sum_is_permutation_invariant(
            picks in proptest::sample::subsequence(vec![0u32, 1, 2, 3, 4], 1..=5),
            rotation in 0usize..5,
        ) {
            let store = store();
            let aggregator = Aggregator::new(&store);
            let forward = ids(&picks);
            let mut shuffled = forward.clone();
            let len = shuffled.len();
            shuffled.rotate_left(rotation % len);
            shuffled.reverse();

            let fresh = Aggregator::new(&store);
            prop_assert_eq!(
                aggregator.sum(&forward, &Attribute::Score).unwrap(),
                fresh.sum(&shuffled, &Attribute::Score).unwrap()
            );
            prop_assert_eq!(
                aggregator.cost(&forward).unwrap(),
                fresh.cost(&shuffled).unwrap()
            );
        }
    }
}
