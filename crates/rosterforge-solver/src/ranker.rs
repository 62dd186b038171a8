//! Deduplication, annotation and ordering of complete lineups.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use rosterforge_core::{Attribute, CanonicalTuple, EntityStore, Result, Tuple};
use rosterforge_scoring::Aggregator;
use serde::{Deserialize, Serialize};

/// One complete lineup with its aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct Lineup {
    /// Entity ids in template slot order.
    pub slots: Tuple,
    /// Dedup key.
    pub key: CanonicalTuple,
    pub salary: i64,
    pub fpts: f64,
    /// Sums of the table's pass-through columns, in column order.
    pub extras: Vec<f64>,
}

/// Ranked lineups, highest score first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineupTable {
    labels: Vec<String>,
    columns: Vec<String>,
    rows: Vec<Lineup>,
}

impl LineupTable {
    pub fn new(labels: Vec<String>, columns: Vec<String>, rows: Vec<Lineup>) -> Self {
        Self {
            labels,
            columns,
            rows,
        }
    }

    /// Slot labels in template order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Names of the summed pass-through columns.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Lineup] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Lineup> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lineup> {
        self.rows.iter()
    }

    pub fn contains(&self, key: &CanonicalTuple) -> bool {
        self.rows.iter().any(|row| &row.key == key)
    }

    /// Resolves ids to names for export.
    ///
    /// # Errors
    ///
    /// `UnknownEntity` if a row refers to an id `store` does not hold.
    pub fn records(&self, store: &EntityStore) -> Result<Vec<LineupRecord>> {
        self.rows
            .iter()
            .map(|row| {
                let slots = self
                    .labels
                    .iter()
                    .zip(row.slots.iter())
                    .map(|(label, id)| {
                        Ok(SlotAssignment {
                            slot: label.clone(),
                            name: store.name(*id)?.to_string(),
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(LineupRecord {
                    slots,
                    salary: row.salary,
                    fpts: row.fpts,
                    extras: self
                        .columns
                        .iter()
                        .cloned()
                        .zip(row.extras.iter().copied())
                        .collect(),
                })
            })
            .collect()
    }
}

/// One entity placed in one slot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SlotAssignment {
    pub slot: String,
    pub name: String,
}

/// Exportable form of a [`Lineup`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LineupRecord {
    pub slots: Vec<SlotAssignment>,
    pub salary: i64,
    pub fpts: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, f64>,
}

/// Turns the final stage's tuples into a [`LineupTable`].
///
/// Lineups with the same entity set collapse into the first one seen. The
/// rest are sorted by descending score with the canonical key as tie-break,
/// then cut to `top_n`.
#[derive(Debug)]
pub struct Ranker<'a> {
    aggregator: &'a Aggregator<'a>,
    columns: Vec<Attribute>,
    top_n: Option<usize>,
}

impl<'a> Ranker<'a> {
    pub fn new(aggregator: &'a Aggregator<'a>) -> Self {
        Self {
            aggregator,
            columns: Vec::new(),
            top_n: None,
        }
    }

    pub fn with_columns(mut self, columns: Vec<Attribute>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_top_n(mut self, top_n: Option<usize>) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn rank(&self, tuples: &[Tuple], labels: Vec<String>) -> Result<LineupTable> {
        let mut seen = HashSet::with_capacity(tuples.len());
        let mut rows = Vec::new();
        for slots in tuples {
            let key = CanonicalTuple::new(slots);
            if !seen.insert(key.clone()) {
                continue;
            }
            let salary = self.aggregator.cost_of(&key)?;
            let fpts = self.aggregator.sum_of(&key, &Attribute::Score)?;
            let extras = self
                .columns
                .iter()
                .map(|column| self.aggregator.sum_of(&key, column))
                .collect::<Result<Vec<_>>>()?;
            rows.push(Lineup {
                slots: slots.clone(),
                key,
                salary,
                fpts,
                extras,
            });
        }

        rows.sort_by(|a, b| match b.fpts.total_cmp(&a.fpts) {
            Ordering::Equal => a.key.cmp(&b.key),
            order => order,
        });
        if let Some(top_n) = self.top_n {
            rows.truncate(top_n);
        }

        let columns = self.columns.iter().map(|c| c.name().to_string()).collect();
        Ok(LineupTable::new(labels, columns, rows))
    }
}
