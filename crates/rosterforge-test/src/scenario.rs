//! Hand-written pools with known answers.

use rosterforge_core::{EntityStore, PoolRecord, RosterTemplate, Slot, SlotSet};

/// Builds a record whose projection is derived from its salary.
pub fn record(name: &str, position: &str, salary: i64, team: &str) -> PoolRecord {
    PoolRecord::new(name, position, salary, salary as f64 / 200.0, team)
}

/// Builds a store with no pass-through columns.
///
/// # Panics
///
/// Panics on duplicate names.
pub fn store_of(records: Vec<PoolRecord>) -> EntityStore {
    EntityStore::from_records(records, &[]).expect("fixture records are valid")
}

/// Five entities on distinct teams: A-D cost 3000, E costs 2000.
///
/// With four open slots and a budget window of 10000-11000, exactly the four
/// sets containing E are feasible.
pub fn five_entity_pool() -> Vec<PoolRecord> {
    vec![
        PoolRecord::new("A", "PG", 3_000, 30.0, "T1"),
        PoolRecord::new("B", "SG", 3_000, 28.0, "T2"),
        PoolRecord::new("C", "SF", 3_000, 26.0, "T3"),
        PoolRecord::new("D", "PF", 3_000, 24.0, "T4"),
        PoolRecord::new("E", "C", 2_000, 22.0, "T5"),
    ]
}

/// Four interchangeable slots accepting every role.
pub fn four_slot_template() -> RosterTemplate {
    RosterTemplate::new(
        (1..=4)
            .map(|i| Slot::new(format!("S{}", i), SlotSet::all()))
            .collect(),
    )
}
