//! One-call lineup generation over an owned pool.

use std::str::FromStr;
use std::sync::atomic::AtomicBool;

use rosterforge_config::RunConfig;
use rosterforge_core::{Attribute, EntityStore, PoolRecord, Result};
use rosterforge_solver::{enumerate_lineups, LineupRecord, LineupTable};

/// Owns a pool and the configuration to enumerate it with.
#[derive(Debug, Clone)]
pub struct LineupEngine {
    store: EntityStore,
    config: RunConfig,
}

impl LineupEngine {
    /// Builds the store from pool rows.
    ///
    /// Every custom column named in `config.sum_columns` must be present on
    /// every row.
    ///
    /// # Errors
    ///
    /// `DuplicateEntity` for repeated names, `UnknownAttribute` for a missing
    /// pass-through column.
    pub fn new<I>(records: I, config: RunConfig) -> Result<Self>
    where
        I: IntoIterator<Item = PoolRecord>,
    {
        let pass_through: Vec<String> = config
            .sum_columns
            .iter()
            .filter(|column| {
                matches!(
                    Attribute::from_str(column.as_str()),
                    Ok(Attribute::Custom(_))
                )
            })
            .cloned()
            .collect();
        let store = EntityStore::from_records(records, &pass_through)?;
        Ok(Self::from_store(store, config))
    }

    pub fn from_store(store: EntityStore, config: RunConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Enumerates and ranks every admissible lineup.
    pub fn create_lineups(&self) -> Result<LineupTable> {
        self.run(None)
    }

    /// As [`create_lineups`](Self::create_lineups), stopping with `Cancelled`
    /// once `terminate` is set.
    pub fn create_lineups_with_flag(&self, terminate: &AtomicBool) -> Result<LineupTable> {
        self.run(Some(terminate))
    }

    /// Enumerates and resolves the lineups to named records.
    pub fn create_records(&self) -> Result<Vec<LineupRecord>> {
        self.create_lineups()?.records(&self.store)
    }

    fn run(&self, terminate: Option<&AtomicBool>) -> Result<LineupTable> {
        #[cfg(feature = "console")]
        rosterforge_console::init();

        enumerate_lineups(&self.store, &self.config, terminate)
    }
}
