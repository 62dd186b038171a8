//! Run entry points.

use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

use rosterforge_config::{ConfigError, Mode, RuleProfile, RunConfig};
use rosterforge_core::{Attribute, EntityStore, Result, RosterForgeError, RosterTemplate};
use rosterforge_scoring::{Aggregator, Checker, ForwardRules, HistoricalRules, RuleSet};
use tracing::{info, warn};

use crate::bounds::CostBounds;
use crate::generator::{StageOutputs, StagedGenerator};
use crate::partition::Partitions;
use crate::plan::StagePlan;
use crate::ranker::{LineupTable, Ranker};
use crate::stats::RunStats;
use crate::termination::{ExternalTermination, OrTermination, TimeTermination};

/// Settings of one run that are not rules.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    /// Pass-through columns summed into every lineup.
    pub sum_columns: Vec<Attribute>,
    pub top_n: Option<usize>,
    pub threads: usize,
    pub time_limit: Option<Duration>,
    /// Keep intermediate stage survivors in [`RunOutcome::stages`].
    pub retain_stages: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            sum_columns: Vec::new(),
            top_n: None,
            threads: 1,
            time_limit: None,
            retain_stages: false,
        }
    }
}

impl RunOptions {
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            sum_columns: config
                .sum_columns
                .iter()
                .map(|column| Attribute::from_str(column).unwrap_or_else(|never| match never {}))
                .collect(),
            top_n: config.top_n,
            threads: config.thread_count.resolve(),
            time_limit: config.time_limit(),
            retain_stages: false,
        }
    }
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub table: LineupTable,
    /// Stage survivors. Intermediate stages are only present when
    /// [`RunOptions::retain_stages`] is set.
    pub stages: StageOutputs,
    pub stats: RunStats,
}

/// Enumerates every lineup the configured profile admits, best first.
///
/// The rule profile, stage plan and template all follow the configured site
/// format; the mode selects the rule set.
///
/// # Errors
///
/// `Config` for an invalid profile, `Cancelled` when the time limit or
/// `terminate` fires before the last stage completes, and aggregation faults
/// for a malformed store. An empty or infeasible pool is not an error.
///
/// # Example
///
/// ```
/// use rosterforge_config::RunConfig;
/// use rosterforge_core::{EntityStore, PoolRecord};
/// use rosterforge_solver::enumerate_lineups;
///
/// let store = EntityStore::from_records(
///     vec![PoolRecord::new("A", "PG", 3_000, 20.0, "BOS")],
///     &[],
/// ).unwrap();
/// let table = enumerate_lineups(&store, &RunConfig::default(), None).unwrap();
/// assert!(table.is_empty());
/// ```
pub fn enumerate_lineups(
    store: &EntityStore,
    config: &RunConfig,
    terminate: Option<&AtomicBool>,
) -> Result<LineupTable> {
    let profile = config.rule_profile()?;
    let template = profile.format.template();
    let plan = StagePlan::for_format(profile.format);
    let options = RunOptions::from_config(config);
    Ok(run_plan(store, &profile, &template, &plan, &options, terminate)?.table)
}

/// Runs an explicit plan over an explicit template.
///
/// The plan's stages must fill the template's slots; its last stage's tuples
/// are ranked as lineups with the template's labels.
///
/// # Errors
///
/// As [`enumerate_lineups`], plus `Config` before any stage runs when the
/// forward rules need a game for every entity and some entity has none.
pub fn run_plan(
    store: &EntityStore,
    profile: &RuleProfile,
    template: &RosterTemplate,
    plan: &StagePlan,
    options: &RunOptions,
    terminate: Option<&AtomicBool>,
) -> Result<RunOutcome> {
    ensure_games(store, profile)?;
    match profile.mode {
        Mode::Historical => execute(
            store,
            profile,
            template,
            plan,
            options,
            terminate,
            HistoricalRules::new(profile),
        ),
        Mode::Forward => execute(
            store,
            profile,
            template,
            plan,
            options,
            terminate,
            ForwardRules::new(profile, store),
        ),
    }
}

/// Game distributions are checked on complete lineups, so a pool without
/// opponents would only fail after every earlier stage had run.
fn ensure_games(store: &EntityStore, profile: &RuleProfile) -> Result<()> {
    if !profile.is_forward() || profile.game_distributions.is_none() {
        return Ok(());
    }
    match store.iter().find(|(_, entity)| entity.game.is_none()) {
        Some((_, entity)) => Err(ConfigError::Invalid(format!(
            "game distributions require an opponent for every entity, '{}' has none",
            entity.name
        ))
        .into()),
        None => Ok(()),
    }
}

fn execute<R: RuleSet>(
    store: &EntityStore,
    profile: &RuleProfile,
    template: &RosterTemplate,
    plan: &StagePlan,
    options: &RunOptions,
    terminate: Option<&AtomicBool>,
    rules: R,
) -> Result<RunOutcome> {
    let started = Instant::now();
    info!(
        event = "run_start",
        format = ?profile.format,
        mode = rules.name(),
        entity_count = store.len(),
        stage_count = plan.len(),
        threads = options.threads,
    );

    let partitions = Partitions::build(template, store, |accepts| rules.candidate_floor(accepts))?;
    let bounds = CostBounds::derive(plan, &partitions, store, profile)?;
    let table = plan.stage_table(&bounds);

    let aggregator = Aggregator::new(store);
    let checker = Checker::new(&aggregator, rules, table);
    let termination = OrTermination::new(
        options.time_limit.map(TimeTermination::new),
        terminate.map(ExternalTermination::new),
    );

    let stages = StagedGenerator::new(&checker, plan, &partitions, termination)
        .with_threads(options.threads)?
        .with_retained_stages(options.retain_stages)
        .with_start(started)
        .run()
        .inspect_err(|err| {
            if matches!(err, RosterForgeError::Cancelled) {
                warn!(
                    event = "run_cancelled",
                    elapsed_ms = started.elapsed().as_millis() as u64,
                );
            }
        })?;

    let table = Ranker::new(&aggregator)
        .with_columns(options.sum_columns.clone())
        .with_top_n(options.top_n)
        .rank(stages.final_tuples(), template.labels())?;

    let stats = RunStats {
        stages: stages.stats().to_vec(),
        elapsed: started.elapsed(),
        cache_entries: aggregator.cache_len(),
        raw_lineups: stages.final_tuples().len(),
    };
    info!(
        event = "run_end",
        lineup_count = table.len(),
        raw_lineups = stats.raw_lineups,
        candidates = stats.candidates(),
        cache_entries = stats.cache_entries,
        duration_ms = stats.elapsed.as_millis() as u64,
    );

    Ok(RunOutcome {
        table,
        stages,
        stats,
    })
}
