//! Tests for the stage table and both rule sets.

use super::*;
use rosterforge_config::{Mode, RuleProfile, SalaryBand, SiteFormat};
use rosterforge_core::{EntityStore, PoolRecord, Role, SlotSet};
use rosterforge_test::{record, store_of};

/// Nine entities `P1..P9` costing 6000 each, with the given (team, opp).
fn lineup_store(teams: &[(&str, &str)]) -> EntityStore {
    store_of(
        teams
            .iter()
            .enumerate()
            .map(|(i, (team, opp))| {
                PoolRecord::new(format!("P{}", i + 1), "PG", 6_000, 30.0, *team).with_opp(*opp)
            })
            .collect(),
    )
}

fn ids_of(store: &EntityStore, names: &[&str]) -> Vec<EntityId> {
    names.iter().map(|name| store.id_of(name).unwrap()).collect()
}

fn all_ids(store: &EntityStore) -> Vec<EntityId> {
    store.iter().map(|(id, _)| id).collect()
}

fn forward9() -> RuleProfile {
    RuleProfile::preset(SiteFormat::Classic9, Mode::Forward).with_budget(50_000, 60_000)
}

fn historical9() -> RuleProfile {
    RuleProfile::preset(SiteFormat::Classic9, Mode::Historical).with_budget(50_000, 60_000)
}

fn full_table() -> (StageTable, StageId) {
    let mut table = StageTable::new();
    let id = table.push(StageCheck::new("lineup", RuleKind::Full));
    (table, id)
}

// Six teams, three games: distributions (1,1,1,2,2,2) and (2,3,4).
const BALANCED: [(&str, &str); 9] = [
    ("BOS", "NYK"),
    ("BOS", "NYK"),
    ("NYK", "BOS"),
    ("NYK", "BOS"),
    ("MIA", "ORL"),
    ("MIA", "ORL"),
    ("ORL", "MIA"),
    ("ATL", "CHI"),
    ("CHI", "ATL"),
];

// Teams (1,2,2,2,2): not an allowed team distribution, no team at the cap.
const SPREAD_THIN: [(&str, &str); 9] = [
    ("BOS", "NYK"),
    ("BOS", "NYK"),
    ("NYK", "BOS"),
    ("NYK", "BOS"),
    ("MIA", "ORL"),
    ("MIA", "ORL"),
    ("ORL", "MIA"),
    ("ORL", "MIA"),
    ("ATL", "CHI"),
];

#[test]
fn test_duplicates_rejected_at_every_stage() {
    let store = store_of(vec![record("A", "PG", 3_000, "BOS"), record("B", "SG", 3_000, "NYK")]);
    let aggregator = Aggregator::new(&store);
    let mut table = StageTable::new();
    let single = table.push(StageCheck::new("pg", RuleKind::Identity));
    let pair = table.push(StageCheck::new("pg_sg", RuleKind::Pair));
    let checker = Checker::new(&aggregator, HistoricalRules::new(&historical9()), table);

    let a = store.id_of("A").unwrap();
    assert!(!checker.check(single, &[a, a]).unwrap());
    assert!(!checker.check(pair, &[a, a]).unwrap());
    assert!(!checker.check(99, &[a, a]).unwrap());
}

#[test]
fn test_identity_and_unknown_stages_pass() {
    let store = store_of(vec![record("A", "PG", 3_000, "BOS")]);
    let aggregator = Aggregator::new(&store);
    let mut table = StageTable::new();
    let single = table.push(StageCheck::new("pg", RuleKind::Identity));
    let checker = Checker::new(&aggregator, ForwardRules::new(&forward9(), &store), table);

    let a = store.id_of("A").unwrap();
    assert!(checker.check(single, &[a]).unwrap());
    assert!(checker.check(42, &[a]).unwrap());
}

#[test]
fn test_unknown_entity_propagates() {
    let store = store_of(vec![record("A", "PG", 3_000, "BOS")]);
    let aggregator = Aggregator::new(&store);
    let mut table = StageTable::new();
    let pair = table.push(StageCheck::new("pair", RuleKind::Pair));
    let checker = Checker::new(&aggregator, HistoricalRules::new(&historical9()), table);

    let a = store.id_of("A").unwrap();
    assert!(checker.check(pair, &[a, EntityId(17)]).is_err());
}

#[test]
fn test_pair_ceiling_and_floor() {
    let store = store_of(vec![
        record("A", "PG", 9_000, "BOS"),
        record("B", "SG", 9_500, "BOS"),
        record("C", "SG", 3_000, "NYK"),
    ]);
    let aggregator = Aggregator::new(&store);
    let mut table = StageTable::new();
    let pair = table.push(StageCheck::new("pair", RuleKind::Pair).with_bounds(12_500, 18_000));
    let checker = Checker::new(&aggregator, HistoricalRules::new(&historical9()), table);

    let [a, b, c] = [0, 1, 2].map(EntityId);
    // 18500 is over the ceiling, 12000 under the floor, 12500 on it.
    assert!(!checker.check(pair, &[a, b]).unwrap());
    assert!(!checker.check(pair, &[a, c]).unwrap());
    assert!(checker.check(pair, &[c, b]).unwrap());
}

#[test]
fn test_historical_full_window_and_hard_cap() {
    let store = lineup_store(&BALANCED);
    let aggregator = Aggregator::new(&store);
    let (table, lineup) = full_table();
    let checker = Checker::new(&aggregator, HistoricalRules::new(&historical9()), table);
    assert!(checker.check(lineup, &all_ids(&store)).unwrap());

    let narrow = historical9().with_budget(55_000, 56_000);
    let (table, lineup) = full_table();
    let checker = Checker::new(&aggregator, HistoricalRules::new(&narrow), table);
    assert!(!checker.check(lineup, &all_ids(&store)).unwrap());

    let five_bos = lineup_store(&[
        ("BOS", "NYK"),
        ("BOS", "NYK"),
        ("BOS", "NYK"),
        ("BOS", "NYK"),
        ("BOS", "NYK"),
        ("NYK", "BOS"),
        ("MIA", "ORL"),
        ("ORL", "MIA"),
        ("ATL", "CHI"),
    ]);
    let aggregator = Aggregator::new(&five_bos);
    let (table, lineup) = full_table();
    let checker = Checker::new(&aggregator, HistoricalRules::new(&historical9()), table);
    assert!(!checker.check(lineup, &all_ids(&five_bos)).unwrap());
}

#[test]
fn test_forward_full_accepts_balanced_lineup() {
    let store = lineup_store(&BALANCED);
    let aggregator = Aggregator::new(&store);
    let (table, lineup) = full_table();
    let checker = Checker::new(&aggregator, ForwardRules::new(&forward9(), &store), table);
    assert!(checker.check(lineup, &all_ids(&store)).unwrap());
}

#[test]
fn test_team_distribution_is_mode_gated() {
    let store = lineup_store(&SPREAD_THIN);
    let aggregator = Aggregator::new(&store);
    let ids = all_ids(&store);

    let mut forward = forward9();
    forward.game_distributions = None;

    let (table, lineup) = full_table();
    let strict = Checker::new(&aggregator, ForwardRules::new(&forward, &store), table);
    assert!(!strict.check(lineup, &ids).unwrap());

    let (table, lineup) = full_table();
    let permissive = Checker::new(&aggregator, HistoricalRules::new(&historical9()), table);
    assert!(permissive.check(lineup, &ids).unwrap());
}

#[test]
fn test_banned_pair_is_mode_gated() {
    let store = lineup_store(&BALANCED);
    let aggregator = Aggregator::new(&store);
    let ids = all_ids(&store);
    let forward = forward9().with_banned_pair("P2", "P1");

    let (table, lineup) = full_table();
    let strict = Checker::new(&aggregator, ForwardRules::new(&forward, &store), table);
    assert_eq!(strict.rules().banned().len(), 1);
    assert!(!strict.check(lineup, &ids).unwrap());

    let (table, lineup) = full_table();
    let permissive = Checker::new(&aggregator, HistoricalRules::new(&historical9()), table);
    assert!(permissive.check(lineup, &ids).unwrap());
}

#[test]
fn test_banned_pair_ignores_opponents_and_missing_names() {
    let store = lineup_store(&BALANCED);
    let aggregator = Aggregator::new(&store);
    // P1 plays for BOS, P3 for NYK.
    let forward = forward9()
        .with_banned_pair("P1", "P3")
        .with_banned_pair("P1", "Nobody");

    let (table, lineup) = full_table();
    let checker = Checker::new(&aggregator, ForwardRules::new(&forward, &store), table);
    assert_eq!(checker.rules().banned().len(), 1);
    assert!(checker.check(lineup, &all_ids(&store)).unwrap());
}

#[test]
fn test_game_distribution() {
    // Games (1,4,4).
    let store = lineup_store(&[
        ("BOS", "NYK"),
        ("BOS", "NYK"),
        ("NYK", "BOS"),
        ("NYK", "BOS"),
        ("MIA", "ORL"),
        ("MIA", "ORL"),
        ("ORL", "MIA"),
        ("ORL", "MIA"),
        ("ATL", "CHI"),
    ]);
    let aggregator = Aggregator::new(&store);
    let mut forward = forward9();
    forward.team_distributions = None;

    let (table, lineup) = full_table();
    let checker = Checker::new(&aggregator, ForwardRules::new(&forward, &store), table);
    assert!(!checker.check(lineup, &all_ids(&store)).unwrap());
}

#[test]
fn test_teams_at_max_limit() {
    // Two teams with three entities each.
    let store = lineup_store(&[
        ("BOS", "NYK"),
        ("BOS", "NYK"),
        ("BOS", "NYK"),
        ("NYK", "BOS"),
        ("NYK", "BOS"),
        ("NYK", "BOS"),
        ("MIA", "ORL"),
        ("ORL", "MIA"),
        ("ATL", "CHI"),
    ]);
    let aggregator = Aggregator::new(&store);
    let mut forward = forward9();
    forward.team_distributions = None;
    forward.game_distributions = None;

    let mut table = StageTable::new();
    let partial = table.push(StageCheck::new("no_center", RuleKind::Partial));
    let lineup = table.push(StageCheck::new("lineup", RuleKind::Full));
    let checker = Checker::new(&aggregator, ForwardRules::new(&forward, &store), table);

    let six = ids_of(&store, &["P1", "P2", "P3", "P4", "P5", "P6"]);
    assert!(!checker.check(partial, &six).unwrap());
    assert!(!checker.check(lineup, &all_ids(&store)).unwrap());

    let relaxed = RuleProfile {
        teams_at_max_limit: Some(2),
        ..forward
    };
    let mut table = StageTable::new();
    let partial = table.push(StageCheck::new("no_center", RuleKind::Partial));
    let checker = Checker::new(&aggregator, ForwardRules::new(&relaxed, &store), table);
    assert!(checker.check(partial, &six).unwrap());
}

#[test]
fn test_forward_pair_teammates() {
    let store = store_of(vec![
        record("A", "PG", 5_000, "BOS"),
        record("B", "PG", 5_000, "BOS"),
        record("C", "PG", 5_000, "NYK"),
    ]);
    let aggregator = Aggregator::new(&store);
    let [a, b, c] = [0, 1, 2].map(EntityId);

    let solo = forward9().with_team_max_override("BOS", 1);
    let mut table = StageTable::new();
    let pair = table.push(StageCheck::new("pg_pairs", RuleKind::Pair));
    let checker = Checker::new(&aggregator, ForwardRules::new(&solo, &store), table);
    assert!(!checker.check(pair, &[a, b]).unwrap());
    assert!(checker.check(pair, &[a, c]).unwrap());

    let banned = forward9().with_banned_pair("A", "B");
    let mut table = StageTable::new();
    let pair = table.push(StageCheck::new("pg_pairs", RuleKind::Pair));
    let checker = Checker::new(&aggregator, ForwardRules::new(&banned, &store), table);
    assert!(!checker.check(pair, &[b, a]).unwrap());
    assert!(checker.check(pair, &[b, c]).unwrap());
}

#[test]
fn test_forward_partial_team_rules() {
    let store = store_of(vec![
        record("A", "PG", 5_000, "BOS"),
        record("B", "SG", 5_000, "BOS"),
        record("C", "SF", 5_000, "BOS"),
        record("D", "PF", 5_000, "NYK"),
        record("E", "C", 5_000, "MIA"),
    ]);
    let aggregator = Aggregator::new(&store);
    let forward = RuleProfile::preset(SiteFormat::Classic8, Mode::Forward);

    let mut table = StageTable::new();
    let triple = table.push(StageCheck::new("pg_sg_sf", RuleKind::Triple));
    let spread = table.push(StageCheck::new("pg_sg_sf_pf_c", RuleKind::Partial).with_min_teams(3));
    let checker = Checker::new(&aggregator, ForwardRules::new(&forward, &store), table);

    assert!(!checker.check(triple, &ids_of(&store, &["A", "B", "C"])).unwrap());
    assert!(checker.check(triple, &ids_of(&store, &["A", "B", "D"])).unwrap());
    assert!(!checker.check(spread, &ids_of(&store, &["A", "B", "D", "C"])).unwrap());
    assert!(checker.check(spread, &ids_of(&store, &["A", "B", "D", "E"])).unwrap());

    let mut table = StageTable::new();
    let triple = table.push(StageCheck::new("pg_sg_sf", RuleKind::Triple));
    let checker = Checker::new(&aggregator, HistoricalRules::new(&forward), table);
    assert!(checker.check(triple, &ids_of(&store, &["A", "B", "C"])).unwrap());
}

#[test]
fn test_salary_bands() {
    let store = store_of(vec![
        record("A", "PG", 3_500, "BOS"),
        record("B", "SG", 3_800, "NYK"),
        record("C", "SF", 7_000, "MIA"),
    ]);
    let aggregator = Aggregator::new(&store);
    let banded = forward9().with_salary_band(SalaryBand::at_most(4_000, 1));

    let mut table = StageTable::new();
    let pair = table.push(StageCheck::new("pair", RuleKind::Pair));
    let checker = Checker::new(&aggregator, ForwardRules::new(&banded, &store), table);
    assert!(!checker.check(pair, &ids_of(&store, &["A", "B"])).unwrap());
    assert!(checker.check(pair, &ids_of(&store, &["A", "C"])).unwrap());
}

#[test]
fn test_candidate_floor_only_for_anchor_in_forward_mode() {
    let store = store_of(Vec::new());
    let forward = ForwardRules::new(&forward9(), &store);
    let center = SlotSet::of(&[Role::Center]);
    assert_eq!(forward.candidate_floor(center), Some(4_800));
    assert_eq!(forward.candidate_floor(SlotSet::of(&[Role::PointGuard])), None);

    let historical = HistoricalRules::new(&historical9());
    assert_eq!(historical.candidate_floor(center), None);
}

#[test]
fn test_stage_table_lookup() {
    let mut table = StageTable::new();
    assert!(table.is_empty());
    let first = table.push(StageCheck::new("pg", RuleKind::Identity));
    let second = table.push(StageCheck::new("pg_sg", RuleKind::Pair).with_bounds(0, 10));
    assert_eq!((first, second), (0, 1));
    assert_eq!(table.len(), 2);
    assert_eq!(table.get(second).unwrap().label, "pg_sg");
    assert!(table.get(second).unwrap().admits_cost(10));
    assert!(!table.get(second).unwrap().admits_cost(11));
    assert!(table.get(7).is_none());
    assert_eq!(RuleKind::Triple.to_string(), "triple");
}
