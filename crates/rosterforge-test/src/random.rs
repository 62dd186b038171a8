//! Seeded random pools.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rosterforge_core::{PoolRecord, Role};

const TEAMS: [&str; 12] = [
    "ATL", "BOS", "BKN", "CHA", "CHI", "CLE", "DAL", "DEN", "DET", "GSW", "HOU", "IND",
];

/// Size and spread of a generated pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolShape {
    /// Entities generated per base role.
    pub per_role: usize,
    /// Number of teams drawn from; rounded up to an even count so every team
    /// has an opponent.
    pub teams: usize,
    pub min_salary: i64,
    pub max_salary: i64,
}

impl PoolShape {
    pub fn new(per_role: usize, teams: usize) -> Self {
        Self {
            per_role,
            teams,
            min_salary: 3_000,
            max_salary: 11_000,
        }
    }

    pub fn with_salaries(mut self, min_salary: i64, max_salary: i64) -> Self {
        self.min_salary = min_salary;
        self.max_salary = max_salary;
        self
    }
}

/// Generates a deterministic pool for `seed`.
///
/// Names are `<role><index>` (e.g. `PG03`) so they are unique. Salaries are
/// multiples of 100; roughly one entity in four is also eligible for the
/// next role (`PG/SG`, `C/PF`, ...). Every record carries an opponent, so
/// games are defined.
pub fn random_pool(seed: u64, shape: PoolShape) -> Vec<PoolRecord> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let teams = (shape.teams.clamp(2, TEAMS.len()) + 1) / 2 * 2;
    let low = shape.min_salary / 100;
    let high = shape.max_salary.max(shape.min_salary) / 100;

    let mut records = Vec::with_capacity(shape.per_role * Role::ALL.len());
    for (r, role) in Role::ALL.iter().enumerate() {
        for i in 0..shape.per_role {
            let salary = rng.random_range(low..=high) * 100;
            let fpts = salary as f64 / 200.0 + rng.random_range(-8.0..8.0);
            let team_index = rng.random_range(0..teams);
            let opp_index = team_index ^ 1;

            let position = if rng.random_bool(0.25) {
                let next = Role::ALL[(r + 1) % Role::ALL.len()];
                format!("{}/{}", role.code(), next.code())
            } else {
                role.code().to_string()
            };

            records.push(
                PoolRecord::new(
                    format!("{}{:02}", role.code(), i),
                    position,
                    salary,
                    fpts,
                    TEAMS[team_index],
                )
                .with_opp(TEAMS[opp_index]),
            );
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_pool() {
        let shape = PoolShape::new(3, 6);
        let a = random_pool(7, shape);
        let b = random_pool(7, shape);
        assert_eq!(a.len(), 15);
        assert_eq!(
            a.iter().map(|r| r.salary).collect::<Vec<_>>(),
            b.iter().map(|r| r.salary).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_salaries_in_range() {
        let shape = PoolShape::new(4, 8).with_salaries(3_500, 9_000);
        for record in random_pool(11, shape) {
            assert!((3_500..=9_000).contains(&record.salary));
            assert_eq!(record.salary % 100, 0);
            assert!(record.opp.is_some());
        }
    }
}
