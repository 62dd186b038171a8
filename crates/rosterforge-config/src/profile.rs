//! Rule profiles: the immutable rule set of one site format in one mode.

use std::collections::BTreeMap;

use rosterforge_core::RosterTemplate;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Roster format of a contest site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteFormat {
    /// `PG SG SF PF C G F UTIL`
    #[default]
    Classic8,

    /// `PG PG SG SG SF SF PF PF C`
    Classic9,
}

impl SiteFormat {
    pub fn template(self) -> RosterTemplate {
        match self {
            SiteFormat::Classic8 => RosterTemplate::classic8(),
            SiteFormat::Classic9 => RosterTemplate::classic9(),
        }
    }

    pub fn roster_size(self) -> usize {
        match self {
            SiteFormat::Classic8 => 8,
            SiteFormat::Classic9 => 9,
        }
    }
}

/// Operating mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Feasibility only; validates lineups known to have occurred.
    #[default]
    Historical,

    /// Feasibility plus statistical pruning heuristics.
    Forward,
}

/// Bounds how many entities priced under `below` may appear together.
///
/// The band applies to tuples with at least `min_size` entities, or exactly
/// `exact_size` entities when that is set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SalaryBand {
    pub below: i64,
    #[serde(default)]
    pub min: usize,
    pub max: usize,
    #[serde(default)]
    pub min_size: usize,
    #[serde(default)]
    pub exact_size: Option<usize>,
}

impl SalaryBand {
    /// Creates a band capping the count under `below` at `max` for every size.
    pub fn at_most(below: i64, max: usize) -> Self {
        Self {
            below,
            min: 0,
            max,
            min_size: 0,
            exact_size: None,
        }
    }

    pub fn from_size(mut self, min_size: usize) -> Self {
        self.min_size = min_size;
        self
    }

    pub fn exactly_at(mut self, size: usize, min: usize) -> Self {
        self.exact_size = Some(size);
        self.min = min;
        self
    }

    /// Returns true if the band governs tuples of this size.
    pub fn applies(&self, size: usize) -> bool {
        size >= self.min_size && self.exact_size.map_or(true, |exact| exact == size)
    }

    pub fn admits(&self, count: usize) -> bool {
        self.min <= count && count <= self.max
    }
}

/// Immutable rule configuration for one enumeration run.
///
/// Every heuristic threshold is a field here; nothing is mutated after
/// construction. Heuristic fields (distributions, banned pairs, salary
/// bands, anchor floor, `teams_at_max_limit`, `team_max`) only take effect in
/// [`Mode::Forward`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RuleProfile {
    pub format: SiteFormat,
    pub mode: Mode,
    pub min_cost: i64,
    pub max_cost: i64,

    /// Subtracted from every partial-stage cost ceiling. Zero keeps the
    /// ceiling a sound feasibility bound.
    #[serde(default)]
    pub budget_slack: i64,

    pub team_max: usize,
    #[serde(default)]
    pub team_max_overrides: BTreeMap<String, usize>,

    /// Site-enforced cap, checked in both modes.
    #[serde(default)]
    pub hard_team_max: Option<usize>,

    /// How many teams may reach `team_max` in one tuple.
    #[serde(default)]
    pub teams_at_max_limit: Option<usize>,

    /// Allowed sorted per-team counts of a full lineup.
    #[serde(default)]
    pub team_distributions: Option<Vec<Vec<usize>>>,

    /// Allowed sorted per-game counts of a full lineup.
    #[serde(default)]
    pub game_distributions: Option<Vec<Vec<usize>>>,

    #[serde(default)]
    pub banned_pairs: Vec<(String, String)>,

    #[serde(default)]
    pub salary_bands: Vec<SalaryBand>,

    /// Minimum cost for candidates of the anchor (center) slot.
    #[serde(default)]
    pub anchor_salary_floor: Option<i64>,
}

impl RuleProfile {
    /// Returns the built-in profile for a format and mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use rosterforge_config::{Mode, RuleProfile, SiteFormat};
    ///
    /// let profile = RuleProfile::preset(SiteFormat::Classic9, Mode::Forward);
    /// assert_eq!(profile.max_cost, 60_000);
    /// assert_eq!(profile.anchor_salary_floor, Some(4_800));
    /// assert!(profile.validate().is_ok());
    /// ```
    pub fn preset(format: SiteFormat, mode: Mode) -> Self {
        match (format, mode) {
            (SiteFormat::Classic8, Mode::Historical) => {
                Self::base(format, mode, 48_500, 50_000).with_budget_slack(0)
            }
            (SiteFormat::Classic8, Mode::Forward) => {
                Self::base(format, mode, 49_500, 50_000).with_budget_slack(500)
            }
            (SiteFormat::Classic9, Mode::Historical) => Self::base(format, mode, 59_000, 60_000)
                .with_budget_slack(0)
                .with_hard_team_max(4),
            (SiteFormat::Classic9, Mode::Forward) => {
                let mut profile = Self::base(format, mode, 59_000, 60_000)
                    .with_budget_slack(1_000)
                    .with_hard_team_max(4);
                profile.teams_at_max_limit = Some(1);
                profile.team_distributions = Some(vec![
                    vec![1, 1, 1, 2, 2, 2],
                    vec![1, 1, 1, 1, 2, 3],
                    vec![1, 1, 1, 1, 1, 2, 2],
                    vec![1, 1, 2, 2, 3],
                ]);
                profile.game_distributions = Some(vec![
                    vec![1, 2, 3, 3],
                    vec![2, 2, 2, 3],
                    vec![1, 2, 2, 4],
                    vec![1, 1, 3, 4],
                    vec![2, 3, 4],
                ]);
                profile.anchor_salary_floor = Some(4_800);
                profile
            }
        }
    }

    fn base(format: SiteFormat, mode: Mode, min_cost: i64, max_cost: i64) -> Self {
        Self {
            format,
            mode,
            min_cost,
            max_cost,
            budget_slack: 0,
            team_max: 3,
            team_max_overrides: BTreeMap::new(),
            hard_team_max: None,
            teams_at_max_limit: None,
            team_distributions: None,
            game_distributions: None,
            banned_pairs: Vec::new(),
            salary_bands: Vec::new(),
            anchor_salary_floor: None,
        }
    }

    /// A profile with no structural rules beyond the budget window.
    pub fn unconstrained(format: SiteFormat, mode: Mode, min_cost: i64, max_cost: i64) -> Self {
        let mut profile = Self::base(format, mode, min_cost, max_cost);
        profile.team_max = usize::MAX;
        profile
    }

    pub fn with_budget(mut self, min_cost: i64, max_cost: i64) -> Self {
        self.min_cost = min_cost;
        self.max_cost = max_cost;
        self
    }

    pub fn with_budget_slack(mut self, slack: i64) -> Self {
        self.budget_slack = slack;
        self
    }

    pub fn with_hard_team_max(mut self, max: usize) -> Self {
        self.hard_team_max = Some(max);
        self
    }

    pub fn with_team_max_override(mut self, team: impl Into<String>, max: usize) -> Self {
        self.team_max_overrides.insert(team.into(), max);
        self
    }

    pub fn with_banned_pair(mut self, a: impl Into<String>, b: impl Into<String>) -> Self {
        self.banned_pairs.push((a.into(), b.into()));
        self
    }

    pub fn with_salary_band(mut self, band: SalaryBand) -> Self {
        self.salary_bands.push(band);
        self
    }

    /// The forward-mode cap for one team, honouring overrides.
    pub fn team_allowance(&self, team: &str) -> usize {
        self.team_max_overrides
            .get(team)
            .copied()
            .unwrap_or(self.team_max)
    }

    pub fn is_forward(&self) -> bool {
        self.mode == Mode::Forward
    }

    /// The original salary-shaping bands observed on nine-slot slates.
    ///
    /// Not part of any preset; add them with [`RuleProfile::with_salary_band`].
    pub fn classic9_salary_bands() -> Vec<SalaryBand> {
        vec![
            SalaryBand::at_most(4_000, 1),
            SalaryBand::at_most(5_000, 4).from_size(5),
            SalaryBand::at_most(5_000, 3).exactly_at(8, 0),
            SalaryBand::at_most(6_000, 4).exactly_at(8, 2),
            SalaryBand::at_most(7_000, 5).exactly_at(8, 3),
        ]
    }

    /// Teammate pairs the original nine-slot forward engine kept apart.
    ///
    /// Not part of any preset; assign to [`RuleProfile::banned_pairs`] or
    /// extend it. Pairs whose names are missing from a pool have no effect.
    pub fn classic9_banned_pairs() -> Vec<(String, String)> {
        [
            ("Trae Young", "Saddiq Bey"),
            ("Dejounte Murray", "Clint Capela"),
            ("De'Andre Hunter", "Saddiq Bey"),
            ("Jalen Johnson", "De'Andre Hunter"),
            ("De'Andre Hunter", "Bogdan Bogdanovic"),
            ("Jaylen Brown", "Jayson Tatum"),
            ("Coby White", "Zach LaVine"),
            ("Coby White", "Nikola Vucevic"),
            ("Donovan Mitchell", "Darius Garland"),
            ("Donovan Mitchell", "Jarrett Allen"),
            ("RJ Barrett", "Josh Hart"),
            ("Jalen Brunson", "Josh Hart"),
            ("Pascal Siakam", "Scottie Barnes"),
            ("Kevin Huerter", "Malik Monk"),
            ("Malik Monk", "Harrison Barnes"),
            ("Malik Monk", "Keegan Murray"),
        ]
        .into_iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
    }

    /// Checks internal consistency.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for an inverted budget window, negative
    /// slack, a zero team cap, an unsorted distribution entry or one whose
    /// counts do not add up to the roster size, or an inverted salary band.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_cost > self.max_cost {
            return Err(ConfigError::Invalid(format!(
                "min_cost {} exceeds max_cost {}",
                self.min_cost, self.max_cost
            )));
        }
        if self.budget_slack < 0 {
            return Err(ConfigError::Invalid(format!(
                "budget_slack must not be negative, got {}",
                self.budget_slack
            )));
        }
        if self.team_max == 0 || self.hard_team_max == Some(0) {
            return Err(ConfigError::Invalid("team caps must be at least 1".into()));
        }

        let size = self.format.roster_size();
        let distributions = [
            ("team_distributions", &self.team_distributions),
            ("game_distributions", &self.game_distributions),
        ];
        for (field, allowed) in distributions {
            for distro in allowed.iter().flatten() {
                if distro.windows(2).any(|pair| pair[0] > pair[1]) {
                    return Err(ConfigError::Invalid(format!(
                        "{} entry {:?} is not sorted",
                        field, distro
                    )));
                }
                if distro.iter().sum::<usize>() != size {
                    return Err(ConfigError::Invalid(format!(
                        "{} entry {:?} does not sum to roster size {}",
                        field, distro, size
                    )));
                }
            }
        }

        if let Some(band) = self.salary_bands.iter().find(|band| band.min > band.max) {
            return Err(ConfigError::Invalid(format!(
                "salary band below {} has min {} above max {}",
                band.below, band.min, band.max
            )));
        }

        Ok(())
    }
}

impl Default for RuleProfile {
    fn default() -> Self {
        Self::preset(SiteFormat::default(), Mode::default())
    }
}
