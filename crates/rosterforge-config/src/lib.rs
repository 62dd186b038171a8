//! Configuration system for RosterForge.
//!
//! Load the rule profile and run settings from TOML or YAML files to switch
//! site format, mode and heuristic thresholds without code changes.
//!
//! # Examples
//!
//! Load configuration from a TOML string:
//!
//! ```
//! use rosterforge_config::{Mode, RunConfig, SiteFormat};
//! use std::time::Duration;
//!
//! let config = RunConfig::from_toml_str(r#"
//!     sum_columns = ["e_fpts"]
//!     top_n = 100
//!
//!     [profile]
//!     format = "classic9"
//!     mode = "forward"
//!     banned_pairs = [["Jaylen Brown", "Jayson Tatum"]]
//!     team_max_overrides = { BOS = 2 }
//!
//!     [termination]
//!     seconds_spent_limit = 30
//! "#).unwrap();
//!
//! let profile = config.rule_profile().unwrap();
//! assert_eq!(profile.format, SiteFormat::Classic9);
//! assert_eq!(profile.mode, Mode::Forward);
//! assert_eq!(profile.team_allowance("BOS"), 2);
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
//! ```
//!
//! Use the default config when the file is missing:
//!
//! ```
//! use rosterforge_config::RunConfig;
//!
//! let config = RunConfig::load("rosterforge.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

mod profile;

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use profile::{Mode, RuleProfile, SalaryBand, SiteFormat};

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for rosterforge_core::RosterForgeError {
    fn from(err: ConfigError) -> Self {
        rosterforge_core::RosterForgeError::Config(err.to_string())
    }
}

/// Main run configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RunConfig {
    /// Rule profile selection and overrides.
    #[serde(default)]
    pub profile: ProfileConfig,

    /// Pass-through numeric columns summed into every output lineup.
    #[serde(default)]
    pub sum_columns: Vec<String>,

    /// Keep only the highest-scoring N lineups.
    #[serde(default)]
    pub top_n: Option<usize>,

    /// Deadline configuration.
    #[serde(default)]
    pub termination: Option<TerminationConfig>,

    /// Worker threads for stage evaluation.
    #[serde(default)]
    pub thread_count: ThreadCount,
}

impl RunConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Selects the site format and mode.
    pub fn with_format(mut self, format: SiteFormat, mode: Mode) -> Self {
        self.profile.format = format;
        self.profile.mode = mode;
        self
    }

    /// Adds a pass-through column.
    pub fn with_sum_column(mut self, column: impl Into<String>) -> Self {
        self.sum_columns.push(column.into());
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = Some(top_n);
        self
    }

    /// Sets the termination time limit.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    pub fn with_thread_count(mut self, thread_count: ThreadCount) -> Self {
        self.thread_count = thread_count;
        self
    }

    /// Resolves the preset for the configured format and mode, applies
    /// overrides, and validates the result.
    pub fn rule_profile(&self) -> Result<RuleProfile, ConfigError> {
        self.profile.resolve()
    }

    /// Returns the termination time limit, if configured.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }
}

/// Profile selection plus optional overrides of the preset's thresholds.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ProfileConfig {
    #[serde(default)]
    pub format: SiteFormat,
    #[serde(default)]
    pub mode: Mode,
    pub min_cost: Option<i64>,
    pub max_cost: Option<i64>,
    pub budget_slack: Option<i64>,
    pub team_max: Option<usize>,
    /// Merged into the preset's overrides.
    #[serde(default)]
    pub team_max_overrides: BTreeMap<String, usize>,
    pub hard_team_max: Option<usize>,
    pub teams_at_max_limit: Option<usize>,
    pub team_distributions: Option<Vec<Vec<usize>>>,
    pub game_distributions: Option<Vec<Vec<usize>>>,
    /// Appended to the preset's banned pairs.
    #[serde(default)]
    pub banned_pairs: Vec<(String, String)>,
    pub salary_bands: Option<Vec<SalaryBand>>,
    pub anchor_salary_floor: Option<i64>,
}

impl ProfileConfig {
    /// Builds the immutable profile.
    pub fn resolve(&self) -> Result<RuleProfile, ConfigError> {
        let mut profile = RuleProfile::preset(self.format, self.mode);

        if let Some(min_cost) = self.min_cost {
            profile.min_cost = min_cost;
        }
        if let Some(max_cost) = self.max_cost {
            profile.max_cost = max_cost;
        }
        if let Some(slack) = self.budget_slack {
            profile.budget_slack = slack;
        }
        if let Some(team_max) = self.team_max {
            profile.team_max = team_max;
        }
        profile
            .team_max_overrides
            .extend(self.team_max_overrides.clone());
        if self.hard_team_max.is_some() {
            profile.hard_team_max = self.hard_team_max;
        }
        if self.teams_at_max_limit.is_some() {
            profile.teams_at_max_limit = self.teams_at_max_limit;
        }
        if self.team_distributions.is_some() {
            profile.team_distributions = self.team_distributions.clone();
        }
        if self.game_distributions.is_some() {
            profile.game_distributions = self.game_distributions.clone();
        }
        profile.banned_pairs.extend(self.banned_pairs.clone());
        if let Some(bands) = &self.salary_bands {
            profile.salary_bands = bands.clone();
        }
        if self.anchor_salary_floor.is_some() {
            profile.anchor_salary_floor = self.anchor_salary_floor;
        }

        profile.validate()?;
        Ok(profile)
    }
}

/// Termination configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend enumerating.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum minutes to spend enumerating.
    pub minutes_spent_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let seconds =
            self.seconds_spent_limit.unwrap_or(0) + self.minutes_spent_limit.unwrap_or(0) * 60;
        if seconds > 0 {
            Some(Duration::from_secs(seconds))
        } else {
            None
        }
    }
}

/// Worker thread configuration for stage evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadCount {
    /// Use the available CPU cores.
    Auto,

    /// Evaluate every stage on the calling thread.
    #[default]
    None,

    /// Specific number of threads.
    Count(usize),
}

impl ThreadCount {
    /// Resolves to an actual number of threads (at least 1).
    pub fn resolve(&self) -> usize {
        match self {
            ThreadCount::Auto => std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(1),
            ThreadCount::None => 1,
            ThreadCount::Count(n) => (*n).max(1),
        }
    }
}
