use eyre::{Result, WrapErr, ensure};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Greedy,
    Optimal,
}

/// Run configuration, read from a TOML file. Every field has a default so
/// an absent file or an empty one selects a standard run.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub algorithm: Algorithm,
    /// Teams start at this size; leftover students are spread on top.
    pub base_team_size: usize,
    /// Teams larger than this are split in two.
    pub split_threshold: usize,
    /// Weight of the preference component in the greedy pair score.
    pub pref_scalar: u32,
    /// A rating strictly above this counts as proficiency.
    pub proficiency_threshold: u32,
    /// A rating at or above this covers a required skill.
    pub coverage_threshold: u32,
    /// Objective mix of the exact solver, in [0, 1].
    pub pref_weight: f64,
    pub optimal_gap: f64,
    /// Solver time budget in seconds.
    pub time_limit: u64,
    pub seed: Option<u64>,
    /// Base names of projects to run twice, once per duplicate.
    pub duplicates: Vec<String>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            algorithm: Algorithm::Greedy,
            base_team_size: 5,
            split_threshold: 6,
            pref_scalar: 20,
            proficiency_threshold: 5,
            coverage_threshold: 6,
            pref_weight: 0.5,
            optimal_gap: 0.01,
            time_limit: 60,
            seed: None,
            duplicates: Vec::new(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            debug!("no configuration file at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("cannot read configuration file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .wrap_err_with(|| format!("cannot parse configuration file {}", path.display()))?;
        ensure!(
            config.base_team_size >= 1,
            "base_team_size must be at least 1"
        );
        Ok(config)
    }
}
