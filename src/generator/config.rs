//! Run configuration, loaded from TOML and overridable from the command line.

use crate::core::constants::{
    MAX_MONSTERS, MAX_PARTY_SIZE, MAX_SEARCH_ROUNDS, SEARCH_ATTEMPTS_PER_SIZE, VARIANCE_PERCENT,
};
use crate::core::error::{GenError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of encounters to generate
    pub number_of_encounters: u32,

    /// Random seed for reproducibility (None = entropy)
    pub seed: Option<u64>,

    /// Reference data document (races, classes, spells, monsters...)
    pub reference_data: PathBuf,

    /// Directory under which the timestamped batch folder is created
    pub output_dir: PathBuf,

    /// tracing filter directive, e.g. "info" or "encounter_forge=debug"
    pub log_level: String,

    pub max_party_size: usize,
    pub max_monsters: usize,

    /// Failed draws before the monster search changes group size
    pub search_attempts_per_size: u32,

    /// Group-size adjustments before the search settles for its closest sample
    pub max_search_rounds: u32,

    /// Outcome variance applied to each side, in percent
    pub variance_percent: i32,

    /// Pack the batch directory into a .tar.gz after the run
    pub archive: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            number_of_encounters: 10,
            seed: None,
            reference_data: PathBuf::from("data/srd_sample.json"),
            output_dir: PathBuf::from("output"),
            log_level: "info".to_string(),
            max_party_size: MAX_PARTY_SIZE,
            max_monsters: MAX_MONSTERS,
            search_attempts_per_size: SEARCH_ATTEMPTS_PER_SIZE,
            max_search_rounds: MAX_SEARCH_ROUNDS,
            variance_percent: VARIANCE_PERCENT,
            archive: false,
        }
    }
}

impl GeneratorConfig {
    /// Loads a TOML config file. Missing or malformed files are configuration errors.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            GenError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the generator cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.max_party_size == 0 || self.max_party_size > MAX_PARTY_SIZE {
            return Err(GenError::Configuration(format!(
                "max_party_size must be in 1..={}, got {}",
                MAX_PARTY_SIZE, self.max_party_size
            )));
        }
        if self.max_monsters == 0 || self.max_monsters > MAX_MONSTERS {
            return Err(GenError::Configuration(format!(
                "max_monsters must be in 1..={}, got {}",
                MAX_MONSTERS, self.max_monsters
            )));
        }
        if self.search_attempts_per_size == 0 || self.max_search_rounds == 0 {
            return Err(GenError::Configuration(
                "monster search limits must be positive".to_string(),
            ));
        }
        if !(0..=100).contains(&self.variance_percent) {
            return Err(GenError::Configuration(format!(
                "variance_percent must be in 0..=100, got {}",
                self.variance_percent
            )));
        }
        Ok(())
    }

    /// Resolves a leading `~/` against the home directory.
    pub fn expand_home(path: &Path) -> PathBuf {
        match path.strip_prefix("~") {
            Ok(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| path.to_path_buf()),
            Err(_) => path.to_path_buf(),
        }
    }

    /// Small deterministic run for quick checks.
    pub fn smoke_test() -> Self {
        Self {
            number_of_encounters: 5,
            seed: Some(42),
            ..Default::default()
        }
    }

    /// Large dataset run with a fixed seed.
    pub fn dataset(number_of_encounters: u32, seed: u64) -> Self {
        Self {
            number_of_encounters,
            seed: Some(seed),
            archive: true,
            log_level: "warn".to_string(),
            ..Default::default()
        }
    }
}
