use serde::Deserialize;
use thiserror::Error;

use std::fs;
use std::path::Path;

/// Longest run of leading zeros a hex SHA-256 digest can have.
///
/// Only the digest length is enforced here. Each extra zero multiplies the
/// expected work by 16, so anything much past 8 will not finish in practice,
/// and 64 means finding an all-zero digest.
pub const MAX_DIFFICULTY: usize = 64;

/// Errors that can occur while loading ledger settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Difficulty {0} exceeds the maximum of {max}", max = MAX_DIFFICULTY)]
    DifficultyTooHigh(usize),

    #[error("Invalid mining reward: {0}")]
    InvalidReward(f64),
}

/// Tunable parameters of a ledger
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerConfig {
    /// Number of leading zero hex characters a block hash needs
    pub difficulty: usize,

    /// Amount issued to the miner of each block
    pub mining_reward: f64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            difficulty: 3,
            mining_reward: 100.0,
        }
    }
}

impl LedgerConfig {
    /// Loads settings from a JSON file. Missing fields keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: LedgerConfig = serde_json::from_str(&contents)?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.difficulty > MAX_DIFFICULTY {
            return Err(ConfigError::DifficultyTooHigh(self.difficulty));
        }

        if !self.mining_reward.is_finite() || self.mining_reward < 0.0 {
            return Err(ConfigError::InvalidReward(self.mining_reward));
        }

        Ok(())
    }
}
