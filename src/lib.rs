//! battle-engine - turn-based battle resolution
//!
//! Deterministic combat core: round timing, effect resolution, pool costs,
//! per-viewer masking, battle exit and rewards.

pub mod combat;
pub mod profile;

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use combat::BattleError;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "BATTLE_";

/// Errors loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Figment(#[from] figment::Error),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] BattleError),
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Round length for new battles, in milliseconds
    pub round_length_ms: i64,
    /// Reward scaling for new battles
    pub reward_scaling: f64,
    /// Clock skew subtracted from query times, in milliseconds
    pub time_skew_ms: i64,
    /// Default tracing filter when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            round_length_ms: 10_000,
            reward_scaling: 1.0,
            time_skew_ms: 0,
            log_filter: "battle_engine=info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration: defaults, then the TOML file if given, then
    /// `BATTLE_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        let config: Config = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no battle could run with
    pub fn validate(&self) -> Result<(), BattleError> {
        if self.round_length_ms <= 0 {
            return Err(BattleError::InvalidRoundLength(self.round_length_ms));
        }
        Ok(())
    }
}
