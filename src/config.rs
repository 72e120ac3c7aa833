use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::engine::AccrualSchedule;

pub const YIELD_BPS_VAR: &str = "VAULT_YIELD_BPS";
pub const FULL_UNLOCK_SECS_VAR: &str = "VAULT_FULL_UNLOCK_SECS";
pub const TICK_MS_VAR: &str = "VAULT_TICK_MS";
pub const REFRESH_SECS_VAR: &str = "VAULT_REFRESH_SECS";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Runtime settings of the watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultConfig {
    pub schedule: AccrualSchedule,
    /// Cadence of the unlock projection
    pub tick: Duration,
    /// Cadence of the ledger refresh
    pub refresh: Duration,
}

impl Default for VaultConfig {
    fn default() -> Self {
        VaultConfig {
            schedule: AccrualSchedule::default(),
            tick: Duration::from_secs(1),
            refresh: Duration::from_secs(5),
        }
    }
}

impl VaultConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        VaultConfig::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unset keys keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = VaultConfig::default();

        if let Some(bps) = parse_var::<u32, _>(&lookup, YIELD_BPS_VAR)? {
            config.schedule.yield_bps = bps;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, FULL_UNLOCK_SECS_VAR)? {
            config.schedule.full_unlock = Duration::from_secs(non_zero(secs, FULL_UNLOCK_SECS_VAR)?);
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, TICK_MS_VAR)? {
            config.tick = Duration::from_millis(non_zero(ms, TICK_MS_VAR)?);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, REFRESH_SECS_VAR)? {
            config.refresh = Duration::from_secs(non_zero(secs, REFRESH_SECS_VAR)?);
        }

        log::debug!("Loaded configuration: {config:?}");
        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => match value.trim().parse::<T>() {
            Ok(v) => Ok(Some(v)),
            Err(_) => Err(ConfigError::Invalid { key, value }),
        },
    }
}

fn non_zero(value: u64, key: &'static str) -> Result<u64, ConfigError> {
    if value == 0 {
        return Err(ConfigError::Zero(key));
    }
    Ok(value)
}
