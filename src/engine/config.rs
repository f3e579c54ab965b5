//! Machine configuration.
//!
//! The engine never loads configuration itself. Whoever launches a machine
//! builds a [`MachineConfig`] (in code, from JSON, or with environment
//! overrides) and passes it to [`Machine::with_config`](super::Machine::with_config)
//! or [`MachineBuilder`](crate::builder::MachineBuilder).

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default capacity of a machine's error channel.
pub const DEFAULT_ERROR_CAPACITY: usize = 64;

/// Default number of transition records kept per machine.
pub const DEFAULT_HISTORY_LIMIT: usize = 32;

pub const ENV_ERROR_CAPACITY: &str = "FSM_ERROR_CAPACITY";
pub const ENV_ERROR_OVERFLOW: &str = "FSM_ERROR_OVERFLOW";
pub const ENV_HISTORY_LIMIT: &str = "FSM_HISTORY_LIMIT";

/// What the run loop does when the error channel is full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Wait for the consumer to make room.
    ///
    /// A consumer that stops draining stalls event intake until the machine
    /// is cancelled. No error is ever lost while the receiver is alive.
    #[default]
    Block,
    /// Discard the error that does not fit and keep going.
    ///
    /// Event intake never stalls on the error channel. Discarded errors are
    /// counted and logged.
    DropNewest,
}

impl FromStr for OverflowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "block" => Ok(Self::Block),
            "drop_newest" | "drop-newest" => Ok(Self::DropNewest),
            other => Err(format!(
                "unknown overflow policy '{other}', expected 'block' or 'drop_newest'"
            )),
        }
    }
}

/// Tunables for a single machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Capacity of the bounded error channel.
    pub error_capacity: usize,
    /// Behavior when the error channel is full.
    pub overflow: OverflowPolicy,
    /// Maximum number of transition records retained; 0 disables history.
    pub history_limit: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            error_capacity: DEFAULT_ERROR_CAPACITY,
            overflow: OverflowPolicy::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl MachineConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `FSM_*` environment variables on top of this config.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_ERROR_CAPACITY) {
            self.error_capacity = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(ENV_ERROR_CAPACITY, "expected integer"))?;
        }
        if let Some(value) = lookup(ENV_ERROR_OVERFLOW) {
            self.overflow = value
                .parse()
                .map_err(|message: String| ConfigError::invalid_env_var(ENV_ERROR_OVERFLOW, message))?;
        }
        if let Some(value) = lookup(ENV_HISTORY_LIMIT) {
            self.history_limit = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(ENV_HISTORY_LIMIT, "expected integer"))?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.error_capacity == 0 {
            return Err(ConfigError::ZeroErrorCapacity);
        }
        Ok(())
    }
}
