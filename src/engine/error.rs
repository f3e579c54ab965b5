//! Engine error types.

use thiserror::Error;

/// Errors preventing a machine's run loop from starting.
///
/// Per-event failures never surface here; they go to the error channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    /// The machine already ran to completion. Stopped is terminal.
    #[error("machine '{name}' has stopped and cannot be run again")]
    AlreadyStopped { name: String },

    /// The error receiver was dropped before the loop started, so per-event
    /// errors could not be surfaced.
    #[error("error channel of machine '{name}' is closed")]
    ErrorChannelClosed { name: String },
}

/// Errors raised while loading or validating a [`MachineConfig`](super::MachineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse machine config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for environment variable '{name}': {message}")]
    InvalidEnvVar { name: String, message: String },

    #[error("error channel capacity must be greater than zero")]
    ZeroErrorCapacity,
}

impl ConfigError {
    pub fn invalid_env_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Errors returned when awaiting a spawned machine.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The run loop refused to start.
    #[error("machine error: {0}")]
    Machine(#[from] MachineError),

    /// The task running the loop panicked or was aborted.
    #[error("task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}
