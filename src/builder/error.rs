//! Build errors for machine builders.

use crate::engine::ConfigError;
use thiserror::Error;

/// Errors that can occur when building a machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(node) before .build()")]
    MissingInitialState,

    #[error("Machine name not specified. Call .name(name) before .build()")]
    MissingName,

    #[error("Invalid machine config: {0}")]
    InvalidConfig(#[from] ConfigError),
}
