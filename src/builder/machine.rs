//! Builder for constructing machines.

use crate::builder::error::BuildError;
use crate::core::{State, StateNode};
use crate::engine::{ErrorReceiver, Machine, MachineConfig, OverflowPolicy};
use uuid::Uuid;

/// Builder for constructing machines with a fluent API.
///
/// Unlike [`Machine::with_config`], the builder validates the config and
/// reports problems instead of adjusting them.
pub struct MachineBuilder<S: State> {
    id: Option<Uuid>,
    name: Option<String>,
    initial: Option<StateNode<S>>,
    config: MachineConfig,
}

impl<S: State> MachineBuilder<S> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            id: None,
            name: None,
            initial: None,
            config: MachineConfig::default(),
        }
    }

    /// Set the machine identity. A random v4 identity is used otherwise.
    pub fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the human-readable name (required).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the seed state node (required).
    pub fn initial(mut self, node: impl Into<StateNode<S>>) -> Self {
        self.initial = Some(node.into());
        self
    }

    /// Replace the whole config.
    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn error_capacity(mut self, capacity: usize) -> Self {
        self.config.error_capacity = capacity;
        self
    }

    pub fn overflow(mut self, policy: OverflowPolicy) -> Self {
        self.config.overflow = policy;
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.config.history_limit = limit;
        self
    }

    /// Build the machine and its error channel.
    pub fn build(self) -> Result<(Machine<S>, ErrorReceiver), BuildError> {
        let name = self.name.ok_or(BuildError::MissingName)?;
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        self.config.validate()?;

        let id = self.id.unwrap_or_else(Uuid::new_v4);
        Ok(Machine::with_config(id, name, initial, self.config))
    }
}

impl<S: State> Default for MachineBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
