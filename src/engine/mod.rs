//! Machine execution: the run loop, its error channel and lifecycle.
//!
//! # Key Concepts
//!
//! - **Machine**: owns the current state node and consumes events from an
//!   inbound `mpsc` channel until cancelled or the channel closes
//! - **Error channel**: per-event failures are sent here instead of
//!   stopping the loop
//! - **Cancellation**: a `CancellationToken` supplied per run; child tokens
//!   let an application stop many machines at once
//! - **Config**: channel capacity, overflow policy and history size

mod config;
mod error;
mod machine;
mod reporter;
mod task;

pub use config::{
    MachineConfig, OverflowPolicy, DEFAULT_ERROR_CAPACITY, DEFAULT_HISTORY_LIMIT,
    ENV_ERROR_CAPACITY, ENV_ERROR_OVERFLOW, ENV_HISTORY_LIMIT,
};
pub use error::{ConfigError, MachineError, TaskError};
pub use machine::{Machine, MachineStatus, StopReason};
pub use reporter::ErrorReceiver;
pub use task::MachineTask;
