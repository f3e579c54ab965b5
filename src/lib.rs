//! fsm-engine: an event-driven finite-state-machine runtime
//!
//! A machine owns one current state, consumes events from an inbound
//! channel, lets the state mutate itself, and then resolves the state's
//! outgoing transitions to decide whether to replace it with a freshly
//! built successor. Per-event failures go to an error channel; the loop
//! keeps running until its cancellation token fires or its event source
//! closes.
//!
//! # Core Concepts
//!
//! - **State**: domain behavior behind the [`State`] trait, usually an enum
//! - **Transition**: ordered guards plus a factory for the next state;
//!   the first transition whose guards all pass wins
//! - **Machine**: the run loop, driven by tokio channels and a
//!   `CancellationToken`
//!
//! # Example
//!
//! ```rust
//! use fsm_engine::builder::MachineBuilder;
//! use fsm_engine::turnstile::{self, TurnstileEvent};
//! use fsm_engine::Event;
//! use tokio::sync::mpsc;
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (machine, mut errors) = MachineBuilder::new()
//!     .name("gate")
//!     .initial(turnstile::locked())
//!     .build()
//!     .unwrap();
//!
//! let (tx, rx) = mpsc::channel(8);
//! let task = machine.spawn(CancellationToken::new(), rx);
//!
//! tx.send(Event::now("rotor", TurnstileEvent::PassAttempted)).await.unwrap();
//! tx.send(Event::now("reader", TurnstileEvent::CredentialPresented)).await.unwrap();
//! drop(tx);
//!
//! let (machine, _) = task.join().await.unwrap();
//! assert_eq!(machine.current().describe(), "Unlocked");
//! assert!(errors.recv().await.is_some());
//! # }
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod turnstile;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder};
pub use self::core::{Event, EventKind, Guard, State, StateError, StateNode, Transition};
pub use engine::{
    ConfigError, ErrorReceiver, Machine, MachineConfig, MachineError, MachineStatus, MachineTask,
    OverflowPolicy, StopReason, TaskError,
};
