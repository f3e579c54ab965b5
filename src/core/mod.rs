//! Core state machine types and logic.
//!
//! This module contains everything a machine needs that does not involve
//! channels or tasks:
//! - Events and their kinds, plus timestamp helpers
//! - The `State` contract and `StateNode`
//! - Guards, transitions and the resolution algorithm
//! - Bounded transition history
//!
//! All logic in this module is synchronous and never blocks.

mod error;
mod event;
mod guard;
mod history;
mod state;
pub mod timestamp;
mod transition;

pub use error::StateError;
pub use event::{Event, EventKind};
pub use guard::Guard;
pub use history::{StateHistory, StateRef, TransitionRecord};
pub use state::{State, StateNode};
pub use transition::{resolve, NextFn, Transition};
