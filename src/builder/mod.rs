//! Builder API for ergonomic machine construction.
//!
//! This module provides a fluent machine builder, shorthand transition
//! constructors, and the [`event_kind!`](crate::event_kind) macro.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use machine::MachineBuilder;

use crate::core::{State, StateNode, Transition};

/// Create a transition that fires after every successfully executed event.
///
/// # Example
///
/// ```
/// use fsm_engine::builder::always;
/// use fsm_engine::turnstile::{self, Turnstile};
///
/// let transition = always(|_: &Turnstile| turnstile::locked());
/// assert!(transition.checks().is_empty());
/// ```
pub fn always<S, F>(next: F) -> Transition<S>
where
    S: State,
    F: Fn(&S) -> StateNode<S> + Send + Sync + 'static,
{
    Transition::to(next)
}

/// Create a transition guarded by a single predicate.
///
/// # Example
///
/// ```
/// use fsm_engine::builder::guarded;
/// use fsm_engine::turnstile::{self, Turnstile};
///
/// let transition = guarded(Turnstile::has_credential, turnstile::to_unlocked);
/// assert!(!transition.passes(&Turnstile::locked()));
/// ```
pub fn guarded<S, P, F>(check: P, next: F) -> Transition<S>
where
    S: State,
    P: Fn(&S) -> bool + Send + Sync + 'static,
    F: Fn(&S) -> StateNode<S> + Send + Sync + 'static,
{
    Transition::to(next).when(check)
}
