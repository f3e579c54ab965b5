//! Guarded transitions and the first-match-wins resolution algorithm.

use super::guard::Guard;
use super::state::{State, StateNode};
use std::fmt;
use std::sync::Arc;

/// Factory producing the successor node when a transition fires.
///
/// The factory receives the state being left. It typically ignores it and
/// mints a fresh state, attaching that state's own outgoing transitions, so
/// the transition graph is expanded lazily and may be cyclic.
pub type NextFn<S> = Arc<dyn Fn(&S) -> StateNode<S> + Send + Sync>;

/// A guarded rule mapping a satisfied condition on the current state to a
/// successor-state factory.
pub struct Transition<S> {
    checks: Vec<Guard<S>>,
    next: NextFn<S>,
}

impl<S: State> Transition<S> {
    /// Create a transition from an ordered list of guards and a factory.
    pub fn new<I, F>(checks: I, next: F) -> Self
    where
        I: IntoIterator<Item = Guard<S>>,
        F: Fn(&S) -> StateNode<S> + Send + Sync + 'static,
    {
        Self {
            checks: checks.into_iter().collect(),
            next: Arc::new(next),
        }
    }

    /// Create an unguarded transition to the node built by `next`.
    ///
    /// Add guards with [`when`](Self::when) or [`guard`](Self::guard). A
    /// transition with no guards fires on the first successful event.
    pub fn to<F>(next: F) -> Self
    where
        F: Fn(&S) -> StateNode<S> + Send + Sync + 'static,
    {
        Self::new(Vec::new(), next)
    }

    /// Append a guard built from a predicate.
    pub fn when<P>(self, predicate: P) -> Self
    where
        P: Fn(&S) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::new(predicate))
    }

    /// Append an existing guard.
    pub fn guard(mut self, guard: Guard<S>) -> Self {
        self.checks.push(guard);
        self
    }

    pub fn checks(&self) -> &[Guard<S>] {
        &self.checks
    }

    /// True when every guard passes against `state`.
    ///
    /// Guards are evaluated in order and evaluation stops at the first one
    /// that fails.
    pub fn passes(&self, state: &S) -> bool {
        self.checks.iter().all(|guard| guard.check(state))
    }

    /// Invoke the factory with the state being left.
    pub fn fire(&self, state: &S) -> StateNode<S> {
        (self.next)(state)
    }
}

impl<S> Clone for Transition<S> {
    fn clone(&self) -> Self {
        Self {
            checks: self.checks.clone(),
            next: Arc::clone(&self.next),
        }
    }
}

impl<S> fmt::Debug for Transition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("checks", &self.checks.len())
            .finish_non_exhaustive()
    }
}

/// Resolve the successor of `state` against `transitions`.
///
/// Transitions are tried in attachment order; the first whose guards all
/// pass wins and its factory is invoked with `state`. Ties are broken by
/// declaration order only. Returns `None` when no transition fires.
pub fn resolve<S: State>(state: &S, transitions: &[Transition<S>]) -> Option<StateNode<S>> {
    transitions
        .iter()
        .find(|transition| transition.passes(state))
        .map(|transition| transition.fire(state))
}
