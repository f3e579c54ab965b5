//! Guard predicates for controlling state transitions.
//!
//! Guards are pure boolean functions over a state. A transition carries an
//! ordered list of guards and fires only when all of them pass.

use std::fmt;
use std::sync::Arc;

/// Pure predicate that determines if a transition can fire.
///
/// Guards are cheap to clone; clones share the same predicate.
///
/// # Example
///
/// ```rust
/// use fsm_engine::core::Guard;
///
/// enum Door {
///     Open,
///     Closed { locked: bool },
/// }
///
/// let unlocked = Guard::new(|door: &Door| matches!(door, Door::Closed { locked: false }));
///
/// assert!(unlocked.check(&Door::Closed { locked: false }));
/// assert!(!unlocked.check(&Door::Closed { locked: true }));
/// assert!(!unlocked.check(&Door::Open));
/// ```
pub struct Guard<S> {
    predicate: Arc<dyn Fn(&S) -> bool + Send + Sync>,
}

impl<S> Guard<S> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and must not block; it runs
    /// inline on the machine's run loop.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Evaluate the predicate against `state`.
    pub fn check(&self, state: &S) -> bool {
        (self.predicate)(state)
    }
}

impl<S> Clone for Guard<S> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<S> fmt::Debug for Guard<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}
