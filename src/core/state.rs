//! The `State` contract and the node that pairs a state with its
//! outgoing transitions.

use super::error::StateError;
use super::event::{Event, EventKind};
use super::transition::{self, Transition};
use std::fmt;
use uuid::Uuid;

/// A unit of domain behavior driven by a machine.
///
/// A state consumes events, mutates its own private fields, and is replaced
/// wholesale by a freshly minted successor when one of its transitions
/// fires. Implementations are usually an enum over the domain's variants so
/// that guards can match on it exhaustively.
///
/// # Contract
///
/// - [`id`](State::id) is stable for the lifetime of the instance.
/// - [`describe`](State::describe) is for diagnostics only.
/// - [`execute`](State::execute) must reject event kinds it does not know
///   with [`StateError::UnexpectedEvent`] and must leave the state untouched
///   when it returns an error. It must not block.
///
/// # Example
///
/// ```rust
/// use fsm_engine::core::{Event, EventKind, State, StateError};
/// use uuid::Uuid;
///
/// #[derive(Clone, Debug)]
/// enum Tick {
///     Tick,
///     Reset,
/// }
///
/// impl EventKind for Tick {
///     fn name(&self) -> &str {
///         match self {
///             Self::Tick => "tick",
///             Self::Reset => "reset",
///         }
///     }
/// }
///
/// struct Counter {
///     id: Uuid,
///     ticks: u32,
/// }
///
/// impl State for Counter {
///     type Event = Tick;
///
///     fn id(&self) -> Uuid {
///         self.id
///     }
///
///     fn describe(&self) -> &str {
///         "Counting"
///     }
///
///     fn execute(&mut self, event: &Event<Tick>) -> Result<(), StateError> {
///         match event.kind() {
///             Tick::Tick => {
///                 self.ticks += 1;
///                 Ok(())
///             }
///             Tick::Reset => Err(StateError::unexpected(self.describe(), event)),
///         }
///     }
/// }
///
/// let mut counter = Counter { id: Uuid::new_v4(), ticks: 0 };
/// counter.execute(&Event::now("clock", Tick::Tick)).unwrap();
/// assert_eq!(counter.ticks, 1);
/// assert!(counter.execute(&Event::now("clock", Tick::Reset)).is_err());
/// ```
pub trait State: Send + Sized + 'static {
    /// Kind of events this state understands.
    type Event: EventKind;

    /// Identity of this state instance.
    fn id(&self) -> Uuid;

    /// Human-readable label of the state.
    fn describe(&self) -> &str;

    /// Apply `event` to the state's private fields.
    fn execute(&mut self, event: &Event<Self::Event>) -> Result<(), StateError>;

    /// Attach outgoing transitions, producing a node the machine can run.
    ///
    /// Transition order is significant: the first transition whose guards
    /// all pass wins.
    fn with_transitions<I>(self, transitions: I) -> StateNode<Self>
    where
        I: IntoIterator<Item = Transition<Self>>,
    {
        StateNode::new(self).with_transitions(transitions)
    }
}

/// A state together with its ordered outgoing transitions.
///
/// Nodes are built by value: attaching transitions consumes the node and
/// returns it, so a node is never shared while its transition list changes.
pub struct StateNode<S> {
    state: S,
    transitions: Vec<Transition<S>>,
}

impl<S: State> StateNode<S> {
    /// Wrap a state with no outgoing transitions.
    pub fn new(state: S) -> Self {
        Self {
            state,
            transitions: Vec::new(),
        }
    }

    /// Append transitions after any already attached.
    pub fn with_transitions<I>(mut self, transitions: I) -> Self
    where
        I: IntoIterator<Item = Transition<S>>,
    {
        self.transitions.extend(transitions);
        self
    }

    pub fn id(&self) -> Uuid {
        self.state.id()
    }

    pub fn describe(&self) -> &str {
        self.state.describe()
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn transitions(&self) -> &[Transition<S>] {
        &self.transitions
    }

    /// Feed an event to the wrapped state.
    pub fn execute(&mut self, event: &Event<S::Event>) -> Result<(), StateError> {
        self.state.execute(event)
    }

    /// Evaluate the attached transitions against the current state.
    ///
    /// Returns the successor node if a transition fires, or `None` if the
    /// state should persist.
    pub fn resolve_next(&self) -> Option<StateNode<S>> {
        transition::resolve(&self.state, &self.transitions)
    }

    pub fn into_state(self) -> S {
        self.state
    }
}

impl<S: State> From<S> for StateNode<S> {
    fn from(state: S) -> Self {
        StateNode::new(state)
    }
}

impl<S: fmt::Debug> fmt::Debug for StateNode<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateNode")
            .field("state", &self.state)
            .field("transitions", &self.transitions.len())
            .finish()
    }
}
