//! Per-event errors raised by states.

use super::event::{Event, EventKind};
use thiserror::Error;
use uuid::Uuid;

/// Errors a state returns from [`State::execute`](super::State::execute).
///
/// These never stop a running machine; the run loop forwards them to the
/// machine's error channel and keeps consuming events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// The state does not recognize this kind of event at all.
    #[error("state '{state}' does not handle event '{event}' ({event_id})")]
    UnexpectedEvent {
        state: String,
        event: String,
        event_id: Uuid,
    },

    /// The event is recognized but the state's preconditions for it are not
    /// met. The state is left unchanged.
    #[error("state '{state}' rejected event '{event}' ({event_id}): {message}")]
    PreconditionViolation {
        state: String,
        event: String,
        event_id: Uuid,
        message: String,
    },
}

impl StateError {
    /// Build an [`UnexpectedEvent`](Self::UnexpectedEvent) for `event`.
    pub fn unexpected<K: EventKind>(state: &str, event: &Event<K>) -> Self {
        Self::UnexpectedEvent {
            state: state.to_string(),
            event: event.name().to_string(),
            event_id: event.id(),
        }
    }

    /// Build a [`PreconditionViolation`](Self::PreconditionViolation) for `event`.
    pub fn precondition<K: EventKind>(
        state: &str,
        event: &Event<K>,
        message: impl Into<String>,
    ) -> Self {
        Self::PreconditionViolation {
            state: state.to_string(),
            event: event.name().to_string(),
            event_id: event.id(),
            message: message.into(),
        }
    }

    /// Identity of the event that caused this error.
    pub fn event_id(&self) -> Uuid {
        match self {
            Self::UnexpectedEvent { event_id, .. } | Self::PreconditionViolation { event_id, .. } => {
                *event_id
            }
        }
    }
}
