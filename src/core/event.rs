//! Events fed into a running machine.
//!
//! An [`Event`] is a pure value carrier: it records what happened, where it
//! came from and when. The domain-specific part lives in the event's kind,
//! a type implementing [`EventKind`] (usually an enum generated with
//! [`event_kind!`](crate::event_kind)).

use super::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use uuid::Uuid;

/// Domain classification of an event.
///
/// States match on the kind to decide how an event applies to them. The
/// name is used for diagnostics and error reporting only.
///
/// # Example
///
/// ```rust
/// use fsm_engine::core::EventKind;
///
/// #[derive(Clone, Debug, PartialEq)]
/// enum DoorEvent {
///     Open,
///     Close,
/// }
///
/// impl EventKind for DoorEvent {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "open",
///             Self::Close => "close",
///         }
///     }
/// }
///
/// assert_eq!(DoorEvent::Open.name(), "open");
/// ```
pub trait EventKind: Clone + Debug + Send + Sync + 'static {
    /// Stable name of this kind of event.
    fn name(&self) -> &str;
}

/// Immutable record of something that happened.
///
/// No validation is performed on construction. Identity uniqueness is the
/// producer's responsibility; [`Event::now`] mints a random v4 identity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event<K> {
    id: Uuid,
    source: String,
    kind: K,
    timestamp: i64,
}

impl<K: EventKind> Event<K> {
    /// Create an event from caller-supplied parts.
    ///
    /// `timestamp` is nanoseconds since the Unix epoch.
    pub fn new(id: Uuid, source: impl Into<String>, kind: K, timestamp: i64) -> Self {
        Self {
            id,
            source: source.into(),
            kind,
            timestamp,
        }
    }

    /// Create an event with a fresh identity, stamped with the current time.
    pub fn now(source: impl Into<String>, kind: K) -> Self {
        Self::new(Uuid::new_v4(), source, kind, timestamp::now())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Tag identifying where the event came from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Name of the event's kind.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    /// Nanoseconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Occurrence time as a UTC calendar value.
    pub fn occurred_at(&self) -> DateTime<Utc> {
        timestamp::to_datetime(self.timestamp)
    }

    /// Occurrence time rendered with [`timestamp::TIMESTAMP_FORMAT`].
    pub fn formatted_timestamp(&self) -> String {
        timestamp::to_string(self.timestamp)
    }
}
