//! Bounded transition history.
//!
//! A machine records each fired transition so callers can inspect the path
//! it took. States themselves are not retained; a record keeps only their
//! identity and description.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use uuid::Uuid;

/// Identity and label of a state instance at the time it was recorded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRef {
    pub id: Uuid,
    pub description: String,
}

impl StateRef {
    pub fn of<S: State>(state: &S) -> Self {
        Self {
            id: state.id(),
            description: state.describe().to_string(),
        }
    }
}

/// Record of a single fired transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The state being left
    pub from: StateRef,
    /// The state that became current
    pub to: StateRef,
    /// The event whose processing triggered the transition
    pub event_id: Uuid,
    /// When the transition was applied
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of fired transitions, keeping at most `limit` records.
///
/// When full, the oldest record is evicted. A limit of zero disables
/// recording entirely.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use fsm_engine::core::{StateHistory, StateRef, TransitionRecord};
/// use uuid::Uuid;
///
/// let locked = StateRef { id: Uuid::new_v4(), description: "Locked".into() };
/// let unlocked = StateRef { id: Uuid::new_v4(), description: "Unlocked".into() };
///
/// let mut history = StateHistory::with_limit(8);
/// history.record(TransitionRecord {
///     from: locked,
///     to: unlocked,
///     event_id: Uuid::new_v4(),
///     timestamp: Utc::now(),
/// });
///
/// let path: Vec<_> = history.get_path().iter().map(|s| s.description.as_str()).collect();
/// assert_eq!(path, ["Locked", "Unlocked"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: VecDeque<TransitionRecord>,
    limit: usize,
    evicted: u64,
}

impl StateHistory {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: VecDeque::with_capacity(limit.min(1024)),
            limit,
            evicted: 0,
        }
    }

    /// Append a record, evicting the oldest one if the history is full.
    pub fn record(&mut self, transition: TransitionRecord) {
        if self.limit == 0 {
            self.evicted += 1;
            return;
        }
        if self.transitions.len() == self.limit {
            self.transitions.pop_front();
            self.evicted += 1;
        }
        self.transitions.push_back(transition);
    }

    /// Get the path of states traversed by the retained records.
    ///
    /// Returns the `from` of the oldest record followed by the `to` of each
    /// record, in order.
    pub fn get_path(&self) -> Vec<&StateRef> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        path.extend(self.transitions.iter().map(|record| &record.to));
        path
    }

    /// Elapsed time between the oldest and newest retained records.
    pub fn duration(&self) -> Option<Duration> {
        let first = self.transitions.front()?;
        let last = self.transitions.back()?;
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn transitions(&self) -> impl ExactSizeIterator<Item = &TransitionRecord> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of records dropped because of the limit.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(description: &str) -> StateRef {
        StateRef {
            id: Uuid::new_v4(),
            description: description.to_string(),
        }
    }

    fn record(from: &StateRef, to: &StateRef) -> TransitionRecord {
        TransitionRecord {
            from: from.clone(),
            to: to.clone(),
            event_id: Uuid::new_v4(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = StateHistory::with_limit(4);
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
    }

    #[test]
    fn get_path_returns_state_sequence() {
        let (a, b, c) = (state("A"), state("B"), state("C"));
        let mut history = StateHistory::with_limit(4);
        history.record(record(&a, &b));
        history.record(record(&b, &c));

        let path = history.get_path();
        assert_eq!(path, vec![&a, &b, &c]);
    }

    #[test]
    fn oldest_records_are_evicted() {
        let states: Vec<_> = ["A", "B", "C", "D"].into_iter().map(state).collect();
        let mut history = StateHistory::with_limit(2);
        for pair in states.windows(2) {
            history.record(record(&pair[0], &pair[1]));
        }

        assert_eq!(history.len(), 2);
        assert_eq!(history.evicted(), 1);
        let path: Vec<_> = history
            .get_path()
            .iter()
            .map(|s| s.description.as_str())
            .collect();
        assert_eq!(path, ["B", "C", "D"]);
    }

    #[test]
    fn zero_limit_disables_recording() {
        let (a, b) = (state("A"), state("B"));
        let mut history = StateHistory::with_limit(0);
        history.record(record(&a, &b));

        assert!(history.is_empty());
        assert_eq!(history.evicted(), 1);
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let (a, b, c) = (state("A"), state("B"), state("C"));
        let mut history = StateHistory::with_limit(4);
        let start = Utc::now();
        history.record(TransitionRecord {
            timestamp: start,
            ..record(&a, &b)
        });
        history.record(TransitionRecord {
            timestamp: start + chrono::Duration::milliseconds(10),
            ..record(&b, &c)
        });

        assert_eq!(history.duration(), Some(Duration::from_millis(10)));
    }

    #[test]
    fn history_serializes_correctly() {
        let (a, b) = (state("A"), state("B"));
        let mut history = StateHistory::with_limit(4);
        history.record(record(&a, &b));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.len(), 1);
        assert_eq!(deserialized.get_path(), history.get_path());
    }
}
