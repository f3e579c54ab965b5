//! A gated-entry turnstile modelled as a two-state machine.
//!
//! `Locked` waits for a credential; once one is presented the machine moves
//! to `Unlocked`, which waits for someone to pass and then moves back to a
//! fresh `Locked`. Each successor re-attaches its own outgoing transition,
//! so the cycle repeats indefinitely without a prebuilt graph.
//!
//! Attempting to pass while locked, or presenting a credential while
//! unlocked, is rejected with [`StateError::PreconditionViolation`].
//! Maintenance requests are not wired into either state and are rejected
//! with [`StateError::UnexpectedEvent`].

use crate::builder::guarded;
use crate::core::{Event, State, StateError, StateNode};
use crate::event_kind;
use uuid::Uuid;

event_kind! {
    /// Events produced by the turnstile's reader and rotor sensors.
    pub enum TurnstileEvent {
        CredentialPresented => "credential_presented",
        PassAttempted => "pass_attempted",
        MaintenanceRequested => "maintenance_requested",
    }
}

#[derive(Debug)]
pub struct Locked {
    id: Uuid,
    has_credential: bool,
}

impl Locked {
    pub fn has_credential(&self) -> bool {
        self.has_credential
    }

    fn execute(&mut self, event: &Event<TurnstileEvent>) -> Result<(), StateError> {
        match event.kind() {
            TurnstileEvent::CredentialPresented => {
                self.has_credential = true;
                Ok(())
            }
            TurnstileEvent::PassAttempted => Err(StateError::precondition(
                LOCKED,
                event,
                "credential required",
            )),
            TurnstileEvent::MaintenanceRequested => Err(StateError::unexpected(LOCKED, event)),
        }
    }
}

#[derive(Debug)]
pub struct Unlocked {
    id: Uuid,
    passed: bool,
}

impl Unlocked {
    pub fn passed(&self) -> bool {
        self.passed
    }

    fn execute(&mut self, event: &Event<TurnstileEvent>) -> Result<(), StateError> {
        match event.kind() {
            TurnstileEvent::PassAttempted => {
                self.passed = true;
                Ok(())
            }
            TurnstileEvent::CredentialPresented => Err(StateError::precondition(
                UNLOCKED,
                event,
                "already unlocked",
            )),
            TurnstileEvent::MaintenanceRequested => Err(StateError::unexpected(UNLOCKED, event)),
        }
    }
}

const LOCKED: &str = "Locked";
const UNLOCKED: &str = "Unlocked";

/// The turnstile's state variants.
#[derive(Debug)]
pub enum Turnstile {
    Locked(Locked),
    Unlocked(Unlocked),
}

impl Turnstile {
    /// A fresh locked state with no credential and no transitions.
    pub fn locked() -> Self {
        Self::Locked(Locked {
            id: Uuid::new_v4(),
            has_credential: false,
        })
    }

    /// A fresh unlocked state nobody has passed yet, with no transitions.
    pub fn unlocked() -> Self {
        Self::Unlocked(Unlocked {
            id: Uuid::new_v4(),
            passed: false,
        })
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked(_))
    }

    /// Guard: a locked turnstile has been shown a credential.
    pub fn has_credential(&self) -> bool {
        match self {
            Self::Locked(locked) => locked.has_credential(),
            Self::Unlocked(_) => false,
        }
    }

    /// Guard: someone has passed through an unlocked turnstile.
    pub fn has_passed(&self) -> bool {
        match self {
            Self::Locked(_) => false,
            Self::Unlocked(unlocked) => unlocked.passed(),
        }
    }
}

impl State for Turnstile {
    type Event = TurnstileEvent;

    fn id(&self) -> Uuid {
        match self {
            Self::Locked(locked) => locked.id,
            Self::Unlocked(unlocked) => unlocked.id,
        }
    }

    fn describe(&self) -> &str {
        match self {
            Self::Locked(_) => LOCKED,
            Self::Unlocked(_) => UNLOCKED,
        }
    }

    fn execute(&mut self, event: &Event<TurnstileEvent>) -> Result<(), StateError> {
        match self {
            Self::Locked(locked) => locked.execute(event),
            Self::Unlocked(unlocked) => unlocked.execute(event),
        }
    }
}

/// Seed node: locked, unlocking once a credential is presented.
pub fn locked() -> StateNode<Turnstile> {
    Turnstile::locked().with_transitions([guarded(Turnstile::has_credential, to_unlocked)])
}

/// Unlocked node, locking again once someone passes.
pub fn unlocked() -> StateNode<Turnstile> {
    Turnstile::unlocked().with_transitions([guarded(Turnstile::has_passed, to_locked)])
}

/// Transition factory into a fresh [`unlocked`] node.
pub fn to_unlocked(_: &Turnstile) -> StateNode<Turnstile> {
    unlocked()
}

/// Transition factory into a fresh [`locked`] node.
pub fn to_locked(_: &Turnstile) -> StateNode<Turnstile> {
    locked()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: TurnstileEvent) -> Event<TurnstileEvent> {
        Event::now("test", kind)
    }

    #[test]
    fn credential_unlocks() {
        let mut node = locked();
        node.execute(&event(TurnstileEvent::CredentialPresented))
            .unwrap();

        assert!(node.state().has_credential());
        let next = node.resolve_next().expect("should unlock");
        assert_eq!(next.describe(), "Unlocked");
        assert!(!next.state().has_passed());
    }

    #[test]
    fn passing_while_locked_is_rejected() {
        let mut node = locked();
        let push = event(TurnstileEvent::PassAttempted);

        let error = node.execute(&push).unwrap_err();

        assert_eq!(
            error,
            StateError::precondition("Locked", &push, "credential required")
        );
        assert!(!node.state().has_credential());
        assert!(node.resolve_next().is_none());
    }

    #[test]
    fn credential_while_unlocked_is_rejected() {
        let mut node = unlocked();
        let coin = event(TurnstileEvent::CredentialPresented);

        let error = node.execute(&coin).unwrap_err();

        assert_eq!(
            error,
            StateError::precondition("Unlocked", &coin, "already unlocked")
        );
        assert!(node.resolve_next().is_none());
    }

    #[test]
    fn maintenance_is_unexpected_in_both_states() {
        let request = event(TurnstileEvent::MaintenanceRequested);

        for mut node in [locked(), unlocked()] {
            let error = node.execute(&request).unwrap_err();
            assert!(matches!(error, StateError::UnexpectedEvent { .. }));
            assert_eq!(error.event_id(), request.id());
        }
    }

    #[test]
    fn pass_relocks_with_fresh_state() {
        let mut node = unlocked();
        node.execute(&event(TurnstileEvent::PassAttempted)).unwrap();

        let next = node.resolve_next().expect("should lock");
        assert!(next.state().is_locked());
        assert!(!next.state().has_credential());
        assert_ne!(next.id(), node.id());
        assert_eq!(next.transitions().len(), 1);
    }
}
