//! The machine and its run loop.

use super::config::MachineConfig;
use super::error::MachineError;
use super::reporter::{ErrorReceiver, ErrorReporter};
use crate::core::{Event, State, StateHistory, StateNode, StateRef, TransitionRecord};
use chrono::Utc;
use std::ops::ControlFlow;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

/// Lifecycle of a machine's run loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineStatus {
    /// Constructed, not yet started.
    Initial,
    /// Consuming events.
    Running,
    /// Terminal: the loop was cancelled or its event source closed.
    Stopped,
}

/// Why a run loop returned cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The cancellation token fired.
    Cancelled,
    /// Every event sender was dropped and the buffer drained.
    EventsClosed,
}

/// Drives one state machine over an inbound event channel.
///
/// The machine owns exactly one current [`StateNode`]. Its run loop is the
/// only writer of that node, so no locking is involved; to run many
/// machines concurrently, give each its own task and channels.
///
/// # Example
///
/// ```rust
/// use fsm_engine::engine::{Machine, StopReason};
/// use fsm_engine::turnstile::{self, TurnstileEvent};
/// use fsm_engine::core::Event;
/// use tokio::sync::mpsc;
/// use tokio_util::sync::CancellationToken;
/// use uuid::Uuid;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (mut machine, _errors) = Machine::new(Uuid::new_v4(), "gate", turnstile::locked());
/// let (tx, rx) = mpsc::channel(8);
///
/// tx.send(Event::now("reader", TurnstileEvent::CredentialPresented)).await.unwrap();
/// drop(tx);
///
/// let reason = machine.run(CancellationToken::new(), rx).await.unwrap();
/// assert_eq!(reason, StopReason::EventsClosed);
/// assert_eq!(machine.current().describe(), "Unlocked");
/// # }
/// ```
pub struct Machine<S: State> {
    id: Uuid,
    name: String,
    current: StateNode<S>,
    status: MachineStatus,
    reporter: ErrorReporter,
    history: StateHistory,
    processed: u64,
}

impl<S: State> Machine<S> {
    /// Create a machine with the default [`MachineConfig`].
    ///
    /// Returns the machine and the receiving half of its error channel.
    pub fn new(id: Uuid, name: impl Into<String>, initial: StateNode<S>) -> (Self, ErrorReceiver) {
        Self::with_config(id, name, initial, MachineConfig::default())
    }

    /// Create a machine with explicit tunables.
    ///
    /// An error capacity of zero is raised to one; use
    /// [`MachineBuilder`](crate::builder::MachineBuilder) to reject it instead.
    pub fn with_config(
        id: Uuid,
        name: impl Into<String>,
        initial: StateNode<S>,
        config: MachineConfig,
    ) -> (Self, ErrorReceiver) {
        let (reporter, errors) = ErrorReporter::channel(config.error_capacity, config.overflow);
        let machine = Self {
            id,
            name: name.into(),
            current: initial,
            status: MachineStatus::Initial,
            reporter,
            history: StateHistory::with_limit(config.history_limit),
            processed: 0,
        };
        (machine, errors)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The live state node.
    pub fn current(&self) -> &StateNode<S> {
        &self.current
    }

    pub fn status(&self) -> MachineStatus {
        self.status
    }

    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    /// Number of events taken off the inbound channel.
    pub fn processed_events(&self) -> u64 {
        self.processed
    }

    /// Number of state errors that could not be delivered.
    pub fn dropped_errors(&self) -> u64 {
        self.reporter.dropped()
    }

    /// Consume the machine, returning its current state.
    pub fn into_current(self) -> StateNode<S> {
        self.current
    }

    /// Run the event loop until `cancel` fires or `events` closes.
    ///
    /// Events are processed strictly in arrival order. After each event the
    /// current state's transitions are resolved and, if one fires, the
    /// successor replaces the current state. Errors from
    /// [`State::execute`] go to the error channel and the loop keeps going.
    ///
    /// Cancellation is checked before every receive, so buffered events are
    /// left unconsumed once the token fires. Returns an error only if the
    /// loop cannot start.
    pub async fn run(
        &mut self,
        cancel: CancellationToken,
        mut events: mpsc::Receiver<Event<S::Event>>,
    ) -> Result<StopReason, MachineError> {
        self.ensure_startable()?;
        self.status = MachineStatus::Running;
        info!(
            machine_id = %self.id,
            machine = %self.name,
            state = %self.current.describe(),
            "state machine started"
        );

        let reason = loop {
            let event = tokio::select! {
                biased;
                _ = cancel.cancelled() => break StopReason::Cancelled,
                received = events.recv() => match received {
                    Some(event) => event,
                    None => break StopReason::EventsClosed,
                },
            };

            if let ControlFlow::Break(reason) = self.dispatch(event, &cancel).await {
                break reason;
            }
        };

        self.status = MachineStatus::Stopped;
        info!(
            machine_id = %self.id,
            machine = %self.name,
            state = %self.current.describe(),
            processed = self.processed,
            reason = ?reason,
            "state machine stopped"
        );
        Ok(reason)
    }

    fn ensure_startable(&self) -> Result<(), MachineError> {
        if self.status == MachineStatus::Stopped {
            return Err(MachineError::AlreadyStopped {
                name: self.name.clone(),
            });
        }
        if self.reporter.is_closed() {
            return Err(MachineError::ErrorChannelClosed {
                name: self.name.clone(),
            });
        }
        Ok(())
    }

    async fn dispatch(
        &mut self,
        event: Event<S::Event>,
        cancel: &CancellationToken,
    ) -> ControlFlow<StopReason> {
        self.processed += 1;
        debug!(
            machine_id = %self.id,
            state = %self.current.describe(),
            event = event.name(),
            event_id = %event.id(),
            source = event.source(),
            "dispatching event"
        );

        if let Err(error) = self.current.execute(&event) {
            return self.reporter.report(error, cancel).await;
        }

        if let Some(next) = self.current.resolve_next() {
            let previous = std::mem::replace(&mut self.current, next);
            let record = TransitionRecord {
                from: StateRef::of(previous.state()),
                to: StateRef::of(self.current.state()),
                event_id: event.id(),
                timestamp: Utc::now(),
            };
            debug!(
                machine_id = %self.id,
                from = %record.from.description,
                to = %record.to.description,
                event_id = %record.event_id,
                "transition fired"
            );
            self.history.record(record);
        }

        ControlFlow::Continue(())
    }
}

impl<S: State + std::fmt::Debug> std::fmt::Debug for Machine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Machine")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("current", &self.current)
            .field("status", &self.status)
            .field("processed", &self.processed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EventKind, StateError, Transition};

    #[derive(Clone, Debug, PartialEq)]
    enum Step {
        Advance,
        Stall,
        Bogus,
    }

    impl EventKind for Step {
        fn name(&self) -> &str {
            match self {
                Self::Advance => "advance",
                Self::Stall => "stall",
                Self::Bogus => "bogus",
            }
        }
    }

    #[derive(Debug)]
    struct Stage {
        id: Uuid,
        index: u32,
        ready: bool,
    }

    impl Stage {
        fn at(index: u32) -> Self {
            Self {
                id: Uuid::new_v4(),
                index,
                ready: false,
            }
        }
    }

    impl State for Stage {
        type Event = Step;

        fn id(&self) -> Uuid {
            self.id
        }

        fn describe(&self) -> &str {
            "Stage"
        }

        fn execute(&mut self, event: &Event<Step>) -> Result<(), StateError> {
            match event.kind() {
                Step::Advance => {
                    self.ready = true;
                    Ok(())
                }
                Step::Stall => Err(StateError::precondition("Stage", event, "stalled")),
                Step::Bogus => Err(StateError::unexpected("Stage", event)),
            }
        }
    }

    fn stage(index: u32) -> StateNode<Stage> {
        Stage::at(index).with_transitions([Transition::to(|from: &Stage| stage(from.index + 1))
            .when(|s: &Stage| s.ready)])
    }

    fn event(step: Step) -> Event<Step> {
        Event::now("test", step)
    }

    #[tokio::test]
    async fn run_applies_transitions_in_order() {
        let (mut machine, _errors) = Machine::new(Uuid::new_v4(), "stages", stage(0));
        let (tx, rx) = mpsc::channel(8);
        for _ in 0..3 {
            tx.send(event(Step::Advance)).await.unwrap();
        }
        drop(tx);

        let reason = machine.run(CancellationToken::new(), rx).await.unwrap();

        assert_eq!(reason, StopReason::EventsClosed);
        assert_eq!(machine.status(), MachineStatus::Stopped);
        assert_eq!(machine.current().state().index, 3);
        assert_eq!(machine.processed_events(), 3);
        assert_eq!(machine.history().len(), 3);
    }

    #[tokio::test]
    async fn errors_go_to_channel_and_loop_continues() {
        let (mut machine, mut errors) = Machine::new(Uuid::new_v4(), "stages", stage(0));
        let (tx, rx) = mpsc::channel(8);
        let stall = event(Step::Stall);
        let bogus = event(Step::Bogus);
        tx.send(stall.clone()).await.unwrap();
        tx.send(bogus.clone()).await.unwrap();
        tx.send(event(Step::Advance)).await.unwrap();
        drop(tx);

        machine.run(CancellationToken::new(), rx).await.unwrap();

        assert_eq!(
            errors.recv().await,
            Some(StateError::precondition("Stage", &stall, "stalled"))
        );
        assert_eq!(
            errors.recv().await,
            Some(StateError::unexpected("Stage", &bogus))
        );
        assert_eq!(machine.current().state().index, 1);
    }

    #[tokio::test]
    async fn stopped_machine_cannot_rerun() {
        let (mut machine, _errors) = Machine::new(Uuid::new_v4(), "stages", stage(0));
        let (tx, rx) = mpsc::channel::<Event<Step>>(1);
        drop(tx);
        machine.run(CancellationToken::new(), rx).await.unwrap();

        let (_tx, rx) = mpsc::channel(1);
        let result = machine.run(CancellationToken::new(), rx).await;
        assert_eq!(
            result,
            Err(MachineError::AlreadyStopped {
                name: "stages".to_string()
            })
        );
    }

    #[tokio::test]
    async fn dropped_error_receiver_refuses_start() {
        let (mut machine, errors) = Machine::new(Uuid::new_v4(), "stages", stage(0));
        drop(errors);
        let (_tx, rx) = mpsc::channel(1);

        let result = machine.run(CancellationToken::new(), rx).await;
        assert!(matches!(result, Err(MachineError::ErrorChannelClosed { .. })));
        assert_eq!(machine.status(), MachineStatus::Initial);
    }

    #[tokio::test]
    async fn cancelled_before_start_consumes_nothing() {
        let (mut machine, _errors) = Machine::new(Uuid::new_v4(), "stages", stage(0));
        let (tx, rx) = mpsc::channel(4);
        tx.send(event(Step::Advance)).await.unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let reason = machine.run(cancel, rx).await.unwrap();

        assert_eq!(reason, StopReason::Cancelled);
        assert_eq!(machine.processed_events(), 0);
        assert_eq!(machine.current().state().index, 0);
    }

    #[tokio::test]
    async fn history_records_transition_path() {
        let config = MachineConfig {
            history_limit: 2,
            ..MachineConfig::default()
        };
        let (mut machine, _errors) =
            Machine::with_config(Uuid::new_v4(), "stages", stage(0), config);
        let (tx, rx) = mpsc::channel(8);
        let events: Vec<_> = (0..3).map(|_| event(Step::Advance)).collect();
        for e in &events {
            tx.send(e.clone()).await.unwrap();
        }
        drop(tx);

        machine.run(CancellationToken::new(), rx).await.unwrap();

        let records: Vec<_> = machine.history().transitions().collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].event_id, events[1].id());
        assert_eq!(records[1].event_id, events[2].id());
        assert_eq!(records[1].to.id, machine.current().id());
        assert_eq!(machine.history().evicted(), 1);
    }
}
