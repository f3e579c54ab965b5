//! The outbound error channel paired with each machine.

use super::config::OverflowPolicy;
use super::machine::StopReason;
use crate::core::StateError;
use std::ops::ControlFlow;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Receiving half of a machine's error channel.
///
/// Drain it continuously: under [`OverflowPolicy::Block`] a full channel
/// stalls the machine's event intake.
pub type ErrorReceiver = mpsc::Receiver<StateError>;

/// Sending half of the error channel, owned by the run loop.
#[derive(Debug)]
pub(crate) struct ErrorReporter {
    tx: mpsc::Sender<StateError>,
    overflow: OverflowPolicy,
    dropped: u64,
}

impl ErrorReporter {
    pub(crate) fn channel(capacity: usize, overflow: OverflowPolicy) -> (Self, ErrorReceiver) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let reporter = Self {
            tx,
            overflow,
            dropped: 0,
        };
        (reporter, rx)
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub(crate) fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Hand `error` to the consumer according to the overflow policy.
    ///
    /// Breaks only when `cancel` fires while waiting for channel capacity;
    /// an error that fits in the channel is always delivered.
    pub(crate) async fn report(
        &mut self,
        error: StateError,
        cancel: &CancellationToken,
    ) -> ControlFlow<StopReason> {
        match self.overflow {
            OverflowPolicy::Block => match self.tx.try_send(error) {
                Ok(()) => {}
                Err(TrySendError::Closed(error)) => {
                    self.undeliverable(error.event_id(), "error receiver dropped");
                }
                Err(TrySendError::Full(error)) => {
                    let event_id = error.event_id();
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            self.dropped += 1;
                            return ControlFlow::Break(StopReason::Cancelled);
                        }
                        sent = self.tx.send(error) => {
                            if sent.is_err() {
                                self.undeliverable(event_id, "error receiver dropped");
                            }
                        }
                    }
                }
            },
            OverflowPolicy::DropNewest => match self.tx.try_send(error) {
                Ok(()) => {}
                Err(TrySendError::Full(error)) => {
                    self.undeliverable(error.event_id(), "error channel full");
                }
                Err(TrySendError::Closed(error)) => {
                    self.undeliverable(error.event_id(), "error receiver dropped");
                }
            },
        }
        ControlFlow::Continue(())
    }

    fn undeliverable(&mut self, event_id: uuid::Uuid, cause: &str) {
        self.dropped += 1;
        warn!(
            event_id = %event_id,
            dropped = self.dropped,
            cause,
            "discarding state error"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn error() -> StateError {
        StateError::UnexpectedEvent {
            state: "Idle".to_string(),
            event: "poke".to_string(),
            event_id: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn block_policy_delivers_errors() {
        let (mut reporter, mut rx) = ErrorReporter::channel(4, OverflowPolicy::Block);
        let cancel = CancellationToken::new();
        let sent = error();

        assert!(reporter.report(sent.clone(), &cancel).await.is_continue());
        assert_eq!(rx.recv().await, Some(sent));
        assert_eq!(reporter.dropped(), 0);
    }

    #[tokio::test]
    async fn block_policy_yields_to_cancellation_when_full() {
        let (mut reporter, _rx) = ErrorReporter::channel(1, OverflowPolicy::Block);
        let cancel = CancellationToken::new();

        assert!(reporter.report(error(), &cancel).await.is_continue());

        cancel.cancel();
        let flow = reporter.report(error(), &cancel).await;
        assert_eq!(flow, ControlFlow::Break(StopReason::Cancelled));
        assert_eq!(reporter.dropped(), 1);
    }

    #[tokio::test]
    async fn block_policy_delivers_after_cancel_when_room() {
        let (mut reporter, mut rx) = ErrorReporter::channel(2, OverflowPolicy::Block);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let sent = error();

        assert!(reporter.report(sent.clone(), &cancel).await.is_continue());
        assert_eq!(rx.recv().await, Some(sent));
    }

    #[tokio::test]
    async fn drop_newest_counts_overflow() {
        let (mut reporter, mut rx) = ErrorReporter::channel(1, OverflowPolicy::DropNewest);
        let cancel = CancellationToken::new();
        let first = error();

        assert!(reporter.report(first.clone(), &cancel).await.is_continue());
        assert!(reporter.report(error(), &cancel).await.is_continue());

        assert_eq!(reporter.dropped(), 1);
        assert_eq!(rx.recv().await, Some(first));
    }

    #[tokio::test]
    async fn closed_receiver_is_counted_not_fatal() {
        let (mut reporter, rx) = ErrorReporter::channel(2, OverflowPolicy::Block);
        drop(rx);
        let cancel = CancellationToken::new();

        assert!(reporter.is_closed());
        assert!(reporter.report(error(), &cancel).await.is_continue());
        assert_eq!(reporter.dropped(), 1);
    }
}
