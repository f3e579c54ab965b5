//! Running a machine on its own tokio task.

use super::error::{MachineError, TaskError};
use super::machine::{Machine, StopReason};
use crate::core::{Event, State};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

impl<S: State> Machine<S> {
    /// Launch the run loop on a new tokio task.
    ///
    /// The task owns the machine until the loop ends and then hands it back
    /// through [`MachineTask::join`] or [`MachineTask::shutdown`], so the
    /// final state and history can be inspected.
    pub fn spawn(
        mut self,
        cancel: CancellationToken,
        events: mpsc::Receiver<Event<S::Event>>,
    ) -> MachineTask<S> {
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            let reason = self.run(token, events).await?;
            Ok::<_, MachineError>((self, reason))
        });
        MachineTask { cancel, handle }
    }
}

/// Handle to a machine running on its own task.
pub struct MachineTask<S: State> {
    cancel: CancellationToken,
    handle: JoinHandle<Result<(Machine<S>, StopReason), MachineError>>,
}

impl<S: State> MachineTask<S> {
    /// Ask the run loop to stop. Returns immediately.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the loop to end on its own, e.g. after the event senders are
    /// dropped.
    pub async fn join(self) -> Result<(Machine<S>, StopReason), TaskError> {
        Ok(self.handle.await??)
    }

    /// Cancel the loop and wait for it to stop.
    pub async fn shutdown(self) -> Result<(Machine<S>, StopReason), TaskError> {
        self.cancel();
        self.join().await
    }
}
