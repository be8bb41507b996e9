//! Interval-driven autosave task
//!
//! The scheduler wakes every `interval`, asks the caller for the current
//! state and hands it to [`AutosaveManager::perform_autosave`] on the
//! blocking pool. Outcomes are reported as [`AutosaveEvent`]s.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

use super::manager::AutosaveManager;
use super::store::SnapshotStore;
use crate::history::StateTree;

/// Events emitted by the autosave task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutosaveEvent {
    /// A snapshot was written under this name
    Saved(String),
    /// A save attempt failed (the task keeps running)
    Failed(String),
    /// The task stopped
    Stopped,
}

/// Handle to a running autosave task
#[derive(Debug)]
pub struct AutosaveScheduler {
    stop_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl AutosaveScheduler {
    /// Spawns the autosave loop on the current tokio runtime.
    ///
    /// `read_state` returns `None` when there is nothing to save (for
    /// example while a restore is in progress); that tick is skipped. The
    /// first save happens one full interval after start.
    pub fn start<S, F>(
        manager: Arc<AutosaveManager<S>>,
        interval: Duration,
        read_state: F,
    ) -> (Self, mpsc::Receiver<AutosaveEvent>)
    where
        S: SnapshotStore + Send + Sync + 'static,
        F: Fn() -> Option<StateTree> + Send + 'static,
    {
        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
        let (event_tx, event_rx) = mpsc::channel::<AutosaveEvent>(16);
        let interval = interval.max(Duration::from_millis(1));

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            tracing::info!(interval_ms = interval.as_millis(), "Autosave started");

            loop {
                tokio::select! {
                    _ = stop_rx.recv() => break,
                    _ = ticker.tick() => {
                        let Some(state) = read_state() else {
                            tracing::debug!("Autosave tick skipped, no state");
                            continue;
                        };
                        let manager = Arc::clone(&manager);
                        let outcome = tokio::task::spawn_blocking(move || manager.perform_autosave(&state)).await;
                        let event = match outcome {
                            Ok(Ok(name)) => AutosaveEvent::Saved(name),
                            Ok(Err(e)) => {
                                tracing::warn!(error = %e, "Autosave failed");
                                AutosaveEvent::Failed(e.to_string())
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "Autosave task panicked");
                                AutosaveEvent::Failed(e.to_string())
                            }
                        };
                        if !emit(&event_tx, event) {
                            break; // receiver dropped
                        }
                    }
                }
            }

            emit(&event_tx, AutosaveEvent::Stopped);
            tracing::info!("Autosave stopped");
        });

        (Self { stop_tx, task }, event_rx)
    }

    /// Signals the task to stop without waiting for it.
    pub async fn stop(&self) {
        let _ = self.stop_tx.send(()).await;
    }

    /// Stops the task and waits until it has finished its current save.
    pub async fn shutdown(self) {
        let _ = self.stop_tx.send(()).await;
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Autosave task ended abnormally");
        }
    }

    /// Returns true once the task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Sends without blocking the loop on a slow receiver. Returns false once
/// the receiver is gone.
fn emit(tx: &mpsc::Sender<AutosaveEvent>, event: AutosaveEvent) -> bool {
    match tx.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(event)) => {
            tracing::debug!(?event, "Autosave event dropped, receiver is behind");
            true
        }
        Err(TrySendError::Closed(_)) => false,
    }
}
