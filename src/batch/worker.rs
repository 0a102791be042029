//! # Batch Worker
//!
//! Un singolo task in background che esegue i batch uno alla volta.
//!
//! ## Responsabilità:
//! - Coda dei batch in ordine di sottomissione (`mpsc`)
//! - Snapshot delle impostazioni al momento della sottomissione
//! - Restituisce al chiamante un `BatchHandle`: eventi, cancellazione, outcome finali
//!
//! Il chiamante (CLI o UI) non esegue mai I/O sui file né tool esterni.

use super::events::{event_channel, BatchEvent, CancelHandle, CancelSignal, EventSender};
use super::job::CompressionOutcome;
use super::orchestrator::BatchOrchestrator;
use crate::config::Settings;
use crate::toolbox::Toolbox;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

struct BatchRequest {
    paths: Vec<PathBuf>,
    settings: Arc<Settings>,
    events: EventSender,
    cancel: CancelSignal,
    reply: oneshot::Sender<Vec<CompressionOutcome>>,
}

/// Background worker owning the batch queue
pub struct BatchWorker {
    queue: mpsc::UnboundedSender<BatchRequest>,
    task: JoinHandle<()>,
}

impl BatchWorker {
    /// Spawn the worker task on the current runtime
    pub fn start(toolbox: Toolbox) -> Self {
        let (queue, mut requests) = mpsc::unbounded_channel::<BatchRequest>();
        let orchestrator = BatchOrchestrator::new(toolbox);

        let task = tokio::spawn(async move {
            while let Some(mut request) = requests.recv().await {
                debug!("Worker picked up a batch of {} paths", request.paths.len());
                let outcomes = orchestrator
                    .run_batch(request.paths, request.settings, &request.events, &mut request.cancel)
                    .await;
                if request.reply.send(outcomes).is_err() {
                    debug!("Batch handle dropped before completion");
                }
            }
            debug!("Batch worker stopped");
        });

        Self { queue, task }
    }

    /// Queue a batch; `settings` is snapshotted now
    pub fn submit(&self, paths: Vec<PathBuf>, settings: &Settings) -> Result<BatchHandle> {
        let (events, event_rx) = event_channel();
        let (cancel_handle, cancel) = CancelHandle::new();
        let (reply, outcomes) = oneshot::channel();

        self.queue
            .send(BatchRequest {
                paths,
                settings: Arc::new(settings.clone()),
                events,
                cancel,
                reply,
            })
            .map_err(|_| anyhow::anyhow!("Batch worker is not running"))?;

        Ok(BatchHandle {
            events: event_rx,
            cancel: cancel_handle,
            outcomes,
        })
    }

    /// Finish queued batches and stop the worker
    pub async fn shutdown(self) -> Result<()> {
        drop(self.queue);
        self.task.await?;
        Ok(())
    }
}

/// Caller side of a submitted batch
pub struct BatchHandle {
    events: mpsc::UnboundedReceiver<BatchEvent>,
    cancel: CancelHandle,
    outcomes: oneshot::Receiver<Vec<CompressionOutcome>>,
}

impl BatchHandle {
    /// Next event; `None` once the batch is over
    pub async fn next_event(&mut self) -> Option<BatchEvent> {
        self.events.recv().await
    }

    /// Handle usable from another task (e.g. a Ctrl+C listener)
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Stop after the file currently being processed
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the batch and return its outcomes
    pub async fn outcomes(self) -> Result<Vec<CompressionOutcome>> {
        self.outcomes
            .await
            .map_err(|_| anyhow::anyhow!("Batch worker stopped before finishing the batch"))
    }
}
