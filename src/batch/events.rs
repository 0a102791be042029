//! # Batch Events
//!
//! Canale unidirezionale worker → presentazione e segnale di cancellazione.
//!
//! ## Responsabilità:
//! - `BatchEvent`: eventi di avanzamento emessi dal worker
//! - `BatchSummary`: statistiche aggregate a fine batch
//! - `EventSender`: wrapper su `mpsc::UnboundedSender` che ignora un ricevitore chiuso
//! - `CancelHandle`/`CancelSignal`: cancellazione cooperativa via `broadcast`

use super::job::CompressionOutcome;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::debug;

#[derive(Debug, Clone)]
pub enum BatchEvent {
    Started { total: usize },
    FileStarted { index: usize, total: usize, path: PathBuf },
    /// Emitted after every file; `completed` never decreases
    Progress { completed: usize, total: usize, outcome: CompressionOutcome },
    Finished { summary: BatchSummary },
}

/// Aggregate statistics of one batch run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Sum of original sizes over successful files
    pub original_bytes: u64,
    /// Sum of compressed sizes over successful files
    pub compressed_bytes: u64,
    /// (input, reason) for every failure, in batch order
    pub failures: Vec<(PathBuf, String)>,
    pub cancelled: bool,
    pub elapsed: Duration,
}

impl BatchSummary {
    pub fn new(total: usize) -> Self {
        Self { total, ..Default::default() }
    }

    pub fn record(&mut self, outcome: &CompressionOutcome) {
        if let Some(compressed) = outcome.compressed_size() {
            self.succeeded += 1;
            self.original_bytes += outcome.original_size;
            self.compressed_bytes += compressed;
        } else if outcome.is_failure() {
            self.failed += 1;
            let reason = outcome.reason().unwrap_or_default().to_string();
            self.failures.push((outcome.input.clone(), reason));
        } else {
            self.skipped += 1;
        }
    }

    pub fn completed(&self) -> usize {
        self.succeeded + self.failed + self.skipped
    }

    /// Bytes saved; negative growth counts as zero
    pub fn saved_bytes(&self) -> u64 {
        self.original_bytes.saturating_sub(self.compressed_bytes)
    }

    pub fn reduction_percent(&self) -> f64 {
        if self.original_bytes > 0 {
            (self.saved_bytes() as f64 / self.original_bytes as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Sending side of the event channel
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Option<mpsc::UnboundedSender<BatchEvent>>,
}

impl EventSender {
    /// Sender that drops every event
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn emit(&self, event: BatchEvent) {
        if let Some(ref tx) = self.tx {
            if tx.send(event).is_err() {
                debug!("Event receiver dropped, event discarded");
            }
        }
    }
}

/// New event channel
pub fn event_channel() -> (EventSender, mpsc::UnboundedReceiver<BatchEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx: Some(tx) }, rx)
}

/// Requests cancellation of a batch
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: broadcast::Sender<()>,
}

impl CancelHandle {
    pub fn new() -> (Self, CancelSignal) {
        let (tx, rx) = broadcast::channel(1);
        (Self { tx }, CancelSignal { rx, cancelled: false })
    }

    pub fn cancel(&self) {
        // No receiver left means the batch already finished
        let _ = self.tx.send(());
    }
}

/// Receiving side polled by the orchestrator between files
#[derive(Debug)]
pub struct CancelSignal {
    rx: broadcast::Receiver<()>,
    cancelled: bool,
}

impl CancelSignal {
    /// Whether cancellation was requested; stays true once observed
    pub fn is_cancelled(&mut self) -> bool {
        if !self.cancelled {
            self.cancelled = match self.rx.try_recv() {
                Ok(()) => true,
                Err(broadcast::error::TryRecvError::Empty) => false,
                Err(broadcast::error::TryRecvError::Lagged(_)) => true,
                // Handle dropped without cancelling
                Err(broadcast::error::TryRecvError::Closed) => false,
            };
        }
        self.cancelled
    }
}
