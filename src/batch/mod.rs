//! # Batch Module
//!
//! Separa le responsabilità del batch in sottomoduli:
//! - `job`: job e outcome per file
//! - `events`: eventi di progresso, riepilogo e cancellazione
//! - `path_resolver`: calcolo del path di output
//! - `orchestrator`: esecuzione sequenziale di un batch
//! - `worker`: task in background con coda dei batch

pub mod events;
pub mod job;
pub mod orchestrator;
pub mod path_resolver;
pub mod worker;

pub use events::{event_channel, BatchEvent, BatchSummary, CancelHandle, CancelSignal, EventSender};
pub use job::{CompressionJob, CompressionOutcome, OutcomeStatus};
pub use orchestrator::BatchOrchestrator;
pub use path_resolver::{PathResolver, COMPRESSED_SUFFIX};
pub use worker::{BatchHandle, BatchWorker};
