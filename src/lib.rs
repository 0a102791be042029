//! # File Compressor Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri front end (GUI)
//!
//! ## Architettura dei moduli:
//! - `classifier`: Tipo semantico di un file dall'estensione
//! - `compressors`: Strategie di compressione per tipo di file
//! - `toolbox`: Interfacce verso encoder immagini, Ghostscript, LibreOffice, decoder HEIC
//! - `batch`: Orchestratore, worker in background, eventi e cancellazione
//! - `config` / `settings_store`: Impostazioni utente e persistenza
//! - `i18n`: Traduzioni dell'interfaccia
//! - `tool_resolver` / `platform`: Ricerca dei tool esterni
//! - `file_manager`: Operazioni sui file e commit atomico dell'output
//! - `progress` / `json_output` / `notify`: Presentazione degli eventi
//! - `logging`: Console e file di log persistenti
//!
//! ## Utilizzo:
//! ```rust,ignore
//! use file_compressor::{BatchWorker, Settings, ToolPathResolver, Toolbox};
//! use std::sync::Arc;
//!
//! let worker = BatchWorker::start(Toolbox::system(Arc::new(ToolPathResolver::new())));
//! let handle = worker.submit(paths, &Settings::default())?;
//! let outcomes = handle.outcomes().await?;
//! ```

pub mod batch;
pub mod classifier;
pub mod compressors;
pub mod config;
pub mod error;
pub mod file_manager;
pub mod i18n;
pub mod json_output;
pub mod logging;
pub mod notify;
pub mod platform;
pub mod progress;
pub mod settings_store;
pub mod tool_resolver;
pub mod toolbox;
pub mod utils;

pub use batch::{
    BatchEvent, BatchHandle, BatchOrchestrator, BatchSummary, BatchWorker, CancelHandle, CompressionJob,
    CompressionOutcome, OutcomeStatus,
};
pub use classifier::{classify, FileKind};
pub use compressors::Strategy;
pub use config::{PdfPreset, Settings, SettingsPatch};
pub use error::{CompressError, ErrorKind};
pub use file_manager::FileManager;
pub use i18n::Localizer;
pub use json_output::JsonMessage;
pub use progress::ConsoleReporter;
pub use settings_store::SettingsStore;
pub use tool_resolver::ToolPathResolver;
pub use toolbox::Toolbox;
