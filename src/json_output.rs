//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON per comunicazione con un front end
//! esterno (GUI, script).
//!
//! ## Responsabilità:
//! - Converte ogni `BatchEvent` in un messaggio JSON su una riga
//! - Fornisce interfaccia standardizzata per comunicazione inter-processo
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio del batch con le impostazioni usate
//! - `file_start`: Inizio elaborazione di un file
//! - `file_complete`: Fine elaborazione di un file (successo, errore o skipped)
//! - `progress`: Progresso corrente
//! - `complete`: Fine batch con statistiche finali
//! - `error`: Errore che impedisce di avviare o completare il batch

use crate::batch::{BatchEvent, BatchSummary, CompressionOutcome, OutcomeStatus};
use crate::config::Settings;
use crate::error::ErrorKind;
use crate::file_manager::FileManager;
use serde::Serialize;
use std::path::PathBuf;
use tracing::warn;

/// Tipo di messaggio JSON
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JsonMessage {
    /// Inizio del batch
    Start {
        total_files: usize,
        config: JsonConfig,
    },

    /// Inizio elaborazione di un file specifico
    FileStart {
        path: PathBuf,
        index: usize,
        total: usize,
    },

    /// Fine elaborazione di un file specifico
    FileComplete {
        path: PathBuf,
        index: usize,
        status: &'static str,
        kind: Option<&'static str>,
        output: Option<PathBuf>,
        original_size: u64,
        compressed_size: Option<u64>,
        reduction_percent: Option<f64>,
        error_kind: Option<ErrorKind>,
        error: Option<String>,
        duration_seconds: f64,
    },

    /// Progresso corrente
    Progress {
        current: usize,
        total: usize,
        percentage: f64,
    },

    /// Batch completato
    Complete {
        total_files: usize,
        succeeded: usize,
        failed: usize,
        skipped: usize,
        total_bytes_saved: u64,
        average_reduction: f64,
        cancelled: bool,
        duration_seconds: f64,
    },

    /// Errore generale
    Error {
        message: String,
        details: Option<String>,
    },
}

/// Impostazioni riportate nel messaggio `start`
#[derive(Debug, Serialize)]
pub struct JsonConfig {
    pub jpeg_quality: u8,
    pub pdf_quality: &'static str,
    pub auto_overwrite: bool,
    pub output_directory: Option<PathBuf>,
    pub language: String,
}

impl From<&Settings> for JsonConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            jpeg_quality: settings.jpeg_quality,
            pdf_quality: settings.pdf_quality.as_str(),
            auto_overwrite: settings.auto_overwrite,
            output_directory: settings.output_directory.clone(),
            language: settings.language.clone(),
        }
    }
}

impl JsonMessage {
    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        match serde_json::to_string(self) {
            Ok(json) => println!("{}", json),
            Err(e) => warn!("Failed to serialize JSON message: {}", e),
        }
    }

    pub fn error(message: impl Into<String>, details: Option<String>) -> Self {
        Self::Error {
            message: message.into(),
            details,
        }
    }

    /// Messages for one batch event; a file completion also reports progress
    pub fn from_event(event: &BatchEvent, settings: &Settings) -> Vec<Self> {
        match event {
            BatchEvent::Started { total } => vec![Self::Start {
                total_files: *total,
                config: JsonConfig::from(settings),
            }],
            BatchEvent::FileStarted { index, total, path } => vec![Self::FileStart {
                path: path.clone(),
                index: *index,
                total: *total,
            }],
            BatchEvent::Progress { completed, total, outcome } => {
                let percentage = if *total > 0 {
                    (*completed as f64 / *total as f64) * 100.0
                } else {
                    0.0
                };
                vec![
                    Self::file_complete(outcome),
                    Self::Progress {
                        current: *completed,
                        total: *total,
                        percentage,
                    },
                ]
            }
            BatchEvent::Finished { summary } => vec![Self::complete(summary)],
        }
    }

    fn file_complete(outcome: &CompressionOutcome) -> Self {
        let (status, output, compressed_size, error_kind, error) = match &outcome.status {
            OutcomeStatus::Success { output, compressed_size } => {
                ("success", Some(output.clone()), Some(*compressed_size), None, None)
            }
            OutcomeStatus::Failure { error, reason } => ("failure", None, None, Some(*error), Some(reason.clone())),
            OutcomeStatus::Skipped { reason } => ("skipped", None, None, None, Some(reason.clone())),
        };

        Self::FileComplete {
            path: outcome.input.clone(),
            index: outcome.index,
            status,
            kind: outcome.kind.map(|k| k.label()),
            output,
            original_size: outcome.original_size,
            compressed_size,
            reduction_percent: compressed_size
                .map(|size| FileManager::calculate_reduction(outcome.original_size, size)),
            error_kind,
            error,
            duration_seconds: outcome.elapsed.as_secs_f64(),
        }
    }

    fn complete(summary: &BatchSummary) -> Self {
        Self::Complete {
            total_files: summary.total,
            succeeded: summary.succeeded,
            failed: summary.failed,
            skipped: summary.skipped,
            total_bytes_saved: summary.saved_bytes(),
            average_reduction: summary.reduction_percent(),
            cancelled: summary.cancelled,
            duration_seconds: summary.elapsed.as_secs_f64(),
        }
    }
}
