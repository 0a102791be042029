//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom della compressione.
//!
//! ## Responsabilità:
//! - Definisce `CompressError` enum per categorizzare ogni fallimento per-file
//! - Fornisce messaggi leggibili dall'utente (mai stack trace grezzi)
//! - Espone un codice stabile (`ErrorKind`) per output JSON e riepiloghi
//!
//! ## Categorie di errori:
//! - `UnsupportedFormat`: estensione non gestita (registrato come skipped, non fatale)
//! - `InputUnreadable`: file mancante, non regolare o non leggibile
//! - `ExternalToolMissing`: tool esterno non installato (gs, soffice, heif-convert)
//! - `ExternalToolFailed`: exit code non zero, output mancante o timeout
//! - `InvalidContent`: contenuto corrotto o non decodificabile
//! - `OutputWriteFailed`: permessi o spazio disco insufficiente
//! - `ConversionStageFailed`: primo stadio della pipeline DOCX → PDF
//!
//! ## Esempio:
//! ```rust,ignore
//! if resolver.resolve(Tool::Ghostscript).is_none() {
//!     return Err(CompressError::tool_missing(Tool::Ghostscript));
//! }
//! ```

use crate::platform::Tool;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Failure of a single file's compression
#[derive(thiserror::Error, Debug)]
pub enum CompressError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Cannot read {}: {reason}", path.display())]
    InputUnreadable { path: PathBuf, reason: String },

    #[error("{tool} is not installed ({hint})")]
    ExternalToolMissing { tool: String, hint: String },

    #[error("{tool} failed: {detail}")]
    ExternalToolFailed { tool: String, detail: String },

    #[error("Invalid or corrupt content: {0}")]
    InvalidContent(String),

    #[error("Cannot write {}: {reason}", path.display())]
    OutputWriteFailed { path: PathBuf, reason: String },

    #[error("Conversion to PDF failed: {0}")]
    ConversionStageFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Stable error code, independent of the message text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnsupportedFormat,
    InputUnreadable,
    ExternalToolMissing,
    ExternalToolFailed,
    InvalidContent,
    OutputWriteFailed,
    ConversionStageFailed,
    Io,
}

impl CompressError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            Self::InputUnreadable { .. } => ErrorKind::InputUnreadable,
            Self::ExternalToolMissing { .. } => ErrorKind::ExternalToolMissing,
            Self::ExternalToolFailed { .. } => ErrorKind::ExternalToolFailed,
            Self::InvalidContent(_) => ErrorKind::InvalidContent,
            Self::OutputWriteFailed { .. } => ErrorKind::OutputWriteFailed,
            Self::ConversionStageFailed(_) => ErrorKind::ConversionStageFailed,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    pub fn input_unreadable(path: &Path, reason: impl ToString) -> Self {
        Self::InputUnreadable {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn output_write_failed(path: &Path, reason: impl ToString) -> Self {
        Self::OutputWriteFailed {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn tool_missing(tool: Tool) -> Self {
        Self::ExternalToolMissing {
            tool: tool.display_name().to_string(),
            hint: tool.install_hint(),
        }
    }

    pub fn tool_failed(tool: impl ToString, detail: impl ToString) -> Self {
        Self::ExternalToolFailed {
            tool: tool.to_string(),
            detail: detail.to_string(),
        }
    }
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat => "unsupported_format",
            Self::InputUnreadable => "input_unreadable",
            Self::ExternalToolMissing => "external_tool_missing",
            Self::ExternalToolFailed => "external_tool_failed",
            Self::InvalidContent => "invalid_content",
            Self::OutputWriteFailed => "output_write_failed",
            Self::ConversionStageFailed => "conversion_stage_failed",
            Self::Io => "io",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
