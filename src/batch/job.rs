//! Per-file job and outcome records.

use crate::classifier::FileKind;
use crate::compressors::Strategy;
use crate::config::Settings;
use crate::error::{CompressError, ErrorKind};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// A file accepted into a batch
#[derive(Debug, Clone)]
pub struct CompressionJob {
    /// Position in the batch input list
    pub index: usize,
    pub input: PathBuf,
    pub kind: FileKind,
    pub strategy: Strategy,
    /// Settings snapshot taken when the batch was submitted
    pub settings: Arc<Settings>,
}

impl CompressionJob {
    pub fn new(index: usize, input: PathBuf, kind: FileKind, settings: Arc<Settings>) -> Self {
        Self {
            index,
            input,
            kind,
            strategy: Strategy::for_kind(kind),
            settings,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeStatus {
    Success { output: PathBuf, compressed_size: u64 },
    Failure { error: ErrorKind, reason: String },
    Skipped { reason: String },
}

/// Result of one job, produced exactly once
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionOutcome {
    pub index: usize,
    pub input: PathBuf,
    /// `None` when the file was not classified
    pub kind: Option<FileKind>,
    pub status: OutcomeStatus,
    /// 0 when the input could not be read
    pub original_size: u64,
    pub elapsed: Duration,
}

impl CompressionOutcome {
    pub fn success(job: &CompressionJob, original_size: u64, output: PathBuf, compressed_size: u64, elapsed: Duration) -> Self {
        Self {
            index: job.index,
            input: job.input.clone(),
            kind: Some(job.kind),
            status: OutcomeStatus::Success { output, compressed_size },
            original_size,
            elapsed,
        }
    }

    pub fn failure(job: &CompressionJob, original_size: u64, error: &CompressError, elapsed: Duration) -> Self {
        Self {
            index: job.index,
            input: job.input.clone(),
            kind: Some(job.kind),
            status: OutcomeStatus::Failure {
                error: error.kind(),
                reason: error.to_string(),
            },
            original_size,
            elapsed,
        }
    }

    pub fn skipped(index: usize, input: PathBuf, reason: String) -> Self {
        Self {
            index,
            input,
            kind: None,
            status: OutcomeStatus::Skipped { reason },
            original_size: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Success { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failure { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, OutcomeStatus::Skipped { .. })
    }

    pub fn compressed_size(&self) -> Option<u64> {
        match self.status {
            OutcomeStatus::Success { compressed_size, .. } => Some(compressed_size),
            _ => None,
        }
    }

    pub fn output(&self) -> Option<&PathBuf> {
        match self.status {
            OutcomeStatus::Success { ref output, .. } => Some(output),
            _ => None,
        }
    }

    /// Failure or skip reason
    pub fn reason(&self) -> Option<&str> {
        match self.status {
            OutcomeStatus::Failure { ref reason, .. } | OutcomeStatus::Skipped { ref reason } => Some(reason),
            OutcomeStatus::Success { .. } => None,
        }
    }
}
