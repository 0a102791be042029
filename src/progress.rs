//! # Progress Tracking and Summary Module
//!
//! Questo modulo rende gli eventi del batch sulla console.
//!
//! ## Responsabilità:
//! - Progress bar visual con `indicatif` per feedback real-time
//! - Messaggi localizzati per ogni file completato o fallito
//! - Riepilogo finale localizzato (successi, skipped, byte risparmiati, errori)
//!
//! ## Componenti principali:
//! - `ProgressManager`: gestisce la progress bar
//! - `ConsoleReporter`: consuma `BatchEvent` e aggiorna la barra
//! - `format_summary`: testo del riepilogo, massimo 10 errori mostrati
//!
//! ## Visual feedback:
//! ```text
//! ⠋ [00:00:12] [=========>------------------------------] 3/12 (25%) Compressing 4 of 12...
//! ```

use crate::batch::{BatchEvent, BatchSummary, CompressionOutcome, OutcomeStatus};
use crate::file_manager::FileManager;
use crate::i18n::Localizer;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::warn;

/// Errors listed in the summary before collapsing the rest into one line
pub const MAX_SHOWN_ERRORS: usize = 10;

/// Manages the progress bar of a batch
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);

        match ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        {
            Ok(style) => bar.set_style(style.progress_chars("=>-")),
            Err(e) => warn!("Invalid progress bar template: {}", e),
        }

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Hidden bar, for when progress display is turned off
    pub fn hidden() -> Self {
        Self { bar: ProgressBar::hidden() }
    }

    /// Move to `position` with a message
    pub fn update(&self, position: u64, message: &str) {
        self.bar.set_position(position);
        self.bar.set_message(message.to_string());
    }

    pub fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    /// Print a line above the bar
    pub fn println(&self, line: &str) {
        self.bar.println(line);
    }

    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// Renders batch events for a terminal user
pub struct ConsoleReporter {
    localizer: Localizer,
    show_progress: bool,
    progress: ProgressManager,
}

impl ConsoleReporter {
    pub fn new(localizer: Localizer, show_progress: bool) -> Self {
        Self {
            localizer,
            show_progress,
            progress: ProgressManager::hidden(),
        }
    }

    pub fn handle(&mut self, event: &BatchEvent) {
        match event {
            BatchEvent::Started { total } => {
                if self.show_progress && *total > 0 {
                    self.progress = ProgressManager::new(*total as u64);
                }
            }
            BatchEvent::FileStarted { index, total, .. } => {
                self.progress.set_message(&self.localizer.format(
                    "progress_compressing",
                    &[("current", (index + 1).to_string()), ("total", total.to_string())],
                ));
            }
            BatchEvent::Progress { completed, outcome, .. } => {
                let line = self.outcome_line(outcome);
                if self.show_progress {
                    self.progress.println(&line);
                } else {
                    println!("{}", line);
                }
                self.progress.update(*completed as u64, &line);
            }
            BatchEvent::Finished { summary } => {
                self.progress.finish(&self.localizer.text("done_title"));
                println!("{}", format_summary(summary, &self.localizer));
            }
        }
    }

    fn outcome_line(&self, outcome: &CompressionOutcome) -> String {
        let path = outcome.input.display().to_string();
        match &outcome.status {
            OutcomeStatus::Success { compressed_size, .. } => format!(
                "✅ {} ({} -> {})",
                self.localizer.format("compressed_file", &[("path", path)]),
                FileManager::format_size(outcome.original_size),
                FileManager::format_size(*compressed_size)
            ),
            OutcomeStatus::Failure { reason, .. } => format!(
                "❌ {}",
                self.localizer.format("failed_compress", &[("path", path), ("error", reason.clone())])
            ),
            OutcomeStatus::Skipped { .. } => format!(
                "⏭️  {}",
                self.localizer.format("unsupported_file_type", &[("path", path)])
            ),
        }
    }
}

/// Localized end-of-batch summary
pub fn format_summary(summary: &BatchSummary, localizer: &Localizer) -> String {
    let mut lines = Vec::new();

    if summary.cancelled {
        lines.push(localizer.format(
            "cancelled_message",
            &[
                ("completed", summary.completed().to_string()),
                ("total", summary.total.to_string()),
            ],
        ));
    }

    lines.push(localizer.format("success_message", &[("count", summary.succeeded.to_string())]));

    if summary.succeeded > 0 {
        lines.push(localizer.format(
            "saved_message",
            &[
                ("saved", FileManager::format_size(summary.saved_bytes())),
                ("percent", format!("{:.1}", summary.reduction_percent())),
            ],
        ));
    }

    if summary.skipped > 0 {
        lines.push(localizer.format("skipped_message", &[("count", summary.skipped.to_string())]));
    }

    if !summary.failures.is_empty() {
        let shown: Vec<String> = summary
            .failures
            .iter()
            .take(MAX_SHOWN_ERRORS)
            .map(|(path, reason)| format!("  • {}: {}", path.display(), reason))
            .collect();
        lines.push(localizer.format("error_message", &[("errors", shown.join("\n"))]));

        let hidden = summary.failures.len().saturating_sub(MAX_SHOWN_ERRORS);
        if hidden > 0 {
            lines.push(localizer.format("more_errors", &[("count", hidden.to_string())]));
        }
    }

    lines.join("\n")
}
