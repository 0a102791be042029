//! # Logging Module
//!
//! Configura `tracing` per la console e per i file di log persistenti.
//!
//! ## Responsabilità:
//! - Console su stderr (stdout resta libero per l'output `--json`)
//! - `filecompressor.log`: log completo, unica traccia quando l'app parte senza terminale
//! - `filecompressor_error.log`: solo gli errori
//!
//! ## Livelli:
//! - INFO di default, DEBUG con `--verbose`, `RUST_LOG` ha priorità
//!
//! Se la directory dei log non è scrivibile si continua con la sola console.

use std::path::{Path, PathBuf};
use tracing::{Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const APP_DIR: &str = "file-compressor";
const LOG_PREFIX: &str = "filecompressor";
const ERROR_LOG_PREFIX: &str = "filecompressor_error";

/// Keeps the background log writers alive; dropping it flushes them
pub struct LogGuards {
    _guards: Vec<WorkerGuard>,
}

/// Platform data directory for log files
pub fn default_log_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(APP_DIR).join("logs"))
}

fn log_file(dir: &Path, prefix: &str) -> std::io::Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(dir)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
}

/// Subscriber writing to stderr and, when `log_dir` is usable, to the log files in it
pub fn subscriber(verbose: bool, log_dir: Option<&Path>) -> (impl Subscriber + Send + Sync, LogGuards) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let mut guards = Vec::new();
    let files = log_dir.and_then(|dir| {
        let appenders = std::fs::create_dir_all(dir)
            .and_then(|_| Ok((log_file(dir, LOG_PREFIX)?, log_file(dir, ERROR_LOG_PREFIX)?)));

        match appenders {
            Ok((full, errors)) => {
                let (full, full_guard) = tracing_appender::non_blocking(full);
                let (errors, errors_guard) = tracing_appender::non_blocking(errors);
                guards.push(full_guard);
                guards.push(errors_guard);

                Some(
                    fmt::layer()
                        .with_ansi(false)
                        .with_writer(full)
                        .and_then(fmt::layer().with_ansi(false).with_writer(errors.with_max_level(Level::ERROR))),
                )
            }
            Err(e) => {
                // No subscriber is installed yet
                eprintln!("Warning: could not set up file logging in {}: {}", dir.display(), e);
                None
            }
        }
    });

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(files);

    (subscriber, LogGuards { _guards: guards })
}
