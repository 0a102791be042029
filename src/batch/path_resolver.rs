//! # Path Resolution Module
//!
//! Centralizza il calcolo del path di output di ogni file.
//!
//! ## Regole:
//! - Directory di output configurata → `<dir>/<stem>_compressed.<ext>`, input mai toccato
//! - `auto_overwrite` e stessa estensione → il file originale viene sostituito
//! - Altrimenti → `<stem>_compressed.<ext>` accanto all'originale
//! - Due file dello stesso batch non condividono mai la destinazione: il secondo
//!   riceve un suffisso numerico (`_compressed_1`)

use crate::classifier::FileKind;
use crate::config::Settings;
use crate::error::CompressError;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Inserted between the file stem and the extension
pub const COMPRESSED_SUFFIX: &str = "_compressed";

pub struct PathResolver;

impl PathResolver {
    /// Final destination of the compressed version of `input`
    pub fn output_path(input: &Path, kind: FileKind, settings: &Settings) -> Result<PathBuf, CompressError> {
        let stem = input
            .file_stem()
            .ok_or_else(|| CompressError::input_unreadable(input, "invalid file name"))?;
        let extension = kind.output_extension(input);

        let mut filename = stem.to_os_string();
        filename.push(COMPRESSED_SUFFIX);
        if !extension.is_empty() {
            filename.push(".");
            filename.push(&extension);
        }

        let resolved = if let Some(ref output_dir) = settings.output_directory {
            output_dir.join(filename)
        } else if settings.auto_overwrite && !kind.changes_format() {
            input.to_path_buf()
        } else {
            input.with_file_name(filename)
        };

        debug!("Resolved output path: {} -> {}", input.display(), resolved.display());
        Ok(resolved)
    }

    /// Keep `candidate` unless another file of the batch already claimed it,
    /// otherwise number it: `report_compressed_1.pdf`, `report_compressed_2.pdf`, ...
    ///
    /// Replacing `input` itself is never a clash.
    pub fn unclaimed(input: &Path, candidate: PathBuf, claimed: &HashSet<PathBuf>) -> PathBuf {
        if candidate == input || !claimed.contains(&candidate) {
            return candidate;
        }

        let mut n = 1;
        loop {
            let numbered = Self::numbered(&candidate, n);
            if !claimed.contains(&numbered) {
                debug!("{} already taken in this batch, using {}", candidate.display(), numbered.display());
                return numbered;
            }
            n += 1;
        }
    }

    fn numbered(path: &Path, n: usize) -> PathBuf {
        let mut filename = path.file_stem().map(OsStr::to_os_string).unwrap_or_default();
        filename.push(format!("_{}", n));
        if let Some(extension) = path.extension() {
            filename.push(".");
            filename.push(extension);
        }
        path.with_file_name(filename)
    }

    /// Create the parent directories of `path`
    pub async fn ensure_parent_dirs(path: &Path) -> Result<(), CompressError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| CompressError::output_write_failed(parent, e))?;
            }
        }
        Ok(())
    }
}
