//! # File Management Module
//!
//! Questo modulo gestisce tutte le operazioni sui file del batch.
//!
//! ## Responsabilità:
//! - Espansione delle cartelle trascinate nei file supportati che contengono
//! - Validazione dell'input (esiste, è un file regolare, è leggibile)
//! - Lettura/scrittura con errori tipizzati (`InputUnreadable`, `OutputWriteFailed`)
//! - Commit atomico dell'output: staging → verifica → rename sulla destinazione
//! - Formattazione human-readable delle dimensioni e calcolo riduzione
//!
//! ## Sicurezza operazioni:
//! - L'input non viene mai modificato finché l'output non è stato verificato
//! - Un file di staging non committato viene rimosso automaticamente (`TempPath`)
//! - L'output committato eredita i permessi del file che sostituisce (o dell'input)
//!
//! ## Esempio:
//! ```rust,ignore
//! let files = FileManager::expand_inputs(&dropped_paths);
//! let size = FileManager::validate_input(&files[0]).await?;
//! ```

use crate::classifier;
use crate::error::CompressError;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tokio::fs;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Manages file operations for a batch
pub struct FileManager;

impl FileManager {
    /// Expand dropped paths: folders become the supported files they contain
    /// (recursively, sorted); everything else is kept as given.
    pub fn expand_inputs(paths: &[PathBuf]) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for path in paths {
            if path.is_dir() {
                let mut found: Vec<PathBuf> = WalkDir::new(path)
                    .into_iter()
                    .filter_map(|e| match e {
                        Ok(entry) => Some(entry),
                        Err(err) => {
                            warn!("Skipping unreadable entry under {}: {}", path.display(), err);
                            None
                        }
                    })
                    .filter(|e| e.file_type().is_file())
                    .map(|e| e.into_path())
                    .filter(|p| classifier::is_supported(p))
                    .collect();
                found.sort();
                debug!("Expanded {} into {} supported files", path.display(), found.len());
                files.extend(found);
            } else {
                files.push(path.clone());
            }
        }

        files
    }

    /// Check that `path` is a readable regular file and return its size
    pub async fn validate_input(path: &Path) -> Result<u64, CompressError> {
        let metadata = fs::metadata(path)
            .await
            .map_err(|e| CompressError::input_unreadable(path, e))?;

        if !metadata.is_file() {
            return Err(CompressError::input_unreadable(path, "not a regular file"));
        }

        fs::File::open(path)
            .await
            .map_err(|e| CompressError::input_unreadable(path, e))?;

        Ok(metadata.len())
    }

    /// Read a whole input file
    pub async fn read_input(path: &Path) -> Result<Vec<u8>, CompressError> {
        fs::read(path)
            .await
            .map_err(|e| CompressError::input_unreadable(path, e))
    }

    /// Write bytes to an output path
    pub async fn write_output(path: &Path, data: &[u8]) -> Result<(), CompressError> {
        fs::write(path, data)
            .await
            .map_err(|e| CompressError::output_write_failed(path, e))
    }

    /// Size of a produced file; missing or empty output is an error
    pub async fn verify_output(path: &Path) -> Result<u64, CompressError> {
        let metadata = fs::metadata(path)
            .await
            .map_err(|e| CompressError::output_write_failed(path, format!("output missing ({})", e)))?;

        if metadata.len() == 0 {
            return Err(CompressError::output_write_failed(path, "output is empty"));
        }

        Ok(metadata.len())
    }

    /// Create a staging file next to `destination`, removed on drop unless committed
    pub fn staging_path(destination: &Path) -> Result<TempPath, CompressError> {
        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let suffix = destination
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        tempfile::Builder::new()
            .prefix(".compressing-")
            .suffix(&suffix)
            .tempfile_in(dir)
            .map(|file| file.into_temp_path())
            .map_err(|e| CompressError::output_write_failed(destination, e))
    }

    /// Give `staging` the permissions of `reference`; staging files start out owner-only
    pub async fn copy_permissions(reference: &Path, staging: &Path) -> Result<(), CompressError> {
        let permissions = fs::metadata(reference)
            .await
            .map_err(|e| CompressError::output_write_failed(staging, e))?
            .permissions();

        fs::set_permissions(staging, permissions)
            .await
            .map_err(|e| CompressError::output_write_failed(staging, e))
    }

    /// Atomically move a verified staging file onto its destination
    pub fn commit(staging: TempPath, destination: &Path) -> Result<(), CompressError> {
        staging
            .persist(destination)
            .map_err(|e| CompressError::output_write_failed(destination, e.error))
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Calculate percentage reduction (negative when the file grew)
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            ((original_size as f64 - new_size as f64) / original_size as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_expand_inputs_walks_folders() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("sub");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(temp_dir.path().join("b.pdf"), b"x").unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::write(nested.join("a.JPG"), b"x").unwrap();

        let loose = PathBuf::from("/elsewhere/readme.md");
        let files = FileManager::expand_inputs(&[temp_dir.path().to_path_buf(), loose.clone()]);

        assert_eq!(
            files,
            vec![temp_dir.path().join("b.pdf"), nested.join("a.JPG"), loose]
        );
    }

    #[tokio::test]
    async fn test_validate_input() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.pdf");
        std::fs::write(&file, b"12345").unwrap();

        assert_eq!(FileManager::validate_input(&file).await.unwrap(), 5);

        let err = FileManager::validate_input(&temp_dir.path().join("missing.pdf")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputUnreadable);

        let err = FileManager::validate_input(temp_dir.path()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputUnreadable);
    }

    #[tokio::test]
    async fn test_staging_commit_replaces_destination() {
        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("a_compressed.pdf");
        std::fs::write(&destination, b"old").unwrap();

        let staging = FileManager::staging_path(&destination).unwrap();
        FileManager::write_output(&staging, b"new content").await.unwrap();
        assert_eq!(FileManager::verify_output(&staging).await.unwrap(), 11);

        FileManager::commit(staging, &destination).unwrap();
        assert_eq!(std::fs::read(&destination).unwrap(), b"new content");

        let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[tokio::test]
    async fn test_dropped_staging_leaves_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("a_compressed.png");
        {
            let staging = FileManager::staging_path(&destination).unwrap();
            let err = FileManager::verify_output(&staging).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::OutputWriteFailed);
        }
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_copy_permissions_onto_staging() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let original = temp_dir.path().join("a.pdf");
        std::fs::write(&original, b"%PDF").unwrap();
        std::fs::set_permissions(&original, std::fs::Permissions::from_mode(0o644)).unwrap();

        let staging = FileManager::staging_path(&original).unwrap();
        FileManager::write_output(&staging, b"%PDF small").await.unwrap();
        assert_eq!(std::fs::metadata(&staging).unwrap().permissions().mode() & 0o777, 0o600);

        FileManager::copy_permissions(&original, &staging).await.unwrap();
        FileManager::commit(staging, &original).unwrap();
        assert_eq!(std::fs::metadata(&original).unwrap().permissions().mode() & 0o777, 0o644);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(FileManager::format_size(512), "512 B");
        assert_eq!(FileManager::format_size(1536), "1.50 KB");
        assert_eq!(FileManager::format_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_calculate_reduction() {
        assert_eq!(FileManager::calculate_reduction(200, 50), 75.0);
        assert_eq!(FileManager::calculate_reduction(0, 50), 0.0);
        assert!(FileManager::calculate_reduction(100, 110) < 0.0);
    }
}
