//! Office container strategy (XLSX/PPTX and friends).
//!
//! The file is treated as a ZIP container: every entry is copied into a new
//! archive at deflate level 9, and JPEG/PNG media under the family's media
//! folder are re-encoded first. Document structure is never touched.

use crate::classifier::OfficeFamily;
use crate::config::Settings;
use crate::error::CompressError;
use crate::file_manager::FileManager;
use crate::toolbox::{EncodeTarget, Toolbox};
use std::io::{Cursor, Read, Write};
use std::path::Path;
use tokio::task;
use tracing::{debug, warn};
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

const DEFLATE_LEVEL: i32 = 9;

struct ContainerEntry {
    name: String,
    is_dir: bool,
    modified: DateTime,
    data: Vec<u8>,
}

pub async fn compress(
    input: &Path,
    family: OfficeFamily,
    settings: &Settings,
    toolbox: &Toolbox,
    output: &Path,
) -> Result<(), CompressError> {
    let data = FileManager::read_input(input).await?;
    let mut entries = task::spawn_blocking(move || read_entries(&data))
        .await
        .map_err(|e| CompressError::InvalidContent(format!("container reader task failed: {}", e)))??;

    let prefix = family.media_prefix();
    for entry in entries.iter_mut() {
        let Some(target) = media_target(&entry.name, prefix) else {
            continue;
        };

        match toolbox.image.encode(entry.data.clone(), target, settings.jpeg_quality).await {
            Ok(encoded) if encoded.len() < entry.data.len() => {
                debug!("{}: {} -> {} bytes", entry.name, entry.data.len(), encoded.len());
                entry.data = encoded;
            }
            Ok(_) => debug!("{}: re-encoding did not help, keeping original", entry.name),
            Err(e) => warn!("Failed to compress image in {}: {} -> {}", input.display(), entry.name, e),
        }
    }

    let repacked = task::spawn_blocking(move || write_entries(&entries))
        .await
        .map_err(|e| CompressError::InvalidContent(format!("container writer task failed: {}", e)))??;

    FileManager::write_output(output, &repacked).await
}

/// Encoding for a media entry, `None` for everything that is copied verbatim
fn media_target(name: &str, prefix: &str) -> Option<EncodeTarget> {
    let lower = name.to_ascii_lowercase();
    if !lower.starts_with(prefix) {
        return None;
    }
    if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        Some(EncodeTarget::Jpeg)
    } else if lower.ends_with(".png") {
        Some(EncodeTarget::Png)
    } else {
        None
    }
}

fn read_entries(data: &[u8]) -> Result<Vec<ContainerEntry>, CompressError> {
    let mut archive = ZipArchive::new(Cursor::new(data)).map_err(|e| {
        CompressError::InvalidContent(format!(
            "not an Office Open XML container, legacy binary files are not supported ({})",
            e
        ))
    })?;

    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| CompressError::InvalidContent(format!("unreadable container entry: {}", e)))?;

        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)
            .map_err(|e| CompressError::InvalidContent(format!("corrupt entry {}: {}", file.name(), e)))?;

        entries.push(ContainerEntry {
            name: file.name().to_string(),
            is_dir: file.is_dir(),
            modified: file.last_modified(),
            data,
        });
    }

    Ok(entries)
}

fn write_entries(entries: &[ContainerEntry]) -> Result<Vec<u8>, CompressError> {
    let repack_error = |e: &dyn std::fmt::Display| CompressError::InvalidContent(format!("failed to repack container: {}", e));

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for entry in entries {
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(DEFLATE_LEVEL))
            .last_modified_time(entry.modified);

        if entry.is_dir {
            writer.add_directory(entry.name.as_str(), options).map_err(|e| repack_error(&e))?;
        } else {
            writer.start_file(entry.name.as_str(), options).map_err(|e| repack_error(&e))?;
            writer.write_all(&entry.data).map_err(|e| repack_error(&e))?;
        }
    }

    let cursor = writer.finish().map_err(|e| repack_error(&e))?;
    Ok(cursor.into_inner())
}
