//! Document strategy: DOCX → PDF in a scratch directory, then the PDF strategy.

use super::pdf;
use crate::config::Settings;
use crate::error::CompressError;
use crate::toolbox::Toolbox;
use std::path::Path;
use tracing::debug;

pub async fn compress(input: &Path, settings: &Settings, toolbox: &Toolbox, output: &Path) -> Result<(), CompressError> {
    let work_dir = tempfile::tempdir()?;

    let converted = toolbox
        .converter
        .convert_to_pdf(input, work_dir.path())
        .await
        .map_err(|e| match e {
            missing @ CompressError::ExternalToolMissing { .. } => missing,
            other => CompressError::ConversionStageFailed(other.to_string()),
        })?;
    debug!("Converted {} to {}", input.display(), converted.display());

    pdf::compress(&converted, settings, toolbox, output).await
}
