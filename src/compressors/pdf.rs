//! PDF strategy: delegate to the rasterizer with the configured preset.

use crate::config::Settings;
use crate::error::CompressError;
use crate::toolbox::Toolbox;
use std::path::Path;

pub async fn compress(input: &Path, settings: &Settings, toolbox: &Toolbox, output: &Path) -> Result<(), CompressError> {
    toolbox.pdf.rasterize(input, output, settings.pdf_quality).await
}
