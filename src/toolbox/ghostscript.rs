//! PDF recompression through Ghostscript's `pdfwrite` device.

use super::{run_tool, PdfRasterizer};
use crate::args;
use crate::config::PdfPreset;
use crate::error::CompressError;
use crate::platform::Tool;
use crate::tool_resolver::ToolPathResolver;
use crate::utils::prefixed_arg;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub struct Ghostscript {
    resolver: Arc<ToolPathResolver>,
}

impl Ghostscript {
    pub fn new(resolver: Arc<ToolPathResolver>) -> Self {
        Self { resolver }
    }

    /// Command line for recompressing `input` into `output`
    pub fn build_args(input: &Path, output: &Path, preset: PdfPreset) -> Vec<OsString> {
        args![
            "-sDEVICE=pdfwrite",
            "-dCompatibilityLevel=1.4",
            format!("-dPDFSETTINGS={}", preset.as_str()),
            "-dNOPAUSE",
            "-dQUIET",
            "-dBATCH",
            prefixed_arg("-sOutputFile=", output),
            input,
        ]
    }
}

#[async_trait]
impl PdfRasterizer for Ghostscript {
    async fn rasterize(&self, input: &Path, output: &Path, preset: PdfPreset) -> Result<(), CompressError> {
        let gs = self.resolver.require(Tool::Ghostscript)?;
        run_tool(Tool::Ghostscript, &gs, &Self::build_args(input, output, preset)).await?;

        // gs can exit 0 without writing anything for some malformed inputs
        let written = tokio::fs::metadata(output).await.map(|m| m.len()).unwrap_or(0);
        if written == 0 {
            return Err(CompressError::tool_failed(Tool::Ghostscript, "finished without producing an output file"));
        }

        debug!("Ghostscript wrote {} bytes to {}", written, output.display());
        Ok(())
    }
}
