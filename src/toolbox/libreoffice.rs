//! DOCX → PDF conversion with a headless LibreOffice.

use super::{run_tool, DocumentConverter};
use crate::args;
use crate::error::CompressError;
use crate::platform::Tool;
use crate::tool_resolver::ToolPathResolver;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct LibreOffice {
    resolver: Arc<ToolPathResolver>,
}

impl LibreOffice {
    pub fn new(resolver: Arc<ToolPathResolver>) -> Self {
        Self { resolver }
    }

    pub fn build_args(input: &Path, out_dir: &Path) -> Vec<OsString> {
        args!["--headless", "--norestore", "--convert-to", "pdf", "--outdir", out_dir, input]
    }

    /// Where soffice writes the PDF for `input`
    pub fn expected_output(input: &Path, out_dir: &Path) -> PathBuf {
        let mut name = input.file_stem().unwrap_or(input.as_os_str()).to_os_string();
        name.push(".pdf");
        out_dir.join(name)
    }
}

#[async_trait]
impl DocumentConverter for LibreOffice {
    async fn convert_to_pdf(&self, input: &Path, out_dir: &Path) -> Result<PathBuf, CompressError> {
        let soffice = self.resolver.require(Tool::LibreOffice)?;
        run_tool(Tool::LibreOffice, &soffice, &Self::build_args(input, out_dir)).await?;

        // soffice reports some conversion errors on stdout and still exits 0
        let produced = Self::expected_output(input, out_dir);
        if !produced.is_file() {
            return Err(CompressError::tool_failed(
                Tool::LibreOffice,
                format!("no PDF was produced for {}", input.display()),
            ));
        }
        Ok(produced)
    }
}
