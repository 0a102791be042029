//! HEIC decoding through whichever external decoder is installed.

use super::{run_tool, HeicDecoder};
use crate::args;
use crate::error::CompressError;
use crate::platform::Tool;
use crate::tool_resolver::ToolPathResolver;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Decoders in order of preference
const DECODERS: [Tool; 3] = [Tool::HeifConvert, Tool::ImageMagick, Tool::Sips];

pub struct HeifTools {
    resolver: Arc<ToolPathResolver>,
}

impl HeifTools {
    pub fn new(resolver: Arc<ToolPathResolver>) -> Self {
        Self { resolver }
    }

    fn build_args(tool: Tool, input: &Path, output: &Path) -> Vec<OsString> {
        match tool {
            Tool::Sips => args!["-s", "format", "png", input, "--out", output],
            _ => args![input, output],
        }
    }
}

#[async_trait]
impl HeicDecoder for HeifTools {
    async fn decode(&self, input: &Path) -> Result<Vec<u8>, CompressError> {
        let work_dir = tempfile::tempdir()?;
        let decoded = work_dir.path().join("decoded.png");
        let mut last_error = None;

        for tool in DECODERS {
            let Some(program) = self.resolver.resolve(tool) else {
                continue;
            };

            match run_tool(tool, &program, &Self::build_args(tool, input, &decoded)).await {
                Ok(_) => match tokio::fs::read(&decoded).await {
                    Ok(bytes) if !bytes.is_empty() => {
                        debug!("Decoded {} with {}", input.display(), tool);
                        return Ok(bytes);
                    }
                    _ => {
                        warn!("{} produced no image for {}", tool, input.display());
                        last_error = Some(CompressError::tool_failed(tool, "produced no decoded image"));
                    }
                },
                Err(e) => {
                    warn!("{} could not decode {}: {}", tool, input.display(), e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CompressError::tool_missing(Tool::HeifConvert)))
    }
}
