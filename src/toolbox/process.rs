//! External process execution shared by the tool wrappers.

use crate::error::CompressError;
use crate::platform::Tool;
use crate::utils::tail_of_output;
use std::ffi::OsString;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

const STDERR_TAIL_CHARS: usize = 500;

/// Run `program` to completion, turning spawn errors and non-zero exits into
/// [`CompressError`]s. The child is killed if the returned future is dropped.
pub async fn run_tool(tool: Tool, program: &Path, args: &[OsString]) -> Result<Output, CompressError> {
    debug!("Running {}: {} {:?}", tool, program.display(), args);
    let start = Instant::now();

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CompressError::tool_missing(tool)
            } else {
                CompressError::tool_failed(tool, format!("could not start {}: {}", program.display(), e))
            }
        })?;

    debug!("{} finished in {:.1}s with {}", tool, start.elapsed().as_secs_f64(), output.status);

    if !output.status.success() {
        let stderr = tail_of_output(&output.stderr, STDERR_TAIL_CHARS);
        let detail = if stderr.is_empty() {
            format!("exited with {}", output.status)
        } else {
            format!("exited with {}: {}", output.status, stderr)
        };
        return Err(CompressError::tool_failed(tool, detail));
    }

    Ok(output)
}
