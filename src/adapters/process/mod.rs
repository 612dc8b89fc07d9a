//! Shared subprocess execution for the external media tools

use std::io;
use std::path::PathBuf;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::ToolMissing;

/// Why a tool invocation produced no output
#[derive(Debug)]
pub enum ToolRunError {
    /// The executable could not be started
    Missing(ToolMissing),
    TimedOut(Duration),
    Io(io::Error),
}

/// Resolve a tool name or path on `PATH`
pub fn locate_tool(binary: &str) -> Result<PathBuf, ToolMissing> {
    which::which(binary).map_err(|e| ToolMissing::new(binary, e.to_string()))
}

/// Run `command` to completion, capturing stdout and stderr.
///
/// Both pipes are drained concurrently. On timeout the child is killed.
pub async fn run_tool(
    binary: &str,
    mut command: Command,
    timeout: Option<Duration>,
) -> Result<Output, ToolRunError> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(command = ?command.as_std(), "Running external tool");

    let child = command.spawn().map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ToolRunError::Missing(ToolMissing::new(binary, e.to_string())),
        _ => ToolRunError::Io(e),
    })?;

    let output = match timeout {
        Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| ToolRunError::TimedOut(limit))?,
        None => child.wait_with_output().await,
    }
    .map_err(ToolRunError::Io)?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        debug!(tool = binary, stderr = %stderr.trim(), "Tool stderr");
    }

    Ok(output)
}
