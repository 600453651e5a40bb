//! External tool invocation.
//!
//! The tool's output is always buffered in full before decoding starts.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::decode::Format;
use crate::error::{Error, Result};

/// Run the tool producing `format` and return its stdout.
pub async fn run(format: Format, timeout: Duration) -> Result<Vec<u8>> {
    let (program, args) = format.command();
    run_command(program, args, timeout).await
}

/// Run `program` with `args`, killing it if it has not exited within
/// `timeout`.
///
/// A non-zero exit is tolerated when the program still printed something on
/// stdout, or printed nothing at all: lsof exits with 1 both for partial
/// results and when there is nothing to list.
pub async fn run_command(program: &str, args: &[&str], timeout: Duration) -> Result<Vec<u8>> {
    tracing::debug!(program, ?args, ?timeout, "running tool");

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| Error::tool(program, e.to_string()))?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(output) => output.map_err(|e| Error::tool(program, e.to_string()))?,
        Err(_) => {
            return Err(Error::Timeout {
                tool: program.to_string(),
                timeout,
            });
        }
    };

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if !output.status.success() {
        if !output.stdout.is_empty() || stderr.is_empty() {
            tracing::warn!(program, status = %output.status, stderr, "tool exited unsuccessfully");
        } else {
            return Err(Error::tool(program, format!("{}: {}", output.status, stderr)));
        }
    }

    tracing::debug!(program, bytes = output.stdout.len(), "tool completed");
    Ok(output.stdout)
}
