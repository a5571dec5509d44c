// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution with timeouts and tool resolution.

use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Ceiling for a full audio download.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(600);
/// Ceiling for a single-file transcode or tag rewrite.
pub const TRANSCODE_TIMEOUT: Duration = Duration::from_secs(300);
/// Ceiling for an identity search.
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum SubprocessError {
    #[error("{label} timed out after {timeout_secs}s")]
    Timeout { label: String, timeout_secs: u64 },
    #[error("{label} failed to start: {source}")]
    Spawn {
        label: String,
        #[source]
        source: std::io::Error,
    },
}

/// Run a command to completion with a hard timeout.
///
/// On timeout the child is killed (kill-on-drop) and an error is returned;
/// callers decide whether a timeout is retryable.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    label: &str,
) -> Result<Output, SubprocessError> {
    cmd.kill_on_drop(true);

    let start = std::time::Instant::now();
    let result = tokio::time::timeout(timeout, cmd.output()).await;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(Ok(output)) => {
            tracing::debug!(label, elapsed_ms, code = output.status.code(), "subprocess finished");
            Ok(output)
        }
        Ok(Err(source)) => Err(SubprocessError::Spawn { label: label.to_string(), source }),
        Err(_) => {
            tracing::warn!(label, elapsed_ms, "subprocess timed out");
            Err(SubprocessError::Timeout {
                label: label.to_string(),
                timeout_secs: timeout.as_secs(),
            })
        }
    }
}

/// Resolve an external tool to an executable path.
///
/// Precedence: a bundled `tools/` directory next to the running executable,
/// then PATH. `None` means the tool is absent entirely.
pub fn resolve_tool(name: &str) -> Option<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let bundled = dir.join("tools").join(name);
            if bundled.is_file() {
                return Some(bundled);
            }
        }
    }

    which::which(name).ok()
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
