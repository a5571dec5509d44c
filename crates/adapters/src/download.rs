// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Best-audio download into a caller-owned directory.

use crate::subprocess::{resolve_tool, run_with_timeout, SubprocessError, DOWNLOAD_TIMEOUT};
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("download tool not found: {0}")]
    ToolNotFound(String),
    #[error("download failed with status {status}: {stderr}")]
    Failed { status: i32, stderr: String },
    #[error(transparent)]
    Subprocess(#[from] SubprocessError),
}

/// Downloads the best audio stream for a source URL.
#[async_trait]
pub trait AudioDownloader: Send + Sync {
    async fn download(&self, url: &str, dest_dir: &Path, verbose: bool)
        -> Result<(), DownloadError>;
}

/// yt-dlp invoked as a black-box subprocess.
pub struct YtDlpDownloader;

#[async_trait]
impl AudioDownloader for YtDlpDownloader {
    async fn download(
        &self,
        url: &str,
        dest_dir: &Path,
        verbose: bool,
    ) -> Result<(), DownloadError> {
        let tool = resolve_tool("yt-dlp")
            .ok_or_else(|| DownloadError::ToolNotFound("yt-dlp".to_string()))?;

        let mut cmd = Command::new(tool);
        cmd.arg("-f")
            .arg("bestaudio")
            .arg("--no-playlist")
            .arg("--no-warnings")
            .arg("-o")
            .arg(dest_dir.join("%(title)s.%(ext)s"))
            .arg(url);
        if !verbose {
            cmd.arg("-q");
        }

        tracing::info!(url, dest = %dest_dir.display(), "downloading audio");
        let output = run_with_timeout(cmd, DOWNLOAD_TIMEOUT, "yt-dlp download").await?;

        if !output.status.success() {
            return Err(DownloadError::Failed {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}
