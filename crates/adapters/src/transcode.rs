// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Audio transcoding to the library's MP3 format.

use crate::subprocess::{resolve_tool, run_with_timeout, SubprocessError, TRANSCODE_TIMEOUT};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("transcode tool not found: {0}")]
    ToolNotFound(String),
    #[error("transcode failed with status {status}: {stderr}")]
    Failed { status: i32, stderr: String },
    #[error(transparent)]
    Subprocess(#[from] SubprocessError),
}

/// Produces a 320 kbps MP3 next to the input file.
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn to_mp3_320(&self, input: &Path) -> Result<PathBuf, TranscodeError>;
}

/// ffmpeg invoked as a black-box subprocess.
pub struct FfmpegTranscoder;

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn to_mp3_320(&self, input: &Path) -> Result<PathBuf, TranscodeError> {
        let tool = resolve_tool("ffmpeg")
            .ok_or_else(|| TranscodeError::ToolNotFound("ffmpeg".to_string()))?;

        let output_path = output_path_for(input);

        let mut cmd = Command::new(tool);
        cmd.arg("-y")
            .arg("-hide_banner")
            .arg("-loglevel")
            .arg("error")
            .arg("-i")
            .arg(input)
            .arg("-vn")
            .arg("-codec:a")
            .arg("libmp3lame")
            .arg("-b:a")
            .arg("320k")
            .arg(&output_path);

        tracing::info!(input = %input.display(), output = %output_path.display(), "transcoding to mp3");
        let output = run_with_timeout(cmd, TRANSCODE_TIMEOUT, "ffmpeg transcode").await?;

        if !output.status.success() {
            return Err(TranscodeError::Failed {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output_path)
    }
}

/// MP3 output path next to the input.
///
/// A source that is already `.mp3` cannot be rewritten in place.
fn output_path_for(input: &Path) -> PathBuf {
    let output = input.with_extension("mp3");
    if output == input {
        input.with_extension("transcoded.mp3")
    } else {
        output
    }
}

#[cfg(test)]
#[path = "transcode_tests.rs"]
mod tests;
