// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ID3 tag writing via ffmpeg stream-copy rewrites.
//!
//! ffmpeg is already the pipeline's transcoder and writes ID3v2 natively,
//! so tagging stays on the same tool instead of pulling in a tag library.

use crate::subprocess::{resolve_tool, run_with_timeout, SubprocessError, TRANSCODE_TIMEOUT};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum TagError {
    #[error("tag tool not found: {0}")]
    ToolNotFound(String),
    #[error("tag write failed with status {status}: {stderr}")]
    Failed { status: i32, stderr: String },
    #[error(transparent)]
    Subprocess(#[from] SubprocessError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The text frames written into the library MP3.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub track: Option<u32>,
    pub year: Option<String>,
}

impl TagSet {
    /// Extract tag frames from a canonical metadata record.
    ///
    /// Year is the first four characters of `releaseDate` when present.
    pub fn from_metadata(metadata: &serde_json::Value) -> Self {
        let text = |key: &str| {
            metadata.get(key).and_then(serde_json::Value::as_str).map(str::to_string)
        };
        Self {
            title: text("trackName"),
            artist: text("artistName"),
            album: text("collectionName"),
            track: metadata
                .get("trackNumber")
                .and_then(serde_json::Value::as_u64)
                .map(|n| n as u32),
            year: text("releaseDate").map(|d| d.chars().take(4).collect()),
        }
    }
}

/// Writes tags and embeds cover art into an audio file.
#[async_trait]
pub trait Tagger: Send + Sync {
    /// Write text frames. Failures here fail the tagging step.
    async fn write_tags(&self, file: &Path, tags: &TagSet) -> Result<(), TagError>;

    /// Embed cover art. Callers treat failures as best-effort.
    async fn embed_art(&self, file: &Path, image: &[u8]) -> Result<(), TagError>;
}

pub struct FfmpegTagger;

impl FfmpegTagger {
    fn tool() -> Result<PathBuf, TagError> {
        resolve_tool("ffmpeg").ok_or_else(|| TagError::ToolNotFound("ffmpeg".to_string()))
    }

    async fn rewrite(
        file: &Path,
        staged: PathBuf,
        cmd: Command,
        label: &str,
    ) -> Result<(), TagError> {
        let output = run_with_timeout(cmd, TRANSCODE_TIMEOUT, label).await?;
        if !output.status.success() {
            let _ = tokio::fs::remove_file(&staged).await;
            return Err(TagError::Failed {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        tokio::fs::rename(&staged, file).await?;
        Ok(())
    }
}

#[async_trait]
impl Tagger for FfmpegTagger {
    async fn write_tags(&self, file: &Path, tags: &TagSet) -> Result<(), TagError> {
        let tool = Self::tool()?;
        let staged = file.with_extension("tagged.mp3");

        let mut cmd = Command::new(tool);
        cmd.arg("-y")
            .arg("-hide_banner")
            .arg("-loglevel")
            .arg("error")
            .arg("-i")
            .arg(file)
            .arg("-map")
            .arg("0:a")
            .arg("-c")
            .arg("copy")
            .arg("-id3v2_version")
            .arg("3");

        let mut frame = |key: &str, value: &str| {
            cmd.arg("-metadata").arg(format!("{key}={value}"));
        };
        if let Some(title) = &tags.title {
            frame("title", title);
        }
        if let Some(artist) = &tags.artist {
            frame("artist", artist);
        }
        if let Some(album) = &tags.album {
            frame("album", album);
        }
        if let Some(track) = tags.track {
            frame("track", &track.to_string());
        }
        if let Some(year) = &tags.year {
            frame("date", year);
        }
        cmd.arg(&staged);

        tracing::info!(file = %file.display(), "writing tags");
        Self::rewrite(file, staged, cmd, "ffmpeg tag write").await
    }

    async fn embed_art(&self, file: &Path, image: &[u8]) -> Result<(), TagError> {
        let tool = Self::tool()?;
        let cover = file.with_extension("cover.jpg");
        let staged = file.with_extension("art.mp3");
        tokio::fs::write(&cover, image).await?;

        let mut cmd = Command::new(tool);
        cmd.arg("-y")
            .arg("-hide_banner")
            .arg("-loglevel")
            .arg("error")
            .arg("-i")
            .arg(file)
            .arg("-i")
            .arg(&cover)
            .arg("-map")
            .arg("0:a")
            .arg("-map")
            .arg("1:0")
            .arg("-c")
            .arg("copy")
            .arg("-id3v2_version")
            .arg("3")
            .arg("-metadata:s:v")
            .arg("title=Album cover")
            .arg("-metadata:s:v")
            .arg("comment=Cover (front)")
            .arg(&staged);

        let result = Self::rewrite(file, staged, cmd, "ffmpeg art embed").await;
        let _ = tokio::fs::remove_file(&cover).await;
        result
    }
}

#[cfg(test)]
#[path = "tag_tests.rs"]
mod tests;
