// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Music identity source: ranked candidates for a raw query.

use crate::subprocess::{resolve_tool, run_with_timeout, SEARCH_TIMEOUT};
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tokio::process::Command;
use tt_core::SourceCandidate;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity tool not found: {0}")]
    ToolNotFound(String),
    #[error("identity search failed: {0}")]
    Search(String),
}

/// Resolves a free-form query into ranked recording candidates.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn search(&self, query: &str, limit: usize)
        -> Result<Vec<SourceCandidate>, IdentityError>;
}

/// yt-dlp `ytsearch` backed provider.
///
/// Flat-playlist search keeps this to one metadata request; entries carry
/// uploader/channel but no structured artist split, so the uploader doubles
/// as the artist.
pub struct YtDlpSearchProvider;

#[derive(Deserialize)]
struct SearchDump {
    #[serde(default)]
    entries: Vec<SearchEntry>,
}

#[derive(Deserialize)]
struct SearchEntry {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    uploader: Option<String>,
    #[serde(default)]
    channel: Option<String>,
}

impl SearchEntry {
    fn into_candidate(self) -> SourceCandidate {
        let uploader = self.uploader.or(self.channel);
        SourceCandidate {
            title: self.title,
            artists: uploader.clone().into_iter().collect(),
            album: None,
            video_id: self.id,
            duration: self.duration.map(|d| d as u64),
            uploader,
        }
    }
}

#[async_trait]
impl IdentityProvider for YtDlpSearchProvider {
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SourceCandidate>, IdentityError> {
        let tool = resolve_tool("yt-dlp")
            .ok_or_else(|| IdentityError::ToolNotFound("yt-dlp".to_string()))?;

        let mut cmd = Command::new(tool);
        cmd.arg("--dump-single-json")
            .arg("--flat-playlist")
            .arg("--no-warnings")
            .arg(format!("ytsearch{limit}:{query}"));

        let output = run_with_timeout(cmd, SEARCH_TIMEOUT, "yt-dlp search")
            .await
            .map_err(|e| IdentityError::Search(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(IdentityError::Search(stderr.trim().to_string()));
        }

        let dump: SearchDump = serde_json::from_slice(&output.stdout)
            .map_err(|e| IdentityError::Search(format!("unparseable search output: {e}")))?;

        Ok(dump.entries.into_iter().map(SearchEntry::into_candidate).collect())
    }
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
