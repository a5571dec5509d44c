// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Best-effort cover art fetching.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

const ART_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ArtError {
    #[error("art fetch failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("art source unavailable: {0}")]
    Unavailable(String),
}

/// Fetches cover art for a metadata record, when any is referenced.
///
/// All failures are reported as errors; the pipeline swallows them, so no
/// art path may ever fail a job.
#[async_trait]
pub trait CoverArtFetcher: Send + Sync {
    async fn fetch(&self, metadata: &serde_json::Value) -> Result<Option<Vec<u8>>, ArtError>;
}

pub struct ItunesArtFetcher {
    http: reqwest::Client,
}

impl ItunesArtFetcher {
    pub fn new() -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(ART_TIMEOUT).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl CoverArtFetcher for ItunesArtFetcher {
    async fn fetch(
        &self,
        metadata: &serde_json::Value,
    ) -> Result<Option<Vec<u8>>, ArtError> {
        let Some(url) = metadata.get("artworkUrl100").and_then(serde_json::Value::as_str)
        else {
            return Ok(None);
        };

        // iTunes trick: the 100x100 URL serves higher resolutions too.
        let hi_res = url.replace("100x100bb", "600x600bb");

        let bytes = self
            .http
            .get(&hi_res)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(Some(bytes.to_vec()))
    }
}
