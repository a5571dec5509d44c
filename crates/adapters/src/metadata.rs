// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical metadata search (iTunes Search API).

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const ITUNES_SEARCH_URL: &str = "https://itunes.apple.com/search";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("metadata search failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("metadata service unavailable: {0}")]
    Unavailable(String),
}

/// Searches the canonical metadata service for song records.
///
/// Results are returned as raw JSON documents; the pipeline scores them by
/// field lookup and passes the winner through to tagging untouched.
#[async_trait]
pub trait MetadataSearcher: Send + Sync {
    async fn search_song(
        &self,
        term: &str,
        artist: &str,
        limit: usize,
    ) -> Result<Vec<serde_json::Value>, MetadataError>;
}

pub struct ItunesClient {
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct SearchPayload {
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

impl ItunesClient {
    pub fn new() -> Result<Self, MetadataError> {
        let http = reqwest::Client::builder().timeout(SEARCH_TIMEOUT).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl MetadataSearcher for ItunesClient {
    async fn search_song(
        &self,
        term: &str,
        artist: &str,
        limit: usize,
    ) -> Result<Vec<serde_json::Value>, MetadataError> {
        let response = self
            .http
            .get(ITUNES_SEARCH_URL)
            .query(&[
                ("term", format!("{term} {artist}")),
                ("entity", "song".to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let payload: SearchPayload = response.json().await?;
        Ok(payload.results)
    }
}
