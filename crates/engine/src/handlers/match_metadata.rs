// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{METADATA_CANDIDATE_LIMIT, METADATA_CONFIDENCE_FLOOR};
use crate::error::StepError;
use crate::pipeline::StateHandler;
use async_trait::async_trait;
use std::sync::Arc;
use tt_adapters::MetadataSearcher;
use tt_core::{scoring, Clock, ErrorCode, Job, PipelineError, PipelineState};

pub struct MatchingMetadataHandler {
    metadata: Arc<dyn MetadataSearcher>,
    clock: Arc<dyn Clock>,
}

impl MatchingMetadataHandler {
    pub fn new(metadata: Arc<dyn MetadataSearcher>, clock: Arc<dyn Clock>) -> Self {
        Self { metadata, clock }
    }
}

#[async_trait]
impl StateHandler for MatchingMetadataHandler {
    async fn handle(&self, job: &mut Job) -> Result<(), StepError> {
        if job.options.force_archive {
            job.emit("archival forced, skipping metadata match");
            job.transition_to(PipelineState::Archiving, self.clock.now());
            return Ok(());
        }

        let hint = job.identity_hint.clone().ok_or_else(|| {
            PipelineError::content(ErrorCode::NoIdentity, "no identity hint to match against")
        })?;

        job.emit("matching official metadata");
        let results = match self
            .metadata
            .search_song(&hint.title, &hint.artists.join(" "), METADATA_CANDIDATE_LIMIT)
            .await
        {
            Ok(results) => results,
            Err(e) => {
                // Network failure is recovered locally: archive instead.
                tracing::warn!(job_id = %job.job_id, error = %e, "metadata search failed, archiving");
                job.emit("metadata service unreachable, archiving");
                job.transition_to(PipelineState::Archiving, self.clock.now());
                return Ok(());
            }
        };

        if results.is_empty() {
            job.emit("no metadata matches, archiving");
            job.transition_to(PipelineState::Archiving, self.clock.now());
            return Ok(());
        }

        let expected_duration = hint.duration_ms.map(|ms| ms / 1000);
        let mut ranked: Vec<(i64, serde_json::Value)> = results
            .into_iter()
            .map(|mut candidate| {
                let (score, reasons) = scoring::score_metadata(
                    &candidate,
                    &hint.title,
                    hint.primary_artist(),
                    expected_duration,
                );
                tracing::debug!(
                    job_id = %job.job_id,
                    score,
                    reasons = ?reasons,
                    track = candidate.get("trackName").and_then(serde_json::Value::as_str),
                    "scored metadata candidate"
                );
                if let Some(obj) = candidate.as_object_mut() {
                    obj.insert("_score".to_string(), serde_json::json!(score));
                }
                (i64::from(score), candidate)
            })
            .collect();
        ranked.sort_by_key(|(score, _)| std::cmp::Reverse(*score));

        let (top_score, top) = ranked[0].clone();
        job.metadata_candidates = ranked.into_iter().map(|(_, c)| c).collect();
        job.final_metadata = Some(top);
        job.metadata_confidence = Some(top_score);

        if top_score < METADATA_CONFIDENCE_FLOOR {
            tracing::info!(job_id = %job.job_id, top_score, "low confidence, pausing for selection");
            job.emit("waiting for metadata selection");
            job.transition_to(PipelineState::UserMetadataSelection, self.clock.now());
        } else {
            job.emit(format!("metadata matched (confidence {top_score})"));
            job.transition_to(PipelineState::Tagging, self.clock.now());
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "match_metadata_tests.rs"]
mod tests;
