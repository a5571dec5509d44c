// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::SOURCE_CANDIDATE_LIMIT;
use crate::error::StepError;
use crate::pipeline::StateHandler;
use async_trait::async_trait;
use std::sync::Arc;
use tt_adapters::IdentityProvider;
use tt_core::{Clock, ErrorCode, IdentityHint, Job, PipelineError, PipelineState};

pub struct ResolveIdentityHandler {
    identity: Arc<dyn IdentityProvider>,
    clock: Arc<dyn Clock>,
}

impl ResolveIdentityHandler {
    pub fn new(identity: Arc<dyn IdentityProvider>, clock: Arc<dyn Clock>) -> Self {
        Self { identity, clock }
    }
}

/// A result set is ambiguous when more than one candidate exists and the
/// query names none of the top candidate's artists.
fn is_ambiguous(job: &Job) -> bool {
    if job.source_candidates.len() <= 1 {
        return false;
    }
    let Some(top) = job.source_candidates.first() else {
        return false;
    };
    !top.artists
        .iter()
        .any(|artist| job.normalized_query.contains(&artist.to_lowercase()))
}

#[async_trait]
impl StateHandler for ResolveIdentityHandler {
    async fn handle(&self, job: &mut Job) -> Result<(), StepError> {
        job.emit("resolving identity");

        let candidates = self
            .identity
            .search(&job.raw_query, SOURCE_CANDIDATE_LIMIT)
            .await
            .map_err(|e| {
                PipelineError::transient(ErrorCode::YtmusicError, e.to_string())
            })?;

        if candidates.is_empty() {
            return Err(StepError::Pipeline(PipelineError::content(
                ErrorCode::NoResults,
                format!("no results for query {:?}", job.raw_query),
            )));
        }

        job.source_candidates = candidates.into_iter().take(SOURCE_CANDIDATE_LIMIT).collect();

        if job.options.ask || is_ambiguous(job) {
            tracing::info!(
                job_id = %job.job_id,
                candidates = job.source_candidates.len(),
                "pausing for intent selection"
            );
            job.emit("waiting for intent selection");
            job.transition_to(PipelineState::UserIntentSelection, self.clock.now());
            return Ok(());
        }

        // Candidate 0 is the provider's best guess.
        let hint = IdentityHint::from_candidate(&job.source_candidates[0], 80);
        tracing::info!(job_id = %job.job_id, title = %hint.title, "identity adopted");
        job.emit(format!("identified as {}", hint.title));
        job.identity_hint = Some(hint);
        job.transition_to(PipelineState::Searching, self.clock.now());
        Ok(())
    }
}

#[cfg(test)]
#[path = "resolve_identity_tests.rs"]
mod tests;
