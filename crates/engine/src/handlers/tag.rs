// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::StepError;
use crate::pipeline::StateHandler;
use async_trait::async_trait;
use std::sync::Arc;
use tt_adapters::{CoverArtFetcher, TagError, TagSet, Tagger};
use tt_core::{Clock, ErrorCode, Job, PipelineError, PipelineState};

pub struct TaggingHandler {
    tagger: Arc<dyn Tagger>,
    art: Arc<dyn CoverArtFetcher>,
    clock: Arc<dyn Clock>,
}

impl TaggingHandler {
    pub fn new(
        tagger: Arc<dyn Tagger>,
        art: Arc<dyn CoverArtFetcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { tagger, art, clock }
    }
}

#[async_trait]
impl StateHandler for TaggingHandler {
    async fn handle(&self, job: &mut Job) -> Result<(), StepError> {
        let file = job.extracted_file.clone().ok_or_else(|| {
            PipelineError::content(ErrorCode::NoFile, "no extracted file to tag")
        })?;
        let metadata = job.final_metadata.clone().ok_or_else(|| {
            PipelineError::content(ErrorCode::NoIdentity, "no metadata selected for tagging")
        })?;

        job.emit("writing tags");
        let tags = TagSet::from_metadata(&metadata);
        self.tagger.write_tags(&file, &tags).await.map_err(|e| match e {
            TagError::ToolNotFound(tool) => StepError::Pipeline(
                PipelineError::dependency(
                    ErrorCode::ExternalToolNotFound,
                    format!("{tool} is not installed"),
                )
                .tool(tool),
            ),
            TagError::Failed { status, stderr } => StepError::Pipeline(
                PipelineError::dependency(
                    ErrorCode::ExternalToolError,
                    format!("tag write exited with status {status}: {stderr}"),
                )
                .tool("ffmpeg"),
            ),
            TagError::Subprocess(e) => StepError::Unexpected(e.to_string()),
            TagError::Io(e) => StepError::Unexpected(e.to_string()),
        })?;

        // Cover art is best-effort: fetch and embed failures are swallowed.
        match self.art.fetch(&metadata).await {
            Ok(Some(image)) => {
                if let Err(e) = self.tagger.embed_art(&file, &image).await {
                    tracing::warn!(job_id = %job.job_id, error = %e, "art embed failed, continuing");
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(job_id = %job.job_id, error = %e, "art fetch failed, continuing");
            }
        }

        job.emit("tagging complete");
        job.transition_to(PipelineState::Storing, self.clock.now());
        Ok(())
    }
}

#[cfg(test)]
#[path = "tag_tests.rs"]
mod tests;
