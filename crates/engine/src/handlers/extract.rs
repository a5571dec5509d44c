// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::StepError;
use crate::pipeline::StateHandler;
use crate::workspace;
use async_trait::async_trait;
use std::sync::Arc;
use tt_adapters::{TranscodeError, Transcoder};
use tt_core::{Clock, ErrorCode, Job, PipelineError, PipelineState};

pub struct ExtractingHandler {
    transcoder: Arc<dyn Transcoder>,
    clock: Arc<dyn Clock>,
}

impl ExtractingHandler {
    pub fn new(transcoder: Arc<dyn Transcoder>, clock: Arc<dyn Clock>) -> Self {
        Self { transcoder, clock }
    }
}

#[async_trait]
impl StateHandler for ExtractingHandler {
    async fn handle(&self, job: &mut Job) -> Result<(), StepError> {
        let input = job.downloaded_file.clone().ok_or_else(|| {
            PipelineError::content(ErrorCode::NoFile, "no downloaded file to extract")
        })?;

        // Fresh workspace for this step without losing its input.
        workspace::stash_and_reset(&job.job_id, &input)?;
        job.emit("extracting audio");

        let extracted = self.transcoder.to_mp3_320(&input).await.map_err(|e| match e {
            TranscodeError::ToolNotFound(tool) => StepError::Pipeline(
                PipelineError::dependency(
                    ErrorCode::ExternalToolNotFound,
                    format!("{tool} is not installed"),
                )
                .tool(tool),
            ),
            TranscodeError::Failed { status, stderr } => StepError::Pipeline(
                PipelineError::dependency(
                    ErrorCode::ExternalToolError,
                    format!("transcode exited with status {status}: {stderr}"),
                )
                .tool("ffmpeg"),
            ),
            TranscodeError::Subprocess(e) => StepError::Unexpected(e.to_string()),
        })?;

        job.extracted_file = Some(extracted);
        job.emit("extraction complete");
        job.transition_to(PipelineState::MatchingMetadata, self.clock.now());
        Ok(())
    }
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
