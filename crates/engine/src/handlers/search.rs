// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::StepError;
use crate::pipeline::StateHandler;
use async_trait::async_trait;
use std::sync::Arc;
use tt_core::{Clock, ErrorCode, Job, PipelineError, PipelineState, SelectedSource};

/// Deterministic: derives the download source from the identity hint.
pub struct SearchingHandler {
    clock: Arc<dyn Clock>,
}

impl SearchingHandler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl StateHandler for SearchingHandler {
    async fn handle(&self, job: &mut Job) -> Result<(), StepError> {
        let hint = job.identity_hint.as_ref().ok_or_else(|| {
            PipelineError::content(ErrorCode::NoIdentity, "no identity hint to search from")
        })?;

        let source = SelectedSource {
            url: format!("https://www.youtube.com/watch?v={}", hint.video_id),
            title: hint.title.clone(),
            duration: hint.duration_ms.map(|ms| ms / 1000),
            uploader: hint.uploader.clone(),
        };

        job.emit(format!("selected source {}", source.url));
        job.selected_source = Some(source);
        job.transition_to(PipelineState::Downloading, self.clock.now());
        Ok(())
    }
}
