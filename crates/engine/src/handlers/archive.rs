// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::store::{library_filename, place_file};
use crate::error::StepError;
use crate::pipeline::StateHandler;
use async_trait::async_trait;
use std::sync::Arc;
use tt_core::{Clock, ErrorCode, Job, PipelineError, PipelineState};
use tt_storage::{resolve_library_root, JobStore};

/// Subdirectory for tracks stored without verified metadata.
pub const UNIDENTIFIED_DIR: &str = "_Unidentified";

pub struct ArchivingHandler {
    store: Arc<dyn JobStore>,
    clock: Arc<dyn Clock>,
}

impl ArchivingHandler {
    pub fn new(store: Arc<dyn JobStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

#[async_trait]
impl StateHandler for ArchivingHandler {
    async fn handle(&self, job: &mut Job) -> Result<(), StepError> {
        let file = job.extracted_file.clone().ok_or_else(|| {
            PipelineError::content(ErrorCode::NoFile, "no extracted file to archive")
        })?;

        let (title, artist) = match &job.identity_hint {
            Some(hint) => (hint.title.clone(), hint.primary_artist().to_string()),
            None => (job.raw_query.clone(), "Unknown".to_string()),
        };

        let (root, _) = resolve_library_root(self.store.as_ref())
            .map_err(|e| StepError::Unexpected(e.to_string()))?;
        let archive_dir = root.join(UNIDENTIFIED_DIR);

        let filename = library_filename(&title, &artist);
        let (target, existed) = place_file(&file, &archive_dir, &filename)?;
        if existed {
            tracing::info!(job_id = %job.job_id, path = %target.display(), "archive target already present");
        }

        job.result.success = true;
        job.result.archived = true;
        job.result.title = Some(title);
        job.result.artist = Some(artist);
        job.result.album = job.identity_hint.as_ref().and_then(|h| h.album.clone());
        job.result.reason = Some("Unverified metadata".to_string());
        job.result.path = Some(target.to_string_lossy().into_owned());

        job.emit("archived without verified metadata");
        job.transition_to(PipelineState::Finalized, self.clock.now());
        Ok(())
    }
}
