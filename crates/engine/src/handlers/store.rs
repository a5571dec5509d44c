// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::StepError;
use crate::pipeline::StateHandler;
use crate::workspace::{move_file, safe_filename};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tt_core::{Clock, ErrorCode, Job, PipelineError, PipelineState};
use tt_storage::{resolve_library_root, JobStore};

pub struct StoringHandler {
    store: Arc<dyn JobStore>,
    clock: Arc<dyn Clock>,
}

impl StoringHandler {
    pub fn new(store: Arc<dyn JobStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

/// `"<title> - <artist>.mp3"` with unsafe characters stripped.
pub(super) fn library_filename(title: &str, artist: &str) -> String {
    format!("{}.mp3", safe_filename(&format!("{title} - {artist}")))
}

/// Place `file` at `dir/<filename>`, treating an existing target as success.
///
/// Returns the target path and whether it already existed.
pub(super) fn place_file(
    file: &Path,
    dir: &Path,
    filename: &str,
) -> std::io::Result<(PathBuf, bool)> {
    std::fs::create_dir_all(dir)?;
    let target = dir.join(filename);
    if target.exists() {
        return Ok((target, true));
    }
    move_file(file, &target)?;
    Ok((target, false))
}

#[async_trait]
impl StateHandler for StoringHandler {
    async fn handle(&self, job: &mut Job) -> Result<(), StepError> {
        let file = job.extracted_file.clone().ok_or_else(|| {
            PipelineError::content(ErrorCode::NoFile, "no extracted file to store")
        })?;
        let metadata = job.final_metadata.clone().ok_or_else(|| {
            PipelineError::content(ErrorCode::NoIdentity, "no metadata for library placement")
        })?;

        let text = |key: &str| {
            metadata.get(key).and_then(serde_json::Value::as_str).map(str::to_string)
        };
        let title = text("trackName").unwrap_or_else(|| job.raw_query.clone());
        let artist = text("artistName").unwrap_or_else(|| "Unknown".to_string());

        let (root, _) = resolve_library_root(self.store.as_ref())
            .map_err(|e| StepError::Unexpected(e.to_string()))?;

        let filename = library_filename(&title, &artist);
        let (target, existed) = place_file(&file, &root, &filename)?;
        if existed {
            tracing::info!(job_id = %job.job_id, path = %target.display(), "target already in library");
            job.result.reason = Some("already_exists".to_string());
        }

        job.result.success = true;
        job.result.title = Some(title);
        job.result.artist = Some(artist);
        job.result.album = text("collectionName");
        job.result.source = Some("iTunes (verified)".to_string());
        job.result.path = Some(target.to_string_lossy().into_owned());

        job.emit("stored in library");
        job.transition_to(PipelineState::Finalized, self.clock.now());
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
