// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::StepError;
use crate::pipeline::StateHandler;
use crate::workspace;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tt_adapters::{AudioDownloader, DownloadError};
use tt_core::{Clock, ErrorCode, Job, PipelineError, PipelineState};

pub struct DownloadingHandler {
    downloader: Arc<dyn AudioDownloader>,
    clock: Arc<dyn Clock>,
}

impl DownloadingHandler {
    pub fn new(downloader: Arc<dyn AudioDownloader>, clock: Arc<dyn Clock>) -> Self {
        Self { downloader, clock }
    }
}

/// Regular files in the temp dir, sorted by name for determinism.
fn downloaded_files(dir: &std::path::Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

#[async_trait]
impl StateHandler for DownloadingHandler {
    async fn handle(&self, job: &mut Job) -> Result<(), StepError> {
        if job.options.dry_run {
            let hint = job.identity_hint.as_ref();
            job.result.success = true;
            job.result.source = Some("dry-run".to_string());
            job.result.path = Some("(not written)".to_string());
            job.result.title = hint.map(|h| h.title.clone());
            job.result.artist = hint.map(|h| h.primary_artist().to_string());
            job.result.album = hint.and_then(|h| h.album.clone());
            job.emit("dry run complete");
            job.transition_to(PipelineState::Finalized, self.clock.now());
            return Ok(());
        }

        let source = job.selected_source.clone().ok_or_else(|| {
            PipelineError::content(ErrorCode::NoIdentity, "no selected source to download")
        })?;

        let temp_dir = workspace::ensure_fresh(&job.job_id)?;
        job.temp_dir = Some(temp_dir.clone());
        job.emit(format!("downloading {}", source.title));

        self.downloader
            .download(&source.url, &temp_dir, job.options.verbose)
            .await
            .map_err(|e| match e {
                DownloadError::ToolNotFound(tool) => StepError::Pipeline(
                    PipelineError::dependency(
                        ErrorCode::ExternalToolNotFound,
                        format!("{tool} is not installed"),
                    )
                    .tool(tool),
                ),
                DownloadError::Failed { status, stderr } => StepError::Pipeline(
                    PipelineError::content(
                        ErrorCode::ExternalToolError,
                        format!("download exited with status {status}: {stderr}"),
                    )
                    .tool("yt-dlp"),
                ),
                // Timeouts and spawn errors may be transient host conditions.
                DownloadError::Subprocess(e) => StepError::Unexpected(e.to_string()),
            })?;

        let files = downloaded_files(&temp_dir)?;
        let Some(file) = files.first() else {
            return Err(StepError::Pipeline(PipelineError::content(
                ErrorCode::NoFile,
                "download produced no file",
            )));
        };
        if files.len() > 1 {
            tracing::warn!(
                job_id = %job.job_id,
                count = files.len(),
                "expected one downloaded file, taking the first"
            );
        }

        job.downloaded_file = Some(file.clone());
        job.emit("download complete");
        job.transition_to(PipelineState::Extracting, self.clock.now());
        Ok(())
    }
}

#[cfg(test)]
#[path = "download_tests.rs"]
mod tests;
