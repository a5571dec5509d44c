// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job model and state machine mutations.
//!
//! The `Job` is the only shared object in the system: it round-trips
//! through the store between every pipeline step, so every field here must
//! survive serialization unchanged.

use crate::error::ErrorCode;
use crate::id::JobId;
use crate::state::PipelineState;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Bounded length of `state_history`; oldest records are evicted first.
pub const MAX_STATE_HISTORY: usize = 50;

/// How a state history record ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepDisposition {
    Success,
    Failed,
}

crate::simple_display! {
    StepDisposition {
        Success => "success",
        Failed => "failed",
    }
}

/// One entry in a job's state history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
    pub state: PipelineState,
    pub entered_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exited_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StepDisposition>,
}

/// Per-job options supplied at creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOptions {
    /// Always pause for user intent selection after identity resolution.
    #[serde(default)]
    pub ask: bool,
    /// Skip metadata matching and archive directly.
    #[serde(default)]
    pub force_archive: bool,
    /// Run the pipeline without downloading or writing files.
    #[serde(default)]
    pub dry_run: bool,
    /// Pass external tool output through instead of suppressing it.
    #[serde(default)]
    pub verbose: bool,
}

/// Final outcome of a job, populated on the way into `FINALIZED`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A ranked candidate returned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCandidate {
    pub title: String,
    #[serde(default)]
    pub artists: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    pub video_id: String,
    /// Duration in seconds, when the provider reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploader: Option<String>,
}

/// The resolved intent: what recording the user meant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityHint {
    pub title: String,
    #[serde(default)]
    pub artists: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    pub video_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploader: Option<String>,
    /// 0–100 confidence in the resolution.
    pub confidence: u8,
}

impl IdentityHint {
    /// Synthesize a hint from a source candidate.
    ///
    /// Used both by automatic adoption (confidence 80) and by controller
    /// selection (confidence 100).
    pub fn from_candidate(candidate: &SourceCandidate, confidence: u8) -> Self {
        Self {
            title: candidate.title.clone(),
            artists: candidate.artists.clone(),
            album: candidate.album.clone(),
            duration_ms: candidate.duration.map(|s| s * 1000),
            video_id: candidate.video_id.clone(),
            uploader: candidate
                .uploader
                .clone()
                .or_else(|| candidate.artists.first().cloned()),
            confidence,
        }
    }

    /// The primary artist, used for scoring and filenames.
    pub fn primary_artist(&self) -> &str {
        self.artists.first().map(String::as_str).unwrap_or("Unknown")
    }
}

/// The media source chosen for download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedSource {
    pub url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploader: Option<String>,
}

/// A music-ingest job: the unit of work and its full persisted state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub job_id: JobId,

    #[serde(default)]
    pub raw_query: String,
    #[serde(default)]
    pub normalized_query: String,
    #[serde(default)]
    pub options: JobOptions,

    pub current_state: PipelineState,
    #[serde(default)]
    pub state_history: Vec<StateRecord>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_state: Option<PipelineState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default)]
    pub retry_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_run_at: Option<DateTime<Utc>>,

    /// The state at which a cancellation occurred, for `resume`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_from: Option<PipelineState>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_hint: Option<IdentityHint>,
    #[serde(default)]
    pub source_candidates: Vec<SourceCandidate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_source: Option<SelectedSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloaded_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_file: Option<PathBuf>,

    #[serde(default)]
    pub metadata_candidates: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_confidence: Option<i64>,

    #[serde(default)]
    pub result: JobResult,

    /// Single-slot progress log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
}

impl Job {
    /// Create a new job in `INIT` with a fresh UUID.
    pub fn new(raw_query: impl Into<String>, options: JobOptions, now: DateTime<Utc>) -> Self {
        let raw_query = raw_query.into();
        let normalized_query = raw_query.to_lowercase();
        Self {
            job_id: JobId::new(),
            raw_query,
            normalized_query,
            options,
            current_state: PipelineState::Init,
            state_history: Vec::new(),
            created_at: now,
            updated_at: now,
            failed_state: None,
            error_code: None,
            error_message: None,
            retry_count: 0,
            next_run_at: None,
            resume_from: None,
            locked_at: None,
            locked_by: None,
            identity_hint: None,
            source_candidates: Vec::new(),
            selected_source: None,
            temp_dir: None,
            downloaded_file: None,
            extracted_file: None,
            metadata_candidates: Vec::new(),
            final_metadata: None,
            metadata_confidence: None,
            result: JobResult::default(),
            last_message: None,
        }
    }

    /// Record a single-slot progress message.
    pub fn emit(&mut self, message: impl Into<String>) {
        self.last_message = Some(message.into());
    }

    /// Advance to a new state, finalizing the current history record.
    pub fn transition_to(&mut self, new_state: PipelineState, now: DateTime<Utc>) {
        if let Some(record) = self.state_history.last_mut() {
            record.exited_at = Some(now);
            record.status = Some(StepDisposition::Success);
        }

        self.current_state = new_state;
        self.state_history.push(StateRecord {
            state: new_state,
            entered_at: now,
            exited_at: None,
            status: None,
        });

        if self.state_history.len() > MAX_STATE_HISTORY {
            self.state_history.remove(0);
        }

        self.updated_at = now;
    }

    /// Terminate the job with a structured error.
    pub fn fail(&mut self, code: ErrorCode, message: impl Into<String>, now: DateTime<Utc>) {
        let message = message.into();

        self.failed_state = Some(self.current_state);
        self.error_code = Some(code);
        self.error_message = Some(message.clone());
        self.current_state = PipelineState::Failed;

        if let Some(record) = self.state_history.last_mut() {
            record.exited_at = Some(now);
            record.status = Some(StepDisposition::Failed);
        }

        self.result.error = Some(message);
        self.updated_at = now;
    }

    /// Cancel the job, recording the interrupted state for later resume.
    ///
    /// Idempotent on terminal states aside from the history record; callers
    /// normally guard with `is_terminal` first.
    pub fn cancel(&mut self, reason: impl Into<String>, now: DateTime<Utc>) {
        let reason = reason.into();

        if !self.current_state.is_terminal() {
            self.resume_from = Some(self.current_state);
        }

        self.release_lock();
        self.transition_to(PipelineState::Cancelled, now);
        self.error_code = Some(ErrorCode::Cancelled);
        self.error_message = Some(reason.clone());
        self.result.error = Some(reason);
    }

    /// Restore the state recorded at cancellation and clear error fields.
    ///
    /// Callers must check [`Job::can_resume`] first; this is a no-op when
    /// no resume point is recorded.
    pub fn resume(&mut self, now: DateTime<Utc>) {
        if let Some(state) = self.resume_from.take() {
            self.error_code = None;
            self.error_message = None;
            self.current_state = state;
            self.updated_at = now;
        }
    }

    /// Whether a lock acquired at `locked_at` is still live at `now`.
    ///
    /// A lock exactly `ttl` old has expired.
    pub fn is_locked(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.locked_at.is_some_and(|at| now - at < ttl)
    }

    pub fn acquire_lock(&mut self, worker_id: impl Into<String>, now: DateTime<Utc>) {
        self.locked_at = Some(now);
        self.locked_by = Some(worker_id.into());
        self.updated_at = now;
    }

    pub fn release_lock(&mut self) {
        self.locked_at = None;
        self.locked_by = None;
    }

    /// Count a retry and schedule the next attempt strictly in the future.
    pub fn schedule_retry(&mut self, delay: Duration, now: DateTime<Utc>) {
        self.retry_count += 1;
        self.next_run_at = Some(now + delay);
        self.updated_at = now;
    }

    pub fn is_terminal(&self) -> bool {
        self.current_state.is_terminal()
    }

    pub fn is_paused(&self) -> bool {
        self.current_state.is_pause()
    }

    /// A job can resume when it was cancelled with a recorded resume point.
    pub fn can_resume(&self) -> bool {
        self.current_state == PipelineState::Cancelled && self.resume_from.is_some()
    }
}

crate::builder! {
    pub struct JobBuilder => Job {
        into {
            raw_query: String = "test artist - test title",
            normalized_query: String = "test artist - test title",
        }
        set {
            options: JobOptions = JobOptions::default(),
            current_state: PipelineState = PipelineState::Init,
            state_history: Vec<StateRecord> = Vec::new(),
            retry_count: u32 = 0,
            source_candidates: Vec<SourceCandidate> = Vec::new(),
            metadata_candidates: Vec<serde_json::Value> = Vec::new(),
            result: JobResult = JobResult::default(),
        }
        option {
            failed_state: PipelineState = None,
            error_code: ErrorCode = None,
            error_message: String = None,
            next_run_at: DateTime<Utc> = None,
            resume_from: PipelineState = None,
            locked_at: DateTime<Utc> = None,
            locked_by: String = None,
            identity_hint: IdentityHint = None,
            selected_source: SelectedSource = None,
            temp_dir: PathBuf = None,
            downloaded_file: PathBuf = None,
            extracted_file: PathBuf = None,
            final_metadata: serde_json::Value = None,
            metadata_confidence: i64 = None,
            last_message: String = None,
        }
        computed {
            job_id: JobId = JobId::new(),
            created_at: DateTime<Utc> = DateTime::UNIX_EPOCH,
            updated_at: DateTime<Utc> = DateTime::UNIX_EPOCH,
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
