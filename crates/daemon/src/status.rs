// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status projection: the single job shape the API returns.

use serde::Serialize;
use tt_core::{ErrorCode, Job, JobId, JobResult, PipelineState};

/// Coarse job status derived from the pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Running,
    Waiting,
    Success,
    Error,
    Cancelled,
}

tt_core::simple_display! {
    StatusKind {
        Running => "running",
        Waiting => "waiting",
        Success => "success",
        Error => "error",
        Cancelled => "cancelled",
    }
}

impl StatusKind {
    pub fn of(state: PipelineState) -> Self {
        if state.is_pause() {
            return StatusKind::Waiting;
        }
        match state {
            PipelineState::Finalized => StatusKind::Success,
            PipelineState::Failed => StatusKind::Error,
            PipelineState::Cancelled => StatusKind::Cancelled,
            _ => StatusKind::Running,
        }
    }
}

/// Present only while the job waits for controller input.
#[derive(Debug, Serialize)]
pub struct InputRequired {
    #[serde(rename = "type")]
    pub kind: String,
    pub choices: serde_json::Value,
}

/// Present only on failed jobs.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: Option<ErrorCode>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobStatus {
    pub job_id: JobId,
    pub state: &'static str,
    pub status: StatusKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_required: Option<InputRequired>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JobResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_metadata: Option<serde_json::Value>,
    pub can_resume: bool,
}

/// Project a job into its API status shape.
pub fn build_status(job: &Job) -> JobStatus {
    let status = StatusKind::of(job.current_state);

    let input_required = (status == StatusKind::Waiting).then(|| {
        let choices = if !job.metadata_candidates.is_empty() {
            serde_json::json!(job.metadata_candidates)
        } else {
            serde_json::json!(job.source_candidates)
        };
        InputRequired { kind: job.current_state.name().to_lowercase(), choices }
    });

    JobStatus {
        job_id: job.job_id,
        state: job.current_state.name(),
        status,
        input_required,
        result: (status == StatusKind::Success).then(|| job.result.clone()),
        error: (status == StatusKind::Error)
            .then(|| ErrorBody { code: job.error_code, message: job.error_message.clone() }),
        final_metadata: job.final_metadata.clone(),
        can_resume: job.can_resume(),
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
