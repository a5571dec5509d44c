// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job control endpoints.
//!
//! These handlers are the "controller" side of the pause states: they
//! mutate paused jobs directly and persist them. They never execute
//! pipeline steps; that is the worker's monopoly.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tt_core::{IdentityHint, Job, JobId, JobOptions, PipelineState};

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use crate::status::{build_status, JobStatus, StatusKind};

pub const LIST_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub query: String,
    #[serde(default)]
    pub options: JobOptions,
}

#[derive(Debug, Deserialize)]
pub struct JobInputRequest {
    pub choice: i64,
}

#[derive(Debug, Serialize)]
pub struct JobSummary {
    pub job_id: JobId,
    pub status: StatusKind,
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    pub created_at: DateTime<Utc>,
    pub can_resume: bool,
}

fn load_job(state: &AppState, job_id: &str) -> ApiResult<Job> {
    // Ids longer than a UUID cannot exist; reject before building a JobId.
    if job_id.len() > 36 {
        return Err(ApiError::not_found("Job not found"));
    }
    state
        .store
        .get(&JobId::from_string(job_id))?
        .ok_or_else(|| ApiError::not_found("Job not found"))
}

/// POST /jobs
pub async fn create_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateJobRequest>,
) -> ApiResult<Json<JobStatus>> {
    let idempotency_key = headers
        .get("Idempotency-Key")
        .and_then(|v| v.to_str().ok())
        .filter(|k| !k.is_empty());

    if let Some(key) = idempotency_key {
        if let Some(existing) = state.store.get_job_by_idempotency_key(key)? {
            tracing::info!(job_id = %existing.job_id, key, "idempotency key replay");
            return Ok(Json(build_status(&existing)));
        }
    }

    let now = state.clock.now();
    let mut job = Job::new(req.query, req.options, now);
    job.transition_to(PipelineState::ResolvingIdentity, now);
    state.store.create(&job)?;

    if let Some(key) = idempotency_key {
        state.store.bind_idempotency_key(key, &job.job_id, now)?;
    }

    tracing::info!(job_id = %job.job_id, query = %job.raw_query, "job created");
    Ok(Json(build_status(&job)))
}

/// GET /jobs/{job_id}
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobStatus>> {
    let job = load_job(&state, &job_id)?;
    Ok(Json(build_status(&job)))
}

/// GET /jobs
pub async fn list_jobs(State(state): State<AppState>) -> ApiResult<Json<Vec<JobSummary>>> {
    let jobs = state.store.list(LIST_LIMIT)?;

    let summaries = jobs
        .iter()
        .map(|job| {
            let (title, artist) = match &job.final_metadata {
                Some(md) => (
                    md.get("trackName").and_then(serde_json::Value::as_str).map(str::to_string),
                    md.get("artistName").and_then(serde_json::Value::as_str).map(str::to_string),
                ),
                None => (job.result.title.clone(), job.result.artist.clone()),
            };
            JobSummary {
                job_id: job.job_id,
                status: StatusKind::of(job.current_state),
                state: job.current_state.name(),
                title,
                artist,
                created_at: job.created_at,
                can_resume: job.can_resume(),
            }
        })
        .collect();

    Ok(Json(summaries))
}

/// POST /jobs/{job_id}/input
pub async fn provide_input(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(payload): Json<JobInputRequest>,
) -> ApiResult<Json<JobStatus>> {
    let mut job = load_job(&state, &job_id)?;

    if !job.is_paused() {
        return Err(ApiError::bad_request("Job is not waiting for user input"));
    }
    if payload.choice < 0 {
        return Err(ApiError::bad_request("Choice out of range"));
    }
    let choice = payload.choice as usize;
    let now = state.clock.now();

    match job.current_state {
        PipelineState::UserIntentSelection => {
            let selected = job
                .source_candidates
                .get(choice)
                .ok_or_else(|| ApiError::bad_request("Choice out of range"))?;
            // Controller selection is definitive.
            job.identity_hint = Some(IdentityHint::from_candidate(selected, 100));
            job.transition_to(PipelineState::Searching, now);
        }
        PipelineState::UserMetadataSelection => {
            let selected = job
                .metadata_candidates
                .get(choice)
                .cloned()
                .ok_or_else(|| ApiError::bad_request("Choice out of range"))?;
            job.final_metadata = Some(selected);
            job.metadata_confidence = Some(100);
            job.transition_to(PipelineState::Tagging, now);
        }
        _ => return Err(ApiError::bad_request("Invalid input state")),
    }

    state.store.update(&job)?;
    tracing::info!(job_id = %job.job_id, choice, state = %job.current_state, "user input applied");
    Ok(Json(build_status(&job)))
}

/// POST /jobs/{job_id}/cancel. Idempotent; no-op on terminal states.
pub async fn cancel_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobStatus>> {
    let mut job = load_job(&state, &job_id)?;

    if !job.is_terminal() {
        job.cancel("Cancelled by user", state.clock.now());
        state.store.update(&job)?;
        tracing::info!(job_id = %job.job_id, resume_from = ?job.resume_from, "job cancelled");
    }

    Ok(Json(build_status(&job)))
}

/// POST /jobs/{job_id}/resume
pub async fn resume_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobStatus>> {
    let mut job = load_job(&state, &job_id)?;

    if job.current_state != PipelineState::Cancelled && !job.is_paused() {
        return Err(ApiError::bad_request("Job cannot be resumed from this state"));
    }
    if job.resume_from.is_none() {
        return Err(ApiError::bad_request("No resume point recorded"));
    }

    job.resume(state.clock.now());
    state.store.update(&job)?;
    tracing::info!(job_id = %job.job_id, state = %job.current_state, "job resumed");
    Ok(Json(build_status(&job)))
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
