// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stateless pipeline executor loop.
//!
//! Responsibilities: pick runnable jobs, execute exactly ONE pipeline step,
//! persist job state, respect `USER_*` pauses. The lock is always released
//! before a job is put down.

use crate::error::StepError;
use crate::pipeline::Pipeline;
use crate::workspace;
use chrono::Duration as ChronoDuration;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tt_core::{Clock, ErrorCode, Job, PipelineState};
use tt_storage::{JobStore, StoreError};

/// Idle poll cadence.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Unexpected failures are retried this many times before the job fails
/// with `MAX_RETRIES_EXCEEDED`.
pub const MAX_RETRIES: u32 = 3;

/// Retry backoff schedule; the last entry repeats.
pub const BACKOFF: [Duration; 3] =
    [Duration::from_secs(1), Duration::from_secs(5), Duration::from_secs(30)];

pub struct Worker {
    store: Arc<dyn JobStore>,
    pipeline: Arc<Pipeline>,
    clock: Arc<dyn Clock>,
    worker_id: String,
    stop: CancellationToken,
}

impl Worker {
    pub fn new(
        store: Arc<dyn JobStore>,
        pipeline: Arc<Pipeline>,
        clock: Arc<dyn Clock>,
        worker_id: impl Into<String>,
        stop: CancellationToken,
    ) -> Self {
        Self { store, pipeline, clock, worker_id: worker_id.into(), stop }
    }

    /// Poll-and-step until the stop token fires.
    pub async fn run_forever(&self) {
        tracing::info!(worker_id = %self.worker_id, "worker started");

        while !self.stop.is_cancelled() {
            match self.run_once().await {
                Ok(true) => {}
                Ok(false) => {
                    tokio::select! {
                        _ = self.stop.cancelled() => break,
                        _ = tokio::time::sleep(POLL_INTERVAL) => {}
                    }
                }
                Err(e) => {
                    tracing::error!(worker_id = %self.worker_id, error = %e, "worker iteration failed");
                    tokio::select! {
                        _ = self.stop.cancelled() => break,
                        _ = tokio::time::sleep(POLL_INTERVAL) => {}
                    }
                }
            }
        }

        tracing::info!(worker_id = %self.worker_id, "worker stopped gracefully");
    }

    /// Pick one runnable job and drive it one step.
    ///
    /// Returns whether a job was processed; callers sleep when none was.
    pub async fn run_once(&self) -> Result<bool, StoreError> {
        let Some(job) = self.fetch_next_job()? else {
            return Ok(false);
        };
        self.process_job(job).await?;
        Ok(true)
    }

    fn fetch_next_job(&self) -> Result<Option<Job>, StoreError> {
        let Some(job_id) = self.store.next_runnable(self.clock.now())? else {
            return Ok(None);
        };
        let Some(mut job) = self.store.get(&job_id)? else {
            return Ok(None);
        };

        job.acquire_lock(&self.worker_id, self.clock.now());
        self.store.update(&job)?;

        tracing::info!(
            job_id = %job.job_id,
            state = %job.current_state,
            worker_id = %self.worker_id,
            "picked job"
        );
        Ok(Some(job))
    }

    /// Execute exactly ONE pipeline step for a locked job.
    ///
    /// Invariants:
    /// - the job is already locked by this worker
    /// - exactly one `pipeline.step` call
    /// - the lock is ALWAYS released before return
    pub async fn process_job(&self, job: Job) -> Result<(), StoreError> {
        // Reload to catch cancellation that landed between lock and step.
        let Some(mut job) = self.store.get(&job.job_id)? else {
            return Ok(());
        };

        if job.current_state == PipelineState::Cancelled {
            tracing::info!(job_id = %job.job_id, "job was cancelled before execution step");
            workspace::cleanup(&job);
            job.release_lock();
            self.store.update(&job)?;
            return Ok(());
        }

        let prev_state = job.current_state;

        match self.pipeline.step(&mut job).await {
            Ok(()) => {}
            Err(StepError::Pipeline(e)) => {
                job.fail(e.code, e.message.clone(), self.clock.now());
                job.release_lock();
                self.store.update(&job)?;
                workspace::cleanup(&job);
                tracing::error!(job_id = %job.job_id, code = %e.code, message = %e.message, "job failed");
                return Ok(());
            }
            Err(StepError::Unexpected(message)) => {
                if job.retry_count >= MAX_RETRIES {
                    job.fail(ErrorCode::MaxRetriesExceeded, message, self.clock.now());
                    job.release_lock();
                    self.store.update(&job)?;
                    workspace::cleanup(&job);
                    tracing::error!(job_id = %job.job_id, "job failed after max retries");
                    return Ok(());
                }

                let delay = BACKOFF[(job.retry_count as usize).min(BACKOFF.len() - 1)];
                let delay = ChronoDuration::from_std(delay).unwrap_or(ChronoDuration::seconds(1));
                job.schedule_retry(delay, self.clock.now());
                job.release_lock();
                self.store.update(&job)?;
                tracing::warn!(
                    job_id = %job.job_id,
                    attempt = job.retry_count,
                    max = MAX_RETRIES,
                    error = %message,
                    "retry scheduled"
                );
                return Ok(());
            }
        }

        // Cancellation barrier BEFORE persisting the new state: a cancel
        // that landed during the step wins, and the handler's in-memory
        // mutations are discarded.
        if let Some(fresh) = self.store.get(&job.job_id)? {
            if fresh.current_state == PipelineState::Cancelled {
                tracing::info!(job_id = %job.job_id, state = %prev_state, "job cancelled during step");
                workspace::cleanup(&fresh);
                self.store.update(&fresh)?;
                return Ok(());
            }
        }

        // Persist the successful step.
        self.store.update(&job)?;

        // Stop conditions: exactly one step per iteration, no loops.

        if job.current_state == prev_state {
            // Defensive: the executor raises NO_STATE_CHANGE before this.
            job.release_lock();
            self.store.update(&job)?;
            tracing::warn!(job_id = %job.job_id, state = %job.current_state, "job did not advance state");
            return Ok(());
        }

        if job.is_paused() {
            job.release_lock();
            self.store.update(&job)?;
            tracing::info!(job_id = %job.job_id, state = %job.current_state, "job waiting for user input");
            return Ok(());
        }

        if job.is_terminal() {
            workspace::cleanup(&job);
            job.release_lock();
            self.store.update(&job)?;
            tracing::info!(job_id = %job.job_id, state = %job.current_state, "job finished");
            return Ok(());
        }

        // Intermediate: the next poll picks the same job up again.
        job.release_lock();
        self.store.update(&job)?;
        tracing::info!(job_id = %job.job_id, state = %job.current_state, "job advanced");
        Ok(())
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
