// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`JobStore`] for tests and single-shot tooling.
//!
//! Not crash-safe; correct by contract. Jobs are cloned on the way in and
//! out so callers never alias store-held state.

use crate::runnable::is_runnable;
use crate::{JobStore, StoreError};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use tt_core::{Job, JobId};

#[derive(Default)]
struct Inner {
    jobs: HashMap<JobId, Job>,
    idempotency_keys: HashMap<String, JobId>,
    settings: HashMap<String, String>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JobStore for MemoryStore {
    fn create(&self, job: &Job) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if inner.jobs.contains_key(&job.job_id) {
            return Err(StoreError::JobExists(job.job_id));
        }
        inner.jobs.insert(job.job_id, job.clone());
        Ok(())
    }

    fn get(&self, job_id: &JobId) -> Result<Option<Job>, StoreError> {
        Ok(self.inner.lock().jobs.get(job_id).cloned())
    }

    fn update(&self, job: &Job) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if !inner.jobs.contains_key(&job.job_id) {
            return Err(StoreError::JobNotFound(job.job_id));
        }
        inner.jobs.insert(job.job_id, job.clone());
        Ok(())
    }

    fn list(&self, limit: usize) -> Result<Vec<Job>, StoreError> {
        let inner = self.inner.lock();
        let mut jobs: Vec<Job> = inner.jobs.values().cloned().collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        jobs.truncate(limit);
        Ok(jobs)
    }

    fn next_runnable(&self, now: DateTime<Utc>) -> Result<Option<JobId>, StoreError> {
        let inner = self.inner.lock();
        let mut runnable: Vec<&Job> =
            inner.jobs.values().filter(|j| is_runnable(j, now)).collect();
        runnable.sort_by_key(|j| j.updated_at);
        Ok(runnable.first().map(|j| j.job_id))
    }

    fn get_job_by_idempotency_key(&self, key: &str) -> Result<Option<Job>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner
            .idempotency_keys
            .get(key)
            .and_then(|id| inner.jobs.get(id))
            .cloned())
    }

    fn bind_idempotency_key(
        &self,
        key: &str,
        job_id: &JobId,
        _now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.idempotency_keys.entry(key.to_string()).or_insert(*job_id);
        Ok(())
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.inner.lock().settings.get(key).cloned())
    }

    fn set_setting(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.lock().settings.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
