// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tt-storage: durable persistence for ingest jobs.
//!
//! The store is the sole shared mutable state in the system. Jobs round-trip
//! through it between pipeline steps; the HTTP layer and the worker never
//! share in-memory `Job` instances.

pub mod memory;
pub mod runnable;
pub mod settings;
pub mod sqlite;

pub use memory::MemoryStore;
pub use runnable::{is_runnable, LOCK_TTL};
pub use settings::{
    resolve_library_root, set_library_root, SettingsError, SettingsSource,
    MUSIC_LIBRARY_ROOT_KEY,
};
pub use sqlite::SqliteStore;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tt_core::{Job, JobId};

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("job {0} already exists")]
    JobExists(JobId),
    #[error("job {0} does not exist")]
    JobNotFound(JobId),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable mapping from job id to [`Job`], plus idempotency keys and
/// application settings.
///
/// All operations must be safe under concurrent HTTP and worker access;
/// implementations serialize writers per job and give readers committed
/// state.
pub trait JobStore: Send + Sync {
    /// Persist a newly created job. Fails if the id is already present.
    fn create(&self, job: &Job) -> Result<(), StoreError>;

    fn get(&self, job_id: &JobId) -> Result<Option<Job>, StoreError>;

    /// Replace a job's persisted state. Fails if absent.
    fn update(&self, job: &Job) -> Result<(), StoreError>;

    /// Most recent jobs first (by `created_at`).
    fn list(&self, limit: usize) -> Result<Vec<Job>, StoreError>;

    /// The oldest-`updated_at` job that [`is_runnable`] at `now`.
    fn next_runnable(&self, now: DateTime<Utc>) -> Result<Option<JobId>, StoreError>;

    fn get_job_by_idempotency_key(&self, key: &str) -> Result<Option<Job>, StoreError>;

    /// Bind a key to a job, insert-if-absent: an existing binding wins.
    fn bind_idempotency_key(
        &self,
        key: &str,
        job_id: &JobId,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    fn get_setting(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set_setting(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
