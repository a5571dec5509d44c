// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed [`JobStore`].
//!
//! Jobs are stored as a JSON document per row; `created_at`/`updated_at`
//! columns mirror the job's own timestamps for ordering. The store is
//! crash-safe (WAL journal) and shared across the HTTP layer and the worker
//! through a single serialized connection.

use crate::runnable::is_runnable;
use crate::{JobStore, StoreError};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tt_core::{Job, JobId};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the store at `path`, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "busy_timeout", 5000)?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS jobs (
                job_id TEXT PRIMARY KEY,
                data TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS idempotency_keys (
                key TEXT PRIMARY KEY,
                job_id TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS app_settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;

        Ok(Self { conn: Mutex::new(conn) })
    }

    fn parse_job(raw: &str) -> Result<Job, StoreError> {
        Ok(serde_json::from_str(raw)?)
    }
}

impl JobStore for SqliteStore {
    fn create(&self, job: &Job) -> Result<(), StoreError> {
        let payload = serde_json::to_string(job)?;
        let conn = self.conn.lock();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO jobs (job_id, data, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                job.job_id.as_str(),
                payload,
                job.created_at.to_rfc3339(),
                job.updated_at.to_rfc3339()
            ],
        )?;
        if inserted == 0 {
            return Err(StoreError::JobExists(job.job_id));
        }
        Ok(())
    }

    fn get(&self, job_id: &JobId) -> Result<Option<Job>, StoreError> {
        let conn = self.conn.lock();
        let raw: Option<String> = conn
            .query_row(
                "SELECT data FROM jobs WHERE job_id = ?1",
                params![job_id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        raw.map(|r| Self::parse_job(&r)).transpose()
    }

    fn update(&self, job: &Job) -> Result<(), StoreError> {
        let payload = serde_json::to_string(job)?;
        let conn = self.conn.lock();
        let changed = conn.execute(
            "UPDATE jobs SET data = ?2, updated_at = ?3 WHERE job_id = ?1",
            params![job.job_id.as_str(), payload, job.updated_at.to_rfc3339()],
        )?;
        if changed == 0 {
            return Err(StoreError::JobNotFound(job.job_id));
        }
        Ok(())
    }

    fn list(&self, limit: usize) -> Result<Vec<Job>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt =
            conn.prepare("SELECT data FROM jobs ORDER BY created_at DESC LIMIT ?1")?;
        let rows = stmt.query_map(params![limit as i64], |row| row.get::<_, String>(0))?;

        let mut jobs = Vec::new();
        for raw in rows {
            jobs.push(Self::parse_job(&raw?)?);
        }
        Ok(jobs)
    }

    fn next_runnable(&self, now: DateTime<Utc>) -> Result<Option<JobId>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT data FROM jobs ORDER BY updated_at ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        for raw in rows {
            let job = Self::parse_job(&raw?)?;
            if is_runnable(&job, now) {
                return Ok(Some(job.job_id));
            }
        }
        Ok(None)
    }

    fn get_job_by_idempotency_key(&self, key: &str) -> Result<Option<Job>, StoreError> {
        let job_id: Option<String> = {
            let conn = self.conn.lock();
            conn.query_row(
                "SELECT job_id FROM idempotency_keys WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?
        };
        match job_id {
            Some(id) => self.get(&JobId::from_string(id)),
            None => Ok(None),
        }
    }

    fn bind_idempotency_key(
        &self,
        key: &str,
        job_id: &JobId,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR IGNORE INTO idempotency_keys (key, job_id, created_at)
             VALUES (?1, ?2, ?3)",
            params![key, job_id.as_str(), now.to_rfc3339()],
        )?;
        Ok(())
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.conn.lock();
        Ok(conn
            .query_row(
                "SELECT value FROM app_settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn set_setting(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO app_settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "sqlite_tests.rs"]
mod tests;
