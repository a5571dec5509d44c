// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runnable-selection predicate shared by store implementations.

use chrono::{DateTime, Duration, Utc};
use tt_core::Job;

/// A worker lock expires this long after acquisition regardless of owner,
/// so a crashed worker never stalls a job indefinitely.
pub const LOCK_TTL: Duration = Duration::seconds(60);

/// Whether a worker may pick up this job at `now`.
///
/// Terminal and pause states are never runnable; a scheduled `next_run_at`
/// in the future defers the job; a live lock excludes it.
pub fn is_runnable(job: &Job, now: DateTime<Utc>) -> bool {
    if job.current_state.is_terminal() {
        return false;
    }

    if job.current_state.is_pause() {
        return false;
    }

    if job.next_run_at.is_some_and(|at| at > now) {
        return false;
    }

    !job.is_locked(now, LOCK_TTL)
}

#[cfg(test)]
#[path = "runnable_tests.rs"]
mod tests;
