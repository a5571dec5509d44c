// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Duration;
use tt_core::{Clock, FakeClock, Job, PipelineState};

fn runnable_job(clock: &FakeClock) -> Job {
    let mut job = Job::builder().build();
    job.transition_to(PipelineState::ResolvingIdentity, clock.now());
    job
}

#[test]
fn active_unlocked_job_is_runnable() {
    let clock = FakeClock::new();
    let job = runnable_job(&clock);
    assert!(is_runnable(&job, clock.now()));
}

#[yare::parameterized(
    finalized = { PipelineState::Finalized },
    failed    = { PipelineState::Failed },
    cancelled = { PipelineState::Cancelled },
    user_intent = { PipelineState::UserIntentSelection },
    user_meta   = { PipelineState::UserMetadataSelection },
)]
fn terminal_and_pause_states_are_not_runnable(state: PipelineState) {
    let clock = FakeClock::new();
    let mut job = runnable_job(&clock);
    job.current_state = state;
    assert!(!is_runnable(&job, clock.now()));
}

#[test]
fn future_next_run_at_defers() {
    let clock = FakeClock::new();
    let mut job = runnable_job(&clock);
    job.schedule_retry(Duration::seconds(5), clock.now());

    assert!(!is_runnable(&job, clock.now()));

    clock.advance(Duration::seconds(5));
    // next_run_at ≤ now: eligible again.
    assert!(is_runnable(&job, clock.now()));
}

#[test]
fn live_lock_excludes_until_ttl() {
    let clock = FakeClock::new();
    let mut job = runnable_job(&clock);
    job.acquire_lock("worker-1", clock.now());

    assert!(!is_runnable(&job, clock.now()));

    clock.advance(LOCK_TTL);
    // Lock exactly TTL old has expired.
    assert!(is_runnable(&job, clock.now()));
}
