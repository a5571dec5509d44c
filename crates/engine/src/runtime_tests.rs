// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::handlers::standard_pipeline;
use crate::test_support::{created_job, happy_deps};
use std::sync::Arc;
use std::time::Duration;
use tt_core::{FakeClock, JobOptions, PipelineState, SystemClock};
use tt_storage::{JobStore, MemoryStore};

fn runtime_over(store: Arc<MemoryStore>, library: &std::path::Path) -> WorkerRuntime {
    let clock = FakeClock::new();
    let deps = happy_deps(store.clone(), &clock, library);
    // The background loop needs real time so retries/locks age naturally.
    WorkerRuntime::new(store, Arc::new(standard_pipeline(deps)), Arc::new(SystemClock))
}

#[tokio::test]
async fn start_is_idempotent_and_stop_drains() {
    let store = Arc::new(MemoryStore::new());
    let library = tempfile::tempdir().unwrap();
    let runtime = runtime_over(store.clone(), library.path());

    runtime.start();
    runtime.start();
    runtime.stop().await;
    // A second stop is a no-op.
    runtime.stop().await;
}

#[tokio::test]
async fn background_loop_processes_jobs() {
    let store = Arc::new(MemoryStore::new());
    let library = tempfile::tempdir().unwrap();
    let runtime = runtime_over(store.clone(), library.path());

    let job = created_job(&FakeClock::new(), "radiohead - creep", JobOptions {
        dry_run: true,
        ..JobOptions::default()
    });
    let job_id = job.job_id;
    store.create(&job).unwrap();

    runtime.start();

    let deadline = std::time::Instant::now() + Duration::from_secs(10);
    loop {
        let current = store.get(&job_id).unwrap().unwrap();
        if current.current_state == PipelineState::Finalized {
            break;
        }
        assert!(std::time::Instant::now() < deadline, "job did not finalize in time");
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    runtime.stop().await;
}

#[tokio::test]
async fn worker_id_is_stamped_into_locks() {
    let store = Arc::new(MemoryStore::new());
    let library = tempfile::tempdir().unwrap();
    let runtime = runtime_over(store.clone(), library.path());
    assert!(runtime.worker_id().starts_with("worker-"));
}
