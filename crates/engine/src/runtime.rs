// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker lifecycle ownership. This is NOT job logic.

use crate::pipeline::Pipeline;
use crate::worker::Worker;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tt_core::{Clock, JobId};
use tt_storage::JobStore;

/// How long `stop` waits for the loop to drain.
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Owns one background worker loop (`start`/`stop`).
pub struct WorkerRuntime {
    store: Arc<dyn JobStore>,
    pipeline: Arc<Pipeline>,
    clock: Arc<dyn Clock>,
    worker_id: String,
    stop: CancellationToken,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl WorkerRuntime {
    pub fn new(store: Arc<dyn JobStore>, pipeline: Arc<Pipeline>, clock: Arc<dyn Clock>) -> Self {
        let worker_id = format!("worker-{}", JobId::new().short(8));
        Self {
            store,
            pipeline,
            clock,
            worker_id,
            stop: CancellationToken::new(),
            handle: Mutex::new(None),
        }
    }

    /// The identity this runtime's worker writes into `locked_by`.
    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    /// Spawn the worker loop. Idempotent.
    pub fn start(&self) {
        let mut handle = self.handle.lock();
        if handle.is_some() {
            return;
        }

        let worker = Worker::new(
            self.store.clone(),
            self.pipeline.clone(),
            self.clock.clone(),
            self.worker_id.clone(),
            self.stop.clone(),
        );
        *handle = Some(tokio::spawn(async move { worker.run_forever().await }));
        tracing::info!(worker_id = %self.worker_id, "worker runtime started");
    }

    /// Signal the loop to stop and wait for it to drain.
    pub async fn stop(&self) {
        let Some(handle) = self.handle.lock().take() else {
            return;
        };

        tracing::info!(worker_id = %self.worker_id, "stopping worker runtime");
        self.stop.cancel();
        if tokio::time::timeout(STOP_TIMEOUT, handle).await.is_err() {
            tracing::warn!(worker_id = %self.worker_id, "worker did not drain in time");
        }
        tracing::info!(worker_id = %self.worker_id, "worker runtime stopped");
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
