// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-step pipeline executor.

use crate::error::StepError;
use async_trait::async_trait;
use std::collections::HashMap;
use tt_core::{ErrorCode, Job, PipelineError, PipelineState};

/// A handler leaves exactly one state: it must transition the job, set a
/// pause state, or raise a [`PipelineError`].
#[async_trait]
pub trait StateHandler: Send + Sync {
    async fn handle(&self, job: &mut Job) -> Result<(), StepError>;
}

/// Registry from non-terminal states to their handlers.
pub struct Pipeline {
    handlers: HashMap<PipelineState, Box<dyn StateHandler>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self { handlers: HashMap::new() }
    }

    pub fn register(&mut self, state: PipelineState, handler: Box<dyn StateHandler>) {
        self.handlers.insert(state, handler);
    }

    /// Execute exactly one step.
    ///
    /// Terminal and pause states are no-ops (advancement of pause states is
    /// controller code, never a handler). A handler that returns without
    /// changing `current_state` is a contract violation surfaced as
    /// `NO_STATE_CHANGE`.
    pub async fn step(&self, job: &mut Job) -> Result<(), StepError> {
        let state = job.current_state;

        if state.is_terminal() || state.is_pause() {
            tracing::debug!(job_id = %job.job_id, state = %state, "step is a no-op");
            return Ok(());
        }

        let handler = self.handlers.get(&state).ok_or_else(|| {
            PipelineError::new(
                ErrorCode::NoHandler,
                format!("no handler registered for state {state}"),
            )
        })?;

        handler.handle(job).await?;

        if job.current_state == state {
            return Err(StepError::Pipeline(PipelineError::new(
                ErrorCode::NoStateChange,
                format!("handler for {state} did not advance the job"),
            )));
        }

        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
