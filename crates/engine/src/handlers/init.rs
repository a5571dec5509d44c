// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::StepError;
use crate::pipeline::StateHandler;
use async_trait::async_trait;
use std::sync::Arc;
use tt_core::{Clock, Job, PipelineState};

pub struct InitHandler {
    clock: Arc<dyn Clock>,
}

impl InitHandler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl StateHandler for InitHandler {
    async fn handle(&self, job: &mut Job) -> Result<(), StepError> {
        job.emit("starting ingest");
        job.transition_to(PipelineState::ResolvingIdentity, self.clock.now());
        Ok(())
    }
}
