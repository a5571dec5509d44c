// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::error::StepError;
use tt_core::{Clock, FakeClock, PipelineState};

struct Advances {
    to: PipelineState,
    clock: FakeClock,
}

#[async_trait]
impl StateHandler for Advances {
    async fn handle(&self, job: &mut Job) -> Result<(), StepError> {
        job.transition_to(self.to, self.clock.now());
        Ok(())
    }
}

struct Stalls;

#[async_trait]
impl StateHandler for Stalls {
    async fn handle(&self, _job: &mut Job) -> Result<(), StepError> {
        Ok(())
    }
}

fn job_in(state: PipelineState) -> Job {
    let mut job = Job::builder().build();
    job.current_state = state;
    job
}

#[tokio::test]
async fn step_invokes_registered_handler() {
    let clock = FakeClock::new();
    let mut pipeline = Pipeline::new();
    pipeline.register(
        PipelineState::Init,
        Box::new(Advances { to: PipelineState::ResolvingIdentity, clock: clock.clone() }),
    );

    let mut job = job_in(PipelineState::Init);
    pipeline.step(&mut job).await.unwrap();
    assert_eq!(job.current_state, PipelineState::ResolvingIdentity);
}

#[tokio::test]
async fn step_is_noop_on_terminal_states() {
    let pipeline = Pipeline::new();
    for state in [PipelineState::Finalized, PipelineState::Failed, PipelineState::Cancelled] {
        let mut job = job_in(state);
        let before = job.clone();
        pipeline.step(&mut job).await.unwrap();
        assert_eq!(job, before);
    }
}

#[tokio::test]
async fn step_is_noop_on_pause_states() {
    // No handler registered for pause states; a no-op must not be NO_HANDLER.
    let pipeline = Pipeline::new();
    for state in [PipelineState::UserIntentSelection, PipelineState::UserMetadataSelection] {
        let mut job = job_in(state);
        let before = job.clone();
        pipeline.step(&mut job).await.unwrap();
        assert_eq!(job, before);
    }
}

#[tokio::test]
async fn missing_handler_raises_no_handler() {
    let pipeline = Pipeline::new();
    let mut job = job_in(PipelineState::Downloading);

    let err = pipeline.step(&mut job).await.unwrap_err();
    match err {
        StepError::Pipeline(e) => assert_eq!(e.code, ErrorCode::NoHandler),
        other => panic!("expected pipeline error, got {other:?}"),
    }
}

#[tokio::test]
async fn stalling_handler_raises_no_state_change() {
    let mut pipeline = Pipeline::new();
    pipeline.register(PipelineState::Searching, Box::new(Stalls));

    let mut job = job_in(PipelineState::Searching);
    let err = pipeline.step(&mut job).await.unwrap_err();
    match err {
        StepError::Pipeline(e) => assert_eq!(e.code, ErrorCode::NoStateChange),
        other => panic!("expected pipeline error, got {other:?}"),
    }
}
