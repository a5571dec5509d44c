// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tt-core: Core library for the TrueTrack music-ingest engine

pub mod macros;

pub mod clock;
pub mod error;
pub mod id;
pub mod job;
pub mod scoring;
pub mod state;

pub use clock::{Clock, FakeClock, SystemClock};
pub use error::{ErrorCategory, ErrorCode, PipelineError};
pub use id::JobId;
#[cfg(any(test, feature = "test-support"))]
pub use job::JobBuilder;
pub use job::{
    IdentityHint, Job, JobOptions, JobResult, SelectedSource, SourceCandidate, StateRecord,
    StepDisposition, MAX_STATE_HISTORY,
};
pub use scoring::{score_metadata, score_source_candidate};
pub use state::PipelineState;
