// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step failure channels.

use thiserror::Error;
use tt_core::PipelineError;

/// A failed pipeline step.
///
/// The two variants route differently in the worker: a `Pipeline` error is
/// deterministic and terminates the job, while an `Unexpected` error goes
/// through the retry/backoff policy before giving up.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("unexpected step failure: {0}")]
    Unexpected(String),
}

impl From<std::io::Error> for StepError {
    fn from(err: std::io::Error) -> Self {
        StepError::Unexpected(err.to_string())
    }
}
