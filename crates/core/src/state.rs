// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline state machine vocabulary.

use serde::{Deserialize, Serialize};

/// State of an ingest job's pipeline.
///
/// Serialized by name (`RESOLVING_IDENTITY`, …). Terminal states are never
/// left; pause states (name prefixed `USER_`) advance only through
/// controller input, never through the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineState {
    Init,
    ResolvingIdentity,
    UserIntentSelection,
    Searching,
    Downloading,
    Extracting,
    MatchingMetadata,
    UserMetadataSelection,
    Tagging,
    Storing,
    Archiving,
    Finalized,
    Failed,
    Cancelled,
}

impl PipelineState {
    /// The wire/persistence name of this state.
    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::Init => "INIT",
            PipelineState::ResolvingIdentity => "RESOLVING_IDENTITY",
            PipelineState::UserIntentSelection => "USER_INTENT_SELECTION",
            PipelineState::Searching => "SEARCHING",
            PipelineState::Downloading => "DOWNLOADING",
            PipelineState::Extracting => "EXTRACTING",
            PipelineState::MatchingMetadata => "MATCHING_METADATA",
            PipelineState::UserMetadataSelection => "USER_METADATA_SELECTION",
            PipelineState::Tagging => "TAGGING",
            PipelineState::Storing => "STORING",
            PipelineState::Archiving => "ARCHIVING",
            PipelineState::Finalized => "FINALIZED",
            PipelineState::Failed => "FAILED",
            PipelineState::Cancelled => "CANCELLED",
        }
    }

    /// Terminal states are never mutated again except to release a lock.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PipelineState::Finalized | PipelineState::Failed | PipelineState::Cancelled
        )
    }

    /// Pause states require controller input to advance.
    pub fn is_pause(&self) -> bool {
        self.name().starts_with("USER_")
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
