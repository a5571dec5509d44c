// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline error taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse failure category attached to a [`PipelineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// Likely to succeed on a later attempt (network hiccups, rate limits).
    Transient,
    /// The content itself is the problem (no results, no usable file).
    Content,
    /// A required external dependency is broken or missing.
    Dependency,
}

crate::simple_display! {
    ErrorCategory {
        Transient => "TRANSIENT",
        Content => "CONTENT",
        Dependency => "DEPENDENCY",
    }
}

/// Stable machine-readable error codes surfaced over the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NoResults,
    NoIdentity,
    NoFile,
    FileExists,
    LowConfidence,
    NoHandler,
    NoStateChange,
    UserAbort,
    ExternalToolNotFound,
    ExternalToolError,
    YtmusicError,
    MaxRetriesExceeded,
    Cancelled,
}

crate::simple_display! {
    ErrorCode {
        NoResults => "NO_RESULTS",
        NoIdentity => "NO_IDENTITY",
        NoFile => "NO_FILE",
        FileExists => "FILE_EXISTS",
        LowConfidence => "LOW_CONFIDENCE",
        NoHandler => "NO_HANDLER",
        NoStateChange => "NO_STATE_CHANGE",
        UserAbort => "USER_ABORT",
        ExternalToolNotFound => "EXTERNAL_TOOL_NOT_FOUND",
        ExternalToolError => "EXTERNAL_TOOL_ERROR",
        YtmusicError => "YTMUSIC_ERROR",
        MaxRetriesExceeded => "MAX_RETRIES_EXCEEDED",
        Cancelled => "CANCELLED",
    }
}

/// Structured failure raised by state handlers and the step executor.
///
/// A `PipelineError` terminates the job; anything a handler expects to be
/// retried must surface through the worker's unexpected-error channel
/// instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct PipelineError {
    pub code: ErrorCode,
    pub message: String,
    pub category: Option<ErrorCategory>,
    pub tool: Option<String>,
}

impl PipelineError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), category: None, tool: None }
    }

    pub fn transient(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(code, message).category(ErrorCategory::Transient)
    }

    pub fn content(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(code, message).category(ErrorCategory::Content)
    }

    pub fn dependency(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(code, message).category(ErrorCategory::Dependency)
    }

    pub fn category(mut self, category: ErrorCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = Some(tool.into());
        self
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
