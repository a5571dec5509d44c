// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("TRUETRACK_DB_PATH is required but not set")]
    MissingDbPath,
}

/// Bind host (default loopback).
pub fn host() -> String {
    std::env::var("TRUETRACK_HOST").unwrap_or_else(|_| "127.0.0.1".to_string())
}

/// Bind port (default 8000).
pub fn port() -> u16 {
    std::env::var("TRUETRACK_PORT").ok().and_then(|s| s.parse().ok()).unwrap_or(8000)
}

/// Log filter directive (default "info").
pub fn log_level() -> String {
    std::env::var("TRUETRACK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string())
}

/// Path to the durable store. Required.
pub fn db_path() -> Result<PathBuf, EnvError> {
    std::env::var("TRUETRACK_DB_PATH")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .ok_or(EnvError::MissingDbPath)
}

/// CORS allow-list; defaults to the server's own origin.
pub fn allowed_origins(host: &str, port: u16) -> Vec<String> {
    match std::env::var("ALLOWED_ORIGINS") {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.split(',').map(|o| o.trim().to_string()).filter(|o| !o.is_empty()).collect()
        }
        _ => vec![format!("http://{host}:{port}")],
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
