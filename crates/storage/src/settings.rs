// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! DB-backed application settings.
//!
//! The music library root resolves DB → environment → OS default; the
//! default is written back so later reads are stable even if the
//! environment changes.

use crate::{JobStore, StoreError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MUSIC_LIBRARY_ROOT_KEY: &str = "music_library_root";

/// Environment override for the library root.
pub const MUSIC_LIBRARY_ROOT_ENV: &str = "MUSIC_LIBRARY_ROOT";

/// Where a resolved setting came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsSource {
    Db,
    Env,
    Default,
}

tt_core::simple_display! {
    SettingsSource {
        Db => "db",
        Env => "env",
        Default => "default",
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("path must be absolute")]
    NotAbsolute,
    #[error("cannot create directory: {0}")]
    Create(std::io::Error),
    #[error("directory is not writable: {0}")]
    NotWritable(std::io::Error),
    #[error("no home directory available for the default library root")]
    NoHome,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resolve the music library root and report its source.
///
/// Order: persisted DB setting → `MUSIC_LIBRARY_ROOT` → `<home>/Music/
/// TrueTrack`. When the default is used it is persisted to the DB.
pub fn resolve_library_root(
    store: &dyn JobStore,
) -> Result<(PathBuf, SettingsSource), SettingsError> {
    if let Some(value) = store.get_setting(MUSIC_LIBRARY_ROOT_KEY)? {
        return Ok((PathBuf::from(value), SettingsSource::Db));
    }

    if let Ok(value) = std::env::var(MUSIC_LIBRARY_ROOT_ENV) {
        if !value.is_empty() {
            return Ok((PathBuf::from(value), SettingsSource::Env));
        }
    }

    let home = dirs::home_dir().ok_or(SettingsError::NoHome)?;
    let default = home.join("Music").join("TrueTrack");
    store.set_setting(MUSIC_LIBRARY_ROOT_KEY, &default.to_string_lossy())?;
    tracing::info!(path = %default.display(), "library root defaulted and persisted");
    Ok((default, SettingsSource::Default))
}

/// Set and persist the music library root.
///
/// Requires an absolute path; creates the directory if missing and proves
/// writability with a probe file before persisting.
pub fn set_library_root(store: &dyn JobStore, path: &str) -> Result<PathBuf, SettingsError> {
    let path = PathBuf::from(path);
    if !path.is_absolute() {
        return Err(SettingsError::NotAbsolute);
    }

    if !path.exists() {
        std::fs::create_dir_all(&path).map_err(SettingsError::Create)?;
    }
    probe_writable(&path).map_err(SettingsError::NotWritable)?;

    store.set_setting(MUSIC_LIBRARY_ROOT_KEY, &path.to_string_lossy())?;
    tracing::info!(path = %path.display(), "library root updated");
    Ok(path)
}

fn probe_writable(dir: &Path) -> std::io::Result<()> {
    let probe = dir.join(".truetrack-write-probe");
    std::fs::write(&probe, b"")?;
    std::fs::remove_file(&probe)
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
