// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job temporary workspaces.
//!
//! Every step that touches the filesystem gets a freshly wiped directory.
//! The wipe-and-recreate policy assumes a single worker per job at a time,
//! which the job lock enforces.

use std::io;
use std::path::{Path, PathBuf};
use tt_core::{Job, JobId};

/// Root for all per-job temp directories.
pub fn base_dir() -> PathBuf {
    std::env::temp_dir().join("truetrack")
}

/// The temp directory owned by one job.
pub fn job_dir(job_id: &JobId) -> PathBuf {
    base_dir().join(job_id.as_str())
}

/// Wipe and recreate the job's temp directory.
pub fn ensure_fresh(job_id: &JobId) -> io::Result<PathBuf> {
    let dir = job_dir(job_id);
    if dir.exists() {
        std::fs::remove_dir_all(&dir)?;
    }
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Preserve one file across a workspace wipe.
///
/// The file is stashed outside the wipe path, the directory is recreated,
/// and the file is restored to its original location.
pub fn stash_and_reset(job_id: &JobId, file: &Path) -> io::Result<()> {
    let name = file
        .file_name()
        .ok_or_else(|| io::Error::other("stash source has no file name"))?
        .to_owned();

    let stash_dir = base_dir().join(format!("{}.stash", job_id.as_str()));
    std::fs::create_dir_all(&stash_dir)?;
    let stashed = stash_dir.join(&name);

    move_file(file, &stashed)?;
    ensure_fresh(job_id)?;
    move_file(&stashed, file)?;
    std::fs::remove_dir_all(&stash_dir)?;
    Ok(())
}

/// Best-effort removal of a job's temp directory; failure is logged only.
pub fn cleanup(job: &Job) {
    let Some(dir) = &job.temp_dir else {
        return;
    };
    if !dir.exists() {
        return;
    }
    match std::fs::remove_dir_all(dir) {
        Ok(()) => tracing::debug!(job_id = %job.job_id, dir = %dir.display(), "temp dir removed"),
        Err(e) => {
            tracing::warn!(job_id = %job.job_id, dir = %dir.display(), error = %e, "temp dir cleanup failed");
        }
    }
}

/// Move a file, falling back to copy+remove across filesystems.
pub fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match std::fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) => {
            std::fs::copy(from, to)?;
            std::fs::remove_file(from)
        }
    }
}

/// Strip characters that are unsafe in library filenames.
pub fn safe_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
