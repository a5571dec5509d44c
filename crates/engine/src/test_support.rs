// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for engine tests.

use crate::handlers::PipelineDeps;
use serde_json::json;
use std::sync::Arc;
use tt_adapters::{FakeArt, FakeDownloader, FakeIdentity, FakeMetadata, FakeTagger, FakeTranscoder};
use tt_core::{Clock, FakeClock, Job, JobOptions};
use tt_storage::{JobStore, MemoryStore, MUSIC_LIBRARY_ROOT_KEY};

/// A metadata record that scores 100 against the default test identity.
pub(crate) fn creep_metadata() -> serde_json::Value {
    json!({
        "trackName": "Creep",
        "artistName": "Radiohead",
        "collectionName": "Pablo Honey",
        "trackTimeMillis": 238_000,
        "trackNumber": 2,
        "releaseDate": "1993-02-22T08:00:00Z",
        "artworkUrl100": "https://example.invalid/art/100x100bb.jpg"
    })
}

/// Deps where every collaborator succeeds and the library root points into
/// a temp directory owned by the caller.
pub(crate) fn happy_deps(
    store: Arc<MemoryStore>,
    clock: &FakeClock,
    library_root: &std::path::Path,
) -> PipelineDeps {
    store
        .set_setting(MUSIC_LIBRARY_ROOT_KEY, &library_root.to_string_lossy())
        .unwrap();

    PipelineDeps {
        identity: Arc::new(FakeIdentity::with_candidates(vec![FakeIdentity::candidate(
            "Creep", "Radiohead", "abc123",
        )])),
        downloader: Arc::new(FakeDownloader::single_file()),
        transcoder: Arc::new(FakeTranscoder::new()),
        metadata: Arc::new(FakeMetadata::with_results(vec![creep_metadata()])),
        art: Arc::new(FakeArt::none()),
        tagger: Arc::new(FakeTagger::new()),
        store,
        clock: Arc::new(clock.clone()),
    }
}

/// A job created the way the HTTP layer creates one.
pub(crate) fn created_job(clock: &FakeClock, query: &str, options: JobOptions) -> Job {
    let mut job = Job::new(query, options, clock.now());
    job.transition_to(tt_core::PipelineState::ResolvingIdentity, clock.now());
    job
}
