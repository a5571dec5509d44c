// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::pipeline::StateHandler;
use crate::test_support::{created_job, creep_metadata};
use std::sync::Arc;
use tt_adapters::{FakeArt, FakeTagger};
use tt_core::{FakeClock, JobOptions};

fn job_ready_for_tagging(clock: &FakeClock, dir: &std::path::Path) -> Job {
    let mut job = created_job(clock, "radiohead - creep", JobOptions::default());
    let file = dir.join("Creep.mp3");
    std::fs::write(&file, b"mp3").unwrap();
    job.extracted_file = Some(file);
    job.final_metadata = Some(creep_metadata());
    job.current_state = PipelineState::Tagging;
    job
}

#[tokio::test]
async fn writes_tags_from_metadata_and_advances() {
    let clock = FakeClock::new();
    let dir = tempfile::tempdir().unwrap();
    let mut job = job_ready_for_tagging(&clock, dir.path());
    let tagger = Arc::new(FakeTagger::new());

    TaggingHandler::new(tagger.clone(), Arc::new(FakeArt::none()), Arc::new(clock.clone()))
        .handle(&mut job)
        .await
        .unwrap();

    assert_eq!(job.current_state, PipelineState::Storing);
    let written = tagger.written.lock();
    assert_eq!(written.len(), 1);
    let (_, tags) = &written[0];
    assert_eq!(tags.title.as_deref(), Some("Creep"));
    assert_eq!(tags.artist.as_deref(), Some("Radiohead"));
    assert_eq!(tags.album.as_deref(), Some("Pablo Honey"));
    assert_eq!(tags.track, Some(2));
    assert_eq!(tags.year.as_deref(), Some("1993"));
}

#[tokio::test]
async fn embeds_art_when_available() {
    let clock = FakeClock::new();
    let dir = tempfile::tempdir().unwrap();
    let mut job = job_ready_for_tagging(&clock, dir.path());
    let tagger = Arc::new(FakeTagger::new());

    TaggingHandler::new(
        tagger.clone(),
        Arc::new(FakeArt::with_image(b"jpeg".to_vec())),
        Arc::new(clock.clone()),
    )
    .handle(&mut job)
    .await
    .unwrap();

    assert_eq!(tagger.art_embeds.lock().len(), 1);
}

#[tokio::test]
async fn art_fetch_failure_is_swallowed() {
    let clock = FakeClock::new();
    let dir = tempfile::tempdir().unwrap();
    let mut job = job_ready_for_tagging(&clock, dir.path());

    TaggingHandler::new(
        Arc::new(FakeTagger::new()),
        Arc::new(FakeArt::failing()),
        Arc::new(clock.clone()),
    )
    .handle(&mut job)
    .await
    .unwrap();

    assert_eq!(job.current_state, PipelineState::Storing);
}

#[tokio::test]
async fn art_embed_failure_is_swallowed() {
    let clock = FakeClock::new();
    let dir = tempfile::tempdir().unwrap();
    let mut job = job_ready_for_tagging(&clock, dir.path());

    TaggingHandler::new(
        Arc::new(FakeTagger::failing_art()),
        Arc::new(FakeArt::with_image(b"jpeg".to_vec())),
        Arc::new(clock.clone()),
    )
    .handle(&mut job)
    .await
    .unwrap();

    assert_eq!(job.current_state, PipelineState::Storing);
}

#[tokio::test]
async fn tag_write_failure_fails_the_step() {
    let clock = FakeClock::new();
    let dir = tempfile::tempdir().unwrap();
    let mut job = job_ready_for_tagging(&clock, dir.path());

    let err = TaggingHandler::new(
        Arc::new(FakeTagger::failing_tags()),
        Arc::new(FakeArt::none()),
        Arc::new(clock.clone()),
    )
    .handle(&mut job)
    .await
    .unwrap_err();

    match err {
        StepError::Pipeline(e) => {
            assert_eq!(e.code, ErrorCode::ExternalToolError);
            assert_eq!(e.tool.as_deref(), Some("ffmpeg"));
        }
        other => panic!("expected pipeline error, got {other:?}"),
    }
}
