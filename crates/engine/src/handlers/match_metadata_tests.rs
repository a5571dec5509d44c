// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::pipeline::StateHandler;
use crate::test_support::{created_job, creep_metadata};
use serde_json::json;
use std::sync::Arc;
use tt_adapters::{FakeIdentity, FakeMetadata};
use tt_core::{FakeClock, IdentityHint, JobOptions};

fn job_with_identity(clock: &FakeClock, options: JobOptions) -> Job {
    let mut job = created_job(clock, "radiohead - creep", options);
    let candidate = FakeIdentity::candidate("Creep", "Radiohead", "abc123");
    job.identity_hint = Some(IdentityHint::from_candidate(&candidate, 80));
    job.current_state = PipelineState::MatchingMetadata;
    job
}

fn handler(metadata: FakeMetadata, clock: &FakeClock) -> MatchingMetadataHandler {
    MatchingMetadataHandler::new(Arc::new(metadata), Arc::new(clock.clone()))
}

#[tokio::test]
async fn force_archive_skips_matching() {
    let clock = FakeClock::new();
    let options = JobOptions { force_archive: true, ..JobOptions::default() };
    let mut job = job_with_identity(&clock, options);
    let metadata = FakeMetadata::with_results(vec![creep_metadata()]);
    let calls = Arc::new(metadata);

    MatchingMetadataHandler::new(calls.clone(), Arc::new(clock.clone()))
        .handle(&mut job)
        .await
        .unwrap();

    assert_eq!(job.current_state, PipelineState::Archiving);
    assert_eq!(calls.calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn network_failure_recovers_to_archiving() {
    let clock = FakeClock::new();
    let mut job = job_with_identity(&clock, JobOptions::default());

    handler(FakeMetadata::failing(), &clock).handle(&mut job).await.unwrap();
    assert_eq!(job.current_state, PipelineState::Archiving);
    assert!(job.error_code.is_none());
}

#[tokio::test]
async fn empty_results_recover_to_archiving() {
    let clock = FakeClock::new();
    let mut job = job_with_identity(&clock, JobOptions::default());

    handler(FakeMetadata::empty(), &clock).handle(&mut job).await.unwrap();
    assert_eq!(job.current_state, PipelineState::Archiving);
}

#[tokio::test]
async fn confident_match_advances_to_tagging() {
    let clock = FakeClock::new();
    let mut job = job_with_identity(&clock, JobOptions::default());

    handler(FakeMetadata::with_results(vec![creep_metadata()]), &clock)
        .handle(&mut job)
        .await
        .unwrap();

    assert_eq!(job.current_state, PipelineState::Tagging);
    assert_eq!(job.metadata_confidence, Some(100));
    let top = job.final_metadata.unwrap();
    assert_eq!(top.get("trackName").and_then(serde_json::Value::as_str), Some("Creep"));
    assert_eq!(top.get("_score").and_then(serde_json::Value::as_i64), Some(100));
}

#[tokio::test]
async fn candidates_are_ranked_descending() {
    let clock = FakeClock::new();
    let mut job = job_with_identity(&clock, JobOptions::default());
    let weak = json!({"trackName": "Other Song", "artistName": "Radiohead"});
    let strong = creep_metadata();

    handler(FakeMetadata::with_results(vec![weak, strong]), &clock)
        .handle(&mut job)
        .await
        .unwrap();

    let scores: Vec<i64> = job
        .metadata_candidates
        .iter()
        .map(|c| c.get("_score").and_then(serde_json::Value::as_i64).unwrap())
        .collect();
    assert_eq!(scores, vec![100, 40]);
}

#[tokio::test]
async fn score_59_pauses_for_selection() {
    let clock = FakeClock::new();
    let mut job = job_with_identity(&clock, JobOptions::default());
    // Artist match only: 40 < 60.
    let low = json!({"trackName": "Different", "artistName": "Radiohead"});

    handler(FakeMetadata::with_results(vec![low]), &clock).handle(&mut job).await.unwrap();

    assert_eq!(job.current_state, PipelineState::UserMetadataSelection);
    assert!(job.metadata_confidence.unwrap() < METADATA_CONFIDENCE_FLOOR);
}

#[tokio::test]
async fn score_60_proceeds_to_tagging() {
    let clock = FakeClock::new();
    let mut job = job_with_identity(&clock, JobOptions::default());
    // Title match (40) + duration match (20) = exactly the floor.
    let boundary = json!({"trackName": "Creep", "artistName": "Nobody", "trackTimeMillis": 238_000});

    handler(FakeMetadata::with_results(vec![boundary]), &clock).handle(&mut job).await.unwrap();

    assert_eq!(job.current_state, PipelineState::Tagging);
    assert_eq!(job.metadata_confidence, Some(60));
}

#[tokio::test]
async fn equal_scores_keep_input_order() {
    let clock = FakeClock::new();
    let mut job = job_with_identity(&clock, JobOptions::default());
    let first = json!({"trackName": "Creep", "artistName": "Radiohead", "id": "first"});
    let second = json!({"trackName": "Creep", "artistName": "Radiohead", "id": "second"});

    handler(FakeMetadata::with_results(vec![first, second]), &clock)
        .handle(&mut job)
        .await
        .unwrap();

    let top = job.final_metadata.unwrap();
    assert_eq!(top.get("id").and_then(serde_json::Value::as_str), Some("first"));
}

#[tokio::test]
async fn missing_identity_raises_no_identity() {
    let clock = FakeClock::new();
    let mut job = created_job(&clock, "radiohead - creep", JobOptions::default());
    job.current_state = PipelineState::MatchingMetadata;

    let err = handler(FakeMetadata::empty(), &clock).handle(&mut job).await.unwrap_err();
    match err {
        StepError::Pipeline(e) => assert_eq!(e.code, ErrorCode::NoIdentity),
        other => panic!("expected pipeline error, got {other:?}"),
    }
}
