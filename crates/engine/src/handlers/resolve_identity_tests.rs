// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::error::StepError;
use crate::pipeline::StateHandler;
use crate::test_support::created_job;
use tt_adapters::FakeIdentity;
use tt_core::{FakeClock, JobOptions, SourceCandidate};

fn handler(identity: FakeIdentity, clock: &FakeClock) -> ResolveIdentityHandler {
    ResolveIdentityHandler::new(Arc::new(identity), Arc::new(clock.clone()))
}

#[tokio::test]
async fn unambiguous_result_adopts_top_candidate() {
    let clock = FakeClock::new();
    let mut job = created_job(&clock, "radiohead - creep", JobOptions::default());
    let identity = FakeIdentity::with_candidates(vec![
        FakeIdentity::candidate("Creep", "Radiohead", "abc123"),
        FakeIdentity::candidate("Creep (Live)", "Radiohead", "def456"),
    ]);

    handler(identity, &clock).handle(&mut job).await.unwrap();

    assert_eq!(job.current_state, PipelineState::Searching);
    let hint = job.identity_hint.unwrap();
    assert_eq!(hint.title, "Creep");
    assert_eq!(hint.video_id, "abc123");
    assert_eq!(hint.confidence, 80);
    assert_eq!(job.source_candidates.len(), 2);
}

#[tokio::test]
async fn ask_option_always_pauses() {
    let clock = FakeClock::new();
    let options = JobOptions { ask: true, ..JobOptions::default() };
    let mut job = created_job(&clock, "radiohead - creep", options);
    let identity =
        FakeIdentity::with_candidates(vec![FakeIdentity::candidate("Creep", "Radiohead", "abc")]);

    handler(identity, &clock).handle(&mut job).await.unwrap();

    assert_eq!(job.current_state, PipelineState::UserIntentSelection);
    assert!(job.identity_hint.is_none());
}

#[tokio::test]
async fn ambiguous_result_pauses() {
    let clock = FakeClock::new();
    // The query names no artist of the top candidate.
    let mut job = created_job(&clock, "creep song", JobOptions::default());
    let identity = FakeIdentity::with_candidates(vec![
        FakeIdentity::candidate("Creep", "Radiohead", "abc"),
        FakeIdentity::candidate("Creep", "Stone Temple Pilots", "def"),
    ]);

    handler(identity, &clock).handle(&mut job).await.unwrap();
    assert_eq!(job.current_state, PipelineState::UserIntentSelection);
}

#[tokio::test]
async fn single_candidate_is_never_ambiguous() {
    let clock = FakeClock::new();
    let mut job = created_job(&clock, "creep song", JobOptions::default());
    let identity =
        FakeIdentity::with_candidates(vec![FakeIdentity::candidate("Creep", "Radiohead", "abc")]);

    handler(identity, &clock).handle(&mut job).await.unwrap();
    assert_eq!(job.current_state, PipelineState::Searching);
}

#[tokio::test]
async fn artist_match_is_case_insensitive() {
    let clock = FakeClock::new();
    let mut job = created_job(&clock, "RADIOHEAD creep", JobOptions::default());
    let identity = FakeIdentity::with_candidates(vec![
        FakeIdentity::candidate("Creep", "Radiohead", "abc"),
        FakeIdentity::candidate("Creep", "Someone Else", "def"),
    ]);

    handler(identity, &clock).handle(&mut job).await.unwrap();
    assert_eq!(job.current_state, PipelineState::Searching);
}

#[tokio::test]
async fn empty_results_raise_no_results() {
    let clock = FakeClock::new();
    let mut job = created_job(&clock, "unknown song xyz", JobOptions::default());

    let err = handler(FakeIdentity::empty(), &clock).handle(&mut job).await.unwrap_err();
    match err {
        StepError::Pipeline(e) => {
            assert_eq!(e.code, ErrorCode::NoResults);
            assert_eq!(e.category, Some(tt_core::ErrorCategory::Content));
        }
        other => panic!("expected pipeline error, got {other:?}"),
    }
}

#[tokio::test]
async fn provider_failure_raises_transient_ytmusic_error() {
    let clock = FakeClock::new();
    let mut job = created_job(&clock, "radiohead - creep", JobOptions::default());

    let err = handler(FakeIdentity::failing(), &clock).handle(&mut job).await.unwrap_err();
    match err {
        StepError::Pipeline(e) => {
            assert_eq!(e.code, ErrorCode::YtmusicError);
            assert_eq!(e.category, Some(tt_core::ErrorCategory::Transient));
        }
        other => panic!("expected pipeline error, got {other:?}"),
    }
}

#[tokio::test]
async fn keeps_at_most_five_candidates() {
    let clock = FakeClock::new();
    let mut job = created_job(&clock, "radiohead - creep", JobOptions::default());
    let many: Vec<SourceCandidate> = (0..8)
        .map(|i| FakeIdentity::candidate("Creep", "Radiohead", &format!("v{i}")))
        .collect();

    handler(FakeIdentity::with_candidates(many), &clock).handle(&mut job).await.unwrap();
    assert_eq!(job.source_candidates.len(), SOURCE_CANDIDATE_LIMIT);
}
