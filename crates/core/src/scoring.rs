// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic integer scoring for source and metadata candidates.
//!
//! Both scorers return the matched signal names alongside the score so
//! callers can log why a candidate ranked where it did. All comparisons
//! are case-insensitive substring checks, so an empty expected value
//! matches every candidate; ties preserve input order (callers sort
//! stably).

use crate::job::SourceCandidate;

/// Score a media source candidate against the expected artist.
pub fn score_source_candidate(
    candidate: &SourceCandidate,
    artist: &str,
) -> (i32, Vec<&'static str>) {
    let mut score = 0;
    let mut reasons = Vec::new();

    let title = candidate.title.to_lowercase();
    let uploader = candidate.uploader.as_deref().unwrap_or("").to_lowercase();
    let duration = candidate.duration.unwrap_or(0);
    let artist = artist.to_lowercase();

    // uploader signal
    if uploader.contains(&artist) {
        score += 30;
        reasons.push("uploader matches artist");
    }

    // title signals
    if title.contains("official audio") {
        score += 40;
        reasons.push("official audio");
    }
    if title.contains("remaster") {
        score += 5;
        reasons.push("remaster");
    }
    if title.contains("lyrics") {
        score -= 30;
        reasons.push("lyrics video");
    }
    if title.contains("live") {
        score -= 40;
        reasons.push("live version");
    }
    if title.contains("full album") {
        score -= 100;
        reasons.push("full album");
    }

    // duration signals
    if (300..=500).contains(&duration) {
        score += 10;
        reasons.push("expected song duration");
    }
    if duration > 900 {
        score -= 80;
        reasons.push("suspiciously long duration");
    }

    (score, reasons)
}

/// Score a canonical metadata record against the resolved identity.
///
/// `result` is the raw search payload (`trackName`, `artistName`,
/// `trackTimeMillis`). The duration signal only fires when both sides
/// report a duration.
pub fn score_metadata(
    result: &serde_json::Value,
    expected_title: &str,
    expected_artist: &str,
    expected_duration_s: Option<u64>,
) -> (i32, Vec<&'static str>) {
    let mut score = 0;
    let mut reasons = Vec::new();

    let track_name = result
        .get("trackName")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("")
        .to_lowercase();
    if track_name.contains(&expected_title.to_lowercase()) {
        score += 40;
        reasons.push("title match");
    }

    let artist_name = result
        .get("artistName")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("")
        .to_lowercase();
    if artist_name.contains(&expected_artist.to_lowercase()) {
        score += 40;
        reasons.push("artist match");
    }

    let actual_ms = result.get("trackTimeMillis").and_then(serde_json::Value::as_f64);
    if let (Some(actual_ms), Some(expected_s)) = (actual_ms, expected_duration_s) {
        if (actual_ms / 1000.0 - expected_s as f64).abs() < 5.0 {
            score += 20;
            reasons.push("duration match");
        }
    }

    (score, reasons)
}

#[cfg(test)]
#[path = "scoring_tests.rs"]
mod tests;
