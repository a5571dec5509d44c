// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

fn candidate(title: &str, uploader: Option<&str>, duration: Option<u64>) -> SourceCandidate {
    SourceCandidate {
        title: title.into(),
        artists: vec![],
        album: None,
        video_id: "v".into(),
        duration,
        uploader: uploader.map(Into::into),
    }
}

#[yare::parameterized(
    official_audio  = { "Creep (Official Audio)", None, None, 40 },
    remaster        = { "Creep (2008 Remaster)", None, None, 5 },
    lyrics          = { "Creep (Lyrics)", None, None, -30 },
    live            = { "Creep (Live at Glastonbury)", None, None, -40 },
    full_album      = { "Pablo Honey (Full Album)", None, None, -100 },
    good_duration   = { "Creep", None, Some(320), 10 },
    too_long        = { "Creep", None, Some(1200), -80 },
    uploader_match  = { "Creep", Some("Radiohead Official"), None, 30 },
    stacked         = { "Creep (Official Audio)", Some("Radiohead"), Some(320), 80 },
)]
fn source_candidate_signals(title: &str, uploader: Option<&str>, duration: Option<u64>, expected: i32) {
    let (score, _) = score_source_candidate(&candidate(title, uploader, duration), "Radiohead");
    assert_eq!(score, expected);
}

#[test]
fn source_score_is_case_insensitive() {
    let (score, reasons) =
        score_source_candidate(&candidate("CREEP (OFFICIAL AUDIO)", Some("RADIOHEAD"), None), "radiohead");
    assert_eq!(score, 70);
    assert!(reasons.contains(&"official audio"));
    assert!(reasons.contains(&"uploader matches artist"));
}

#[test]
fn empty_artist_matches_any_uploader() {
    // Substring semantics: an empty expected artist is contained in every
    // uploader, including a missing one.
    let (score, _) = score_source_candidate(&candidate("Creep", Some("someone"), None), "");
    assert_eq!(score, 30);

    let (score, _) = score_source_candidate(&candidate("Creep", None, None), "");
    assert_eq!(score, 30);
}

#[yare::parameterized(
    full_match   = { json!({"trackName": "Creep", "artistName": "Radiohead", "trackTimeMillis": 238000}), 100 },
    title_only   = { json!({"trackName": "Creep", "artistName": "Someone Else"}), 40 },
    artist_only  = { json!({"trackName": "Other", "artistName": "Radiohead"}), 40 },
    duration_off = { json!({"trackName": "Creep", "artistName": "Radiohead", "trackTimeMillis": 250000}), 80 },
    substring    = { json!({"trackName": "Creep (Remastered)", "artistName": "Radiohead & Friends"}), 80 },
    nothing      = { json!({}), 0 },
)]
fn metadata_signals(result: serde_json::Value, expected: i32) {
    let (score, _) = score_metadata(&result, "Creep", "Radiohead", Some(239));
    assert_eq!(score, expected);
}

#[test]
fn duration_boundary_is_strict() {
    // |243 - 239| = 4 → within 5
    let close = json!({"trackTimeMillis": 243_000});
    assert_eq!(score_metadata(&close, "no such title", "no such artist", Some(239)).0, 20);

    // |244 - 239| = 5 → not strictly within 5
    let edge = json!({"trackTimeMillis": 244_000});
    assert_eq!(score_metadata(&edge, "no such title", "no such artist", Some(239)).0, 0);
}

#[test]
fn empty_expected_fields_match_everything() {
    let result = json!({"trackName": "Anything", "artistName": "Anyone"});
    assert_eq!(score_metadata(&result, "", "", None).0, 80);
}

#[test]
fn missing_duration_skips_signal() {
    let result = json!({"trackName": "Creep", "artistName": "Radiohead"});
    assert_eq!(score_metadata(&result, "Creep", "Radiohead", None).0, 80);
}

#[test]
fn equal_scores_preserve_input_order_under_stable_sort() {
    let a = json!({"trackName": "Creep", "artistName": "Radiohead", "id": 1});
    let b = json!({"trackName": "Creep", "artistName": "Radiohead", "id": 2});
    let mut ranked: Vec<_> = [a.clone(), b.clone()]
        .into_iter()
        .map(|c| {
            let (score, _) = score_metadata(&c, "Creep", "Radiohead", None);
            (score, c)
        })
        .collect();
    ranked.sort_by_key(|(score, _)| std::cmp::Reverse(*score));

    assert_eq!(ranked[0].1, a);
    assert_eq!(ranked[1].1, b);
}
