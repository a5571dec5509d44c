// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn tag_set_from_full_metadata() {
    let metadata = json!({
        "trackName": "Creep",
        "artistName": "Radiohead",
        "collectionName": "Pablo Honey",
        "trackNumber": 2,
        "releaseDate": "1993-02-22T08:00:00Z"
    });

    let tags = TagSet::from_metadata(&metadata);
    assert_eq!(tags.title.as_deref(), Some("Creep"));
    assert_eq!(tags.artist.as_deref(), Some("Radiohead"));
    assert_eq!(tags.album.as_deref(), Some("Pablo Honey"));
    assert_eq!(tags.track, Some(2));
    assert_eq!(tags.year.as_deref(), Some("1993"));
}

#[test]
fn tag_set_tolerates_sparse_metadata() {
    let tags = TagSet::from_metadata(&json!({"trackName": "Creep"}));
    assert_eq!(tags.title.as_deref(), Some("Creep"));
    assert!(tags.artist.is_none());
    assert!(tags.album.is_none());
    assert!(tags.track.is_none());
    assert!(tags.year.is_none());
}

#[test]
fn short_release_date_is_kept_verbatim() {
    let tags = TagSet::from_metadata(&json!({"releaseDate": "93"}));
    assert_eq!(tags.year.as_deref(), Some("93"));
}
