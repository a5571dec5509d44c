// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::MemoryStore;
use serial_test::serial;

fn clear_env() {
    std::env::remove_var(MUSIC_LIBRARY_ROOT_ENV);
}

#[test]
#[serial]
fn db_value_wins() {
    clear_env();
    let store = MemoryStore::new();
    store.set_setting(MUSIC_LIBRARY_ROOT_KEY, "/persisted/music").unwrap();
    std::env::set_var(MUSIC_LIBRARY_ROOT_ENV, "/env/music");

    let (path, source) = resolve_library_root(&store).unwrap();
    assert_eq!(path, PathBuf::from("/persisted/music"));
    assert_eq!(source, SettingsSource::Db);

    clear_env();
}

#[test]
#[serial]
fn env_wins_over_default() {
    clear_env();
    let store = MemoryStore::new();
    std::env::set_var(MUSIC_LIBRARY_ROOT_ENV, "/env/music");

    let (path, source) = resolve_library_root(&store).unwrap();
    assert_eq!(path, PathBuf::from("/env/music"));
    assert_eq!(source, SettingsSource::Env);
    // Env-resolved values are not persisted.
    assert!(store.get_setting(MUSIC_LIBRARY_ROOT_KEY).unwrap().is_none());

    clear_env();
}

#[test]
#[serial]
fn default_is_written_back() {
    clear_env();
    let store = MemoryStore::new();

    let (path, source) = resolve_library_root(&store).unwrap();
    assert_eq!(source, SettingsSource::Default);
    assert!(path.ends_with("Music/TrueTrack"));

    let persisted = store.get_setting(MUSIC_LIBRARY_ROOT_KEY).unwrap().unwrap();
    assert_eq!(PathBuf::from(persisted), path);

    // Subsequent reads now come from the DB.
    let (_, source) = resolve_library_root(&store).unwrap();
    assert_eq!(source, SettingsSource::Db);
}

#[test]
#[serial]
fn set_rejects_relative_paths() {
    let store = MemoryStore::new();
    let err = set_library_root(&store, "relative/music").unwrap_err();
    assert!(matches!(err, SettingsError::NotAbsolute));
}

#[test]
#[serial]
fn set_creates_and_persists() {
    clear_env();
    let store = MemoryStore::new();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("library");

    let set = set_library_root(&store, &target.to_string_lossy()).unwrap();
    assert_eq!(set, target);
    assert!(target.is_dir());

    let (resolved, source) = resolve_library_root(&store).unwrap();
    assert_eq!(resolved, target);
    assert_eq!(source, SettingsSource::Db);
}

#[test]
fn settings_source_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&SettingsSource::Db).unwrap(), "\"db\"");
    assert_eq!(SettingsSource::Default.to_string(), "default");
}
