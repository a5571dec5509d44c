// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn defaults_apply_when_unset() {
    std::env::remove_var("TRUETRACK_HOST");
    std::env::remove_var("TRUETRACK_PORT");
    std::env::remove_var("TRUETRACK_LOG_LEVEL");

    assert_eq!(host(), "127.0.0.1");
    assert_eq!(port(), 8000);
    assert_eq!(log_level(), "info");
}

#[test]
#[serial]
fn env_overrides_apply() {
    std::env::set_var("TRUETRACK_HOST", "0.0.0.0");
    std::env::set_var("TRUETRACK_PORT", "9100");
    std::env::set_var("TRUETRACK_LOG_LEVEL", "debug");

    assert_eq!(host(), "0.0.0.0");
    assert_eq!(port(), 9100);
    assert_eq!(log_level(), "debug");

    std::env::remove_var("TRUETRACK_HOST");
    std::env::remove_var("TRUETRACK_PORT");
    std::env::remove_var("TRUETRACK_LOG_LEVEL");
}

#[test]
#[serial]
fn unparseable_port_falls_back() {
    std::env::set_var("TRUETRACK_PORT", "not-a-port");
    assert_eq!(port(), 8000);
    std::env::remove_var("TRUETRACK_PORT");
}

#[test]
#[serial]
fn db_path_is_required() {
    std::env::remove_var("TRUETRACK_DB_PATH");
    assert!(db_path().is_err());

    std::env::set_var("TRUETRACK_DB_PATH", "/var/lib/truetrack/jobs.db");
    assert_eq!(db_path().unwrap(), std::path::PathBuf::from("/var/lib/truetrack/jobs.db"));
    std::env::remove_var("TRUETRACK_DB_PATH");
}

#[test]
#[serial]
fn allowed_origins_parse_and_default() {
    std::env::remove_var("ALLOWED_ORIGINS");
    assert_eq!(allowed_origins("127.0.0.1", 8000), vec!["http://127.0.0.1:8000".to_string()]);

    std::env::set_var("ALLOWED_ORIGINS", "http://a.test, http://b.test ,");
    assert_eq!(
        allowed_origins("127.0.0.1", 8000),
        vec!["http://a.test".to_string(), "http://b.test".to_string()]
    );
    std::env::remove_var("ALLOWED_ORIGINS");
}
