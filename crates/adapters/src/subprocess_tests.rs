// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;

#[tokio::test]
async fn captures_output_of_quick_command() {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg("echo hello");

    let output = run_with_timeout(cmd, Duration::from_secs(5), "echo").await.unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hello");
}

#[tokio::test]
async fn reports_nonzero_exit_as_output() {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg("exit 3");

    let output = run_with_timeout(cmd, Duration::from_secs(5), "exit").await.unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[tokio::test]
async fn times_out_slow_command() {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg("sleep 5");

    let err = run_with_timeout(cmd, Duration::from_millis(50), "slow").await.unwrap_err();
    assert!(matches!(err, SubprocessError::Timeout { .. }));
    assert!(err.to_string().contains("slow"));
}

#[tokio::test]
async fn spawn_failure_is_reported() {
    let cmd = Command::new("/nonexistent/truetrack-test-binary");
    let err = run_with_timeout(cmd, Duration::from_secs(1), "ghost").await.unwrap_err();
    assert!(matches!(err, SubprocessError::Spawn { .. }));
}

#[test]
fn resolve_tool_finds_path_binaries() {
    // `sh` exists on any unix PATH this suite runs on.
    assert!(resolve_tool("sh").is_some());
    assert!(resolve_tool("definitely-not-a-real-tool-42").is_none());
}
