// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

mod common;
use common::*;
use yare::parameterized;

#[test]
fn help_lists_commands() {
    let assert = docsync().arg("--help").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    for command in [
        "register",
        "heartbeat",
        "create-source",
        "list-sources",
        "push-batch",
        "sync-file",
        "deltas",
        "conflicts",
        "daemon",
    ] {
        assert!(stdout.contains(command), "help is missing {}", command);
    }
}

#[test]
fn missing_server_url_exits_with_error() {
    docsync()
        .arg("list-sources")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "error: config error: DOCSYNC_SERVER_URL is not set",
        ));
}

#[parameterized(
    workspace = { "DOCSYNC_WORKSPACE_ID" },
    token = { "DOCSYNC_ACCESS_TOKEN" },
)]
fn missing_setting_is_named(var: &str) {
    let mut cmd = docsync();
    cmd.env("DOCSYNC_SERVER_URL", "http://127.0.0.1:9")
        .env("DOCSYNC_WORKSPACE_ID", "ws")
        .env("DOCSYNC_ACCESS_TOKEN", "token")
        .env_remove(var);
    cmd.arg("list-sources")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(format!("{} is not set", var)));
}

#[test]
fn non_http_server_url_is_rejected() {
    docsync()
        .env("DOCSYNC_SERVER_URL", "ftp://example.com")
        .env("DOCSYNC_WORKSPACE_ID", "ws")
        .env("DOCSYNC_ACCESS_TOKEN", "token")
        .arg("list-sources")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("must be an http(s) URL"));
}

#[test]
fn unknown_mode_is_a_usage_error() {
    docsync()
        .args(["create-source", "conn-1", "notes", "--mode", "sideways"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("sideways"));
}

#[test]
fn zero_interval_is_rejected() {
    let temp = TempDir::new().unwrap();
    docsync()
        .env("DOCSYNC_SERVER_URL", "http://127.0.0.1:9")
        .env("DOCSYNC_WORKSPACE_ID", "ws")
        .env("DOCSYNC_ACCESS_TOKEN", "token")
        .arg("daemon")
        .arg("src-1")
        .arg(temp.path())
        .arg("0")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("interval must be at least 1ms"));
}

#[test]
fn unreachable_server_reports_request_failure() {
    docsync()
        .env("DOCSYNC_SERVER_URL", "http://127.0.0.1:9")
        .env("DOCSYNC_WORKSPACE_ID", "ws")
        .env("DOCSYNC_ACCESS_TOKEN", "token")
        .arg("list-sources")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error: request failed"));
}
