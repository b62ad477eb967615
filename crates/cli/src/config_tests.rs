// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

fn some(s: &str) -> Option<String> {
    Some(s.to_string())
}

#[test]
fn test_new_trims_trailing_slash() {
    let config = Config::new(some("https://docs.example.com/"), some("ws1"), some("tok")).unwrap();
    assert_eq!(config.server_url, "https://docs.example.com");
    assert_eq!(
        config.sync_base(),
        "https://docs.example.com/api/workspaces/ws1/sync"
    );
}

#[parameterized(
    server = { None, some("ws"), some("tok"), "DOCSYNC_SERVER_URL" },
    workspace = { some("http://x"), None, some("tok"), "DOCSYNC_WORKSPACE_ID" },
    token = { some("http://x"), some("ws"), None, "DOCSYNC_ACCESS_TOKEN" },
)]
fn test_missing_value_names_variable(
    server: Option<String>,
    workspace: Option<String>,
    token: Option<String>,
    var: &str,
) {
    let err = Config::new(server, workspace, token).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains(var));
}

#[test]
fn test_rejects_non_http_url() {
    let err = Config::new(some("ftp://x"), some("ws"), some("tok")).unwrap_err();
    assert!(err.to_string().contains("http(s)"));
}
