// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One-off commands run through the binary against a live sync server.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

mod common;
use common::*;

use serde_json::Value;

/// Run the binary with `args` off the async runtime and parse its stdout.
async fn run_json(server: &TestServer, args: &[&str]) -> Value {
    let mut cmd = docsync_for(server);
    cmd.args(args);
    let stdout = tokio::task::spawn_blocking(move || {
        let assert = cmd.assert().success();
        assert.get_output().stdout.clone()
    })
    .await
    .unwrap();
    serde_json::from_slice(&stdout).unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn register_create_and_list() {
    let server = TestServer::start().await.unwrap();

    let connector = run_json(&server, &["register", "laptop", "--platform", "linux"]).await;
    let connector_id = connector["id"].as_str().unwrap().to_string();
    assert_eq!(connector["name"], "laptop");
    assert_eq!(connector["platform"], "linux");

    let ack = run_json(&server, &["heartbeat", &connector_id]).await;
    assert_eq!(ack["ok"], true);

    let source = run_json(
        &server,
        &[
            "create-source",
            &connector_id,
            "notes",
            "--mode",
            "push-only",
            "--exclude",
            "drafts/**",
        ],
    )
    .await;
    assert_eq!(source["mode"], "push_only");
    assert_eq!(source["excludePatterns"][0], "drafts/**");

    let listed = run_json(&server, &["list-sources"]).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let source_id = source["id"].as_str().unwrap();
    let paused = run_json(&server, &["source-status", source_id, "paused"]).await;
    assert_eq!(paused["status"], "paused");
}

#[tokio::test(flavor = "multi_thread")]
async fn sync_file_push_batch_and_deltas() {
    let server = TestServer::start().await.unwrap();
    let source = create_source(&server, SourceMode::Bidirectional).await;
    let root = TempDir::new().unwrap();
    write(root.path(), "docs/readme.md", "# Readme\n");

    let root_arg = root.path().to_str().unwrap();
    let result = run_json(&server, &["sync-file", &source, root_arg, "docs/readme.md"]).await;
    assert_eq!(result["applied"], 1);

    let batch = root.path().join("batch.json");
    std::fs::write(
        &batch,
        r#"[{
            "operationId": "op-batch-1",
            "relativePath": "b.md",
            "content": "from batch",
            "contentType": "text/markdown"
        }]"#,
    )
    .unwrap();
    let result = run_json(&server, &["push-batch", &source, batch.to_str().unwrap()]).await;
    assert_eq!(result, serde_json::json!({"applied": 1, "conflicts": 0}));

    let page = run_json(&server, &["deltas", &source, "--cursor", "0"]).await;
    let events = page["events"].as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1]["payload"]["operationId"], "op-batch-1");

    let tail = run_json(
        &server,
        &["deltas", &source, "--cursor", &page["nextCursor"].to_string()],
    )
    .await;
    assert!(tail["events"].as_array().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn sync_file_refuses_non_markdown() {
    let server = TestServer::start().await.unwrap();
    let source = create_source(&server, SourceMode::Bidirectional).await;
    let root = TempDir::new().unwrap();
    write(root.path(), "notes.txt", "plain");

    let mut cmd = docsync_for(&server);
    cmd.arg("sync-file")
        .arg(&source)
        .arg(root.path())
        .arg("notes.txt");
    tokio::task::spawn_blocking(move || {
        cmd.assert()
            .code(1)
            .stderr(predicate::str::contains("not a synchronized file"));
    })
    .await
    .unwrap();
}
