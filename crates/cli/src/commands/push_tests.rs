// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::sync::test_helpers::MockRemote;
use tempfile::tempdir;

const ITEM: &str = r#"{
    "operationId": "op-1",
    "relativePath": "a.md",
    "content": "hi",
    "contentType": "text/markdown",
    "contentHash": "abc"
}"#;

#[test]
fn test_parse_batch_accepts_object_and_array() {
    let object = parse_batch(&format!(r#"{{"items": [{}]}}"#, ITEM)).unwrap();
    let array = parse_batch(&format!("[{}]", ITEM)).unwrap();

    assert_eq!(object, array);
    assert_eq!(object.items[0].relative_path, "a.md");
    assert_eq!(object.items[0].base_hash, None);
    assert!(!object.items[0].is_delete);
}

#[test]
fn test_parse_batch_rejects_escaping_path() {
    let json = ITEM.replace("a.md", "../a.md");
    let err = parse_batch(&format!("[{}]", json)).unwrap_err();
    assert!(matches!(err, Error::InvalidPath(_)));
}

#[test]
fn test_parse_batch_rejects_garbage() {
    assert!(matches!(parse_batch("{\"nope\": 1}"), Err(Error::Json(_))));
}

#[tokio::test]
async fn test_push_batch_reads_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("batch.json");
    fs::write(&path, format!("[{}]", ITEM)).unwrap();
    let api = MockRemote::new();

    let result = push_batch(&api, "src-1", &path).await.unwrap();

    assert_eq!(result.applied, 1);
    assert_eq!(api.pushes()[0].items[0].operation_id, "op-1");
}

#[tokio::test]
async fn test_sync_file_uses_server_hash_as_base() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("notes")).unwrap();
    fs::write(dir.path().join("notes/a.md"), "edited").unwrap();
    let api = MockRemote::new();
    api.set_files(&[("notes/a.md", "h-server")]);

    sync_file(&api, "src-1", dir.path(), "./notes/a.md")
        .await
        .unwrap();

    let item = &api.pushes()[0].items[0];
    assert_eq!(item.relative_path, "notes/a.md");
    assert_eq!(item.content, "edited");
    assert_eq!(item.content_hash, fingerprint(b"edited"));
    assert_eq!(item.base_hash.as_deref(), Some("h-server"));
}

#[tokio::test]
async fn test_sync_file_rejects_non_markdown() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), "x").unwrap();
    let api = MockRemote::new();

    let err = sync_file(&api, "src-1", dir.path(), "notes.txt")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UnsupportedFile(_)));
    assert!(api.pushes().is_empty());
}
