// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One-off pushes outside the daemon.

use std::fs;
use std::path::Path;

use docsync_core::hash::is_safe_relative;
use docsync_core::protocol::{PushItem, PushRequest, PushResult};
use docsync_core::scan::{is_synced_file, CONTENT_TYPE};
use docsync_core::{fingerprint, normalize_path};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::sync::RemoteApi;

/// Accepted shapes of a push-batch input file.
#[derive(Deserialize)]
#[serde(untagged)]
enum BatchFile {
    Request(PushRequest),
    Items(Vec<PushItem>),
}

/// Parse a push batch from JSON, either `{"items": [...]}` or a bare array.
pub fn parse_batch(json: &str) -> Result<PushRequest> {
    let request = match serde_json::from_str::<BatchFile>(json)? {
        BatchFile::Request(request) => request,
        BatchFile::Items(items) => PushRequest { items },
    };
    for item in &request.items {
        if !is_safe_relative(&normalize_path(&item.relative_path)) {
            return Err(Error::InvalidPath(item.relative_path.clone()));
        }
    }
    Ok(request)
}

/// Submit a batch read from `file`.
pub async fn push_batch<A: RemoteApi + ?Sized>(
    api: &A,
    source_id: &str,
    file: &Path,
) -> Result<PushResult> {
    let request = parse_batch(&fs::read_to_string(file)?)?;
    tracing::info!("pushing {} item(s) to {}", request.items.len(), source_id);
    Ok(api.push_batch(source_id, request).await?)
}

/// Push the current content of one file under `root` immediately.
///
/// The server's last synced hash for the path is used as the base, so a
/// concurrent remote edit produces a conflict rather than an overwrite.
pub async fn sync_file<A: RemoteApi + ?Sized>(
    api: &A,
    source_id: &str,
    root: &Path,
    relative_path: &str,
) -> Result<PushResult> {
    let relative_path = normalize_path(relative_path);
    if !is_safe_relative(&relative_path) {
        return Err(Error::InvalidPath(relative_path));
    }
    let path = root.join(&relative_path);
    if !is_synced_file(&path) {
        return Err(Error::UnsupportedFile(relative_path));
    }

    let content = fs::read_to_string(&path)?;
    let base_hash = api
        .list_source_files(source_id)
        .await?
        .into_iter()
        .find(|f| normalize_path(&f.relative_path) == relative_path)
        .map(|f| f.last_synced_hash);

    let item = PushItem {
        operation_id: Uuid::new_v4().to_string(),
        relative_path,
        content_hash: fingerprint(content.as_bytes()),
        content,
        content_type: CONTENT_TYPE.to_string(),
        base_hash,
        is_delete: false,
    };
    Ok(api
        .push_batch(source_id, PushRequest { items: vec![item] })
        .await?)
}

#[cfg(test)]
#[path = "push_tests.rs"]
mod tests;
