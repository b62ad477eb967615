// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Conflict review and resolution.
//!
//! The server records a conflict whenever a pushed change was based on
//! content it no longer holds. These commands let an operator inspect the
//! two versions, pick one, or submit a manual merge.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use docsync_core::diff::{has_conflict_markers, merge_template};
use docsync_core::protocol::{
    Conflict, ConflictPreview, FileContent, Resolution, ResolutionKind, SourceFile,
    UpdateFileRequest, UpdateFileResult,
};
use docsync_core::normalize_path;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::sync::RemoteApi;

/// One tracked file in a [`tree`] listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeLeaf {
    pub file_name: String,
    pub last_synced_hash: String,
    /// Oldest open conflict on the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict_id: Option<String>,
}

/// Open conflicts for a source, oldest first.
pub async fn list<A: RemoteApi + ?Sized>(api: &A, source_id: &str) -> Result<Vec<Conflict>> {
    let mut conflicts = api.list_conflicts(source_id).await?;
    conflicts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(conflicts)
}

/// Group tracked files by parent directory (`.` for the root), flagging
/// the ones with an open conflict. `conflicts` must be oldest first.
pub fn group_by_dir(
    files: &[SourceFile],
    conflicts: &[Conflict],
) -> BTreeMap<String, Vec<TreeLeaf>> {
    let mut tree: BTreeMap<String, Vec<TreeLeaf>> = BTreeMap::new();
    for file in files {
        let path = normalize_path(&file.relative_path);
        let conflict_id = conflicts
            .iter()
            .find(|c| normalize_path(&c.relative_path) == path)
            .map(|c| c.id.clone());
        let (dir, name) = match path.rsplit_once('/') {
            Some((dir, name)) => (dir.to_string(), name.to_string()),
            None => (".".to_string(), path.clone()),
        };
        tree.entry(dir).or_default().push(TreeLeaf {
            file_name: name,
            last_synced_hash: file.last_synced_hash.clone(),
            conflict_id,
        });
    }
    for leaves in tree.values_mut() {
        leaves.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    }
    tree
}

/// Every file the server tracks for a source, with fingerprints, grouped
/// by directory.
pub async fn tree<A: RemoteApi + ?Sized>(
    api: &A,
    source_id: &str,
) -> Result<BTreeMap<String, Vec<TreeLeaf>>> {
    let files = api.list_source_files(source_id).await?;
    let conflicts = list(api, source_id).await?;
    Ok(group_by_dir(&files, &conflicts))
}

/// Line-level comparison of both versions.
pub async fn preview<A: RemoteApi + ?Sized>(
    api: &A,
    source_id: &str,
    conflict_id: &str,
) -> Result<ConflictPreview> {
    Ok(api.conflict_preview(source_id, conflict_id).await?)
}

/// Build the resolution an operator asked for.
///
/// Manual merges read their content from `content_file` and are refused
/// while conflict markers remain in it.
pub fn build_resolution(kind: ResolutionKind, content_file: Option<&Path>) -> Result<Resolution> {
    let content = match content_file {
        Some(path) => Some(fs::read_to_string(path)?),
        None => None,
    };
    let resolution = Resolution::new(kind, content)?;
    if let Resolution::ManualMerge(merged) = &resolution {
        if has_conflict_markers(merged) {
            let shown = content_file.map(|p| p.display().to_string()).unwrap_or_default();
            return Err(Error::UnresolvedMarkers(shown));
        }
    }
    Ok(resolution)
}

/// Resolve a conflict.
pub async fn resolve<A: RemoteApi + ?Sized>(
    api: &A,
    source_id: &str,
    conflict_id: &str,
    kind: ResolutionKind,
    content_file: Option<&Path>,
) -> Result<Conflict> {
    let resolution = build_resolution(kind, content_file)?;
    let resolved = api
        .resolve_conflict(source_id, conflict_id, resolution)
        .await?;
    tracing::info!("resolved conflict {} ({:?})", conflict_id, kind);
    Ok(resolved)
}

/// Merge template for a conflict, seeded with both versions.
pub async fn template<A: RemoteApi + ?Sized>(
    api: &A,
    source_id: &str,
    conflict_id: &str,
) -> Result<String> {
    let conflict = api
        .list_conflicts(source_id)
        .await?
        .into_iter()
        .find(|c| c.id == conflict_id)
        .ok_or_else(|| Error::ConflictNotFound(conflict_id.to_string()))?;
    Ok(merge_template(
        &conflict.local_content,
        &conflict.remote_content,
    ))
}

/// Current server content of a file.
pub async fn show<A: RemoteApi + ?Sized>(
    api: &A,
    source_id: &str,
    relative_path: &str,
) -> Result<FileContent> {
    Ok(api
        .get_file(source_id, &normalize_path(relative_path))
        .await?)
}

/// Save `file` as the server's content for `relative_path`.
///
/// `base_hash` is the hash the edit started from, as printed by [`show`].
/// `None` saves a new file. If the server no longer holds the base, the
/// save is recorded as a conflict instead of overwriting.
pub async fn save<A: RemoteApi + ?Sized>(
    api: &A,
    source_id: &str,
    relative_path: &str,
    file: &Path,
    base_hash: Option<String>,
) -> Result<UpdateFileResult> {
    let relative_path = normalize_path(relative_path);
    let content = fs::read_to_string(file)?;
    if has_conflict_markers(&content) {
        return Err(Error::UnresolvedMarkers(file.display().to_string()));
    }

    let result = api
        .update_file(
            source_id,
            UpdateFileRequest {
                relative_path: relative_path.clone(),
                content,
                base_hash,
            },
        )
        .await?;
    if let UpdateFileResult::Conflict { conflict_id } = &result {
        tracing::warn!(
            "{} changed on the server; recorded conflict {}",
            relative_path,
            conflict_id
        );
    }
    Ok(result)
}

#[cfg(test)]
#[path = "conflicts_tests.rs"]
mod tests;
