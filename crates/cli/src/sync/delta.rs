// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote delta application.
//!
//! Pulls one page of change events after the stored cursor and mirrors them
//! onto the local tree. Events for paths with pending outbound work, echoes
//! of this daemon's own pushes, unsafe paths and paths the local scan would
//! leave out are skipped.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;

use docsync_core::hash::is_safe_relative;
use docsync_core::protocol::DeltaChange;
use docsync_core::scan::is_synced_file;
use docsync_core::state::is_reserved;
use docsync_core::{normalize_path, DaemonState, IgnoreRules, ScanLimits};

use super::transport::RemoteApi;
use crate::error::Result;

/// Maximum number of events requested per pull.
pub const PAGE_LIMIT: u32 = 200;

/// Outcome of one pull.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeltaReport {
    /// Events written to or removed from the local tree.
    pub applied: usize,
    /// Events left untouched.
    pub skipped: usize,
    /// Events whose filesystem change failed; the cursor moves past them.
    pub failed: usize,
}

/// Apply the next page of remote changes under `root`.
///
/// `rules` and `limits` are the ones the local scan uses, so a pulled file
/// is always one the next scan will see. A transport failure aborts before
/// the cursor moves and the page is fetched again on the next tick. A
/// failed filesystem change is logged and passed over.
pub async fn apply_deltas<A: RemoteApi + ?Sized>(
    api: &A,
    source_id: &str,
    root: &Path,
    rules: &IgnoreRules,
    limits: ScanLimits,
    state: &mut DaemonState,
) -> Result<DeltaReport> {
    let page = api.pull_deltas(source_id, state.cursor, PAGE_LIMIT).await?;
    let mut report = DeltaReport::default();

    for event in &page.events {
        let path = normalize_path(event.change.relative_path());

        if state.has_pending(&path) {
            tracing::debug!("skipping remote change to {}: local change pending", path);
            report.skipped += 1;
            continue;
        }
        if event
            .change
            .operation_id()
            .is_some_and(|id| state.was_delivered(id))
        {
            tracing::debug!("skipping echo of own change to {}", path);
            report.skipped += 1;
            continue;
        }
        if !is_safe_relative(&path) || is_reserved(&path) {
            tracing::warn!("ignoring remote change to unsafe path '{}'", path);
            report.skipped += 1;
            continue;
        }
        if !is_synced_file(Path::new(&path)) || !rules.allows(&path) {
            tracing::debug!("skipping remote change to {}: excluded locally", path);
            report.skipped += 1;
            continue;
        }

        let target = root.join(&path);
        let applied = match &event.change {
            DeltaChange::Upsert { payload, .. } => {
                if payload.content.len() as u64 > limits.max_file_bytes {
                    tracing::debug!(
                        "skipping remote change to {}: {} bytes over limit",
                        path,
                        payload.content.len()
                    );
                    report.skipped += 1;
                    continue;
                }
                write_file(&target, &payload.content).map(|()| {
                    state.known.insert(path.clone(), payload.hash.clone());
                    tracing::info!("pulled {}", path);
                })
            }
            DeltaChange::Delete { .. } => remove_file(&target).map(|()| {
                state.known.remove(&path);
                tracing::info!("removed {}", path);
            }),
        };

        match applied {
            Ok(()) => report.applied += 1,
            Err(e) => {
                tracing::warn!("cannot apply remote change to {}: {}", path, e);
                report.failed += 1;
            }
        }
    }

    state.cursor = page.next_cursor;
    Ok(report)
}

fn write_file(target: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(target, content)
}

fn remove_file(target: &Path) -> io::Result<()> {
    match fs::remove_file(target) {
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[cfg(test)]
#[path = "delta_tests.rs"]
mod tests;
