// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Outbound queue management.
//!
//! Local changes become [`OutboundOperation`]s in the daemon state. Planning
//! compares a fresh scan against the known fingerprints; flushing delivers
//! ready operations in FIFO batches and schedules retries with exponential
//! backoff when delivery fails.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use docsync_core::protocol::{PushRequest, SourceMode};
use docsync_core::{DaemonState, OutboundOperation, Scan};
use uuid::Uuid;

use super::transport::RemoteApi;

/// Maximum number of operations submitted in one push.
pub const MAX_BATCH: usize = 25;

fn new_operation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Enqueue operations for every difference between `scan` and the known map.
///
/// `remote_hashes` is the server's file map (path to last synced hash) and
/// supplies the base fingerprint of each operation. A known path becomes a
/// delete only when the scan proves it gone; skipped files are forgotten and
/// unreadable ones kept. Returns the number of operations enqueued.
pub fn plan_changes(
    state: &mut DaemonState,
    scan: &Scan,
    remote_hashes: &HashMap<String, String>,
    mode: SourceMode,
    now: DateTime<Utc>,
) -> usize {
    let mut enqueued = 0;

    for file in &scan.files {
        if state.known.get(&file.relative_path) == Some(&file.fingerprint) {
            continue;
        }
        if !state.has_queued(&file.relative_path, &file.fingerprint) {
            state.queue.push(OutboundOperation::upsert(
                new_operation_id(),
                file.relative_path.clone(),
                file.content.clone(),
                file.fingerprint.clone(),
                remote_hashes.get(&file.relative_path).cloned(),
                now,
            ));
            enqueued += 1;
        }
        state
            .known
            .insert(file.relative_path.clone(), file.fingerprint.clone());
    }

    if scan.truncated {
        // Files past the cap were never seen, so absence proves nothing.
        tracing::debug!("scan truncated, skipping deletion detection");
        return enqueued;
    }

    let seen: BTreeSet<&str> = scan
        .files
        .iter()
        .map(|f| f.relative_path.as_str())
        .collect();
    let missing: Vec<String> = state
        .known
        .keys()
        .filter(|path| !seen.contains(path.as_str()))
        .cloned()
        .collect();

    for path in missing {
        if !scan.confirms_absent(&path) {
            if scan.skipped.contains(&path) {
                // Still on disk but no longer synced; the server copy stays.
                tracing::debug!("{} is excluded locally, forgetting it", path);
                state.known.remove(&path);
            }
            continue;
        }
        if !mode.pushes_deletes() {
            tracing::debug!("{} removed locally, not propagated in {} mode", path, mode);
            state.known.remove(&path);
            continue;
        }
        if state.has_queued_delete(&path) {
            continue;
        }
        let base = remote_hashes
            .get(&path)
            .cloned()
            .or_else(|| state.known.get(&path).cloned());
        state
            .queue
            .push(OutboundOperation::delete(new_operation_id(), path, base, now));
        enqueued += 1;
    }

    enqueued
}

/// Outcome of one flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Operations sent to the server.
    pub submitted: usize,
    /// Operations the server applied.
    pub applied: usize,
    /// Operations the server recorded as conflicts.
    pub conflicts: usize,
    /// Operations rescheduled after a failed delivery.
    pub failed: usize,
}

/// Deliver up to [`MAX_BATCH`] ready operations in one push.
///
/// A failed push reschedules the batch with backoff and is not an error:
/// the operations stay queued for a later tick.
pub async fn flush<A: RemoteApi + ?Sized>(
    api: &A,
    source_id: &str,
    state: &mut DaemonState,
    now: DateTime<Utc>,
) -> FlushReport {
    let batch: Vec<OutboundOperation> = state
        .queue
        .iter()
        .filter(|op| op.is_ready(now))
        .take(MAX_BATCH)
        .cloned()
        .collect();
    if batch.is_empty() {
        return FlushReport::default();
    }

    let ids: BTreeSet<String> = batch.iter().map(|op| op.operation_id.clone()).collect();
    let request = PushRequest {
        items: batch.iter().map(OutboundOperation::to_push_item).collect(),
    };

    match api.push_batch(source_id, request).await {
        Ok(result) => {
            for op in &batch {
                if op.is_delete {
                    state.known.remove(&op.relative_path);
                } else {
                    state
                        .known
                        .insert(op.relative_path.clone(), op.content_hash.clone());
                }
                state.remember_delivered(&op.operation_id);
            }
            state.queue.retain(|op| !ids.contains(&op.operation_id));

            if result.conflicts > 0 {
                tracing::warn!(
                    "server recorded {} conflict(s); review with 'docsync conflicts {}'",
                    result.conflicts,
                    source_id
                );
            }
            tracing::info!(
                "pushed {} operation(s): {} applied, {} conflicted",
                batch.len(),
                result.applied,
                result.conflicts
            );
            FlushReport {
                submitted: batch.len(),
                applied: result.applied,
                conflicts: result.conflicts,
                failed: 0,
            }
        }
        Err(e) => {
            let message = e.to_string();
            for op in state
                .queue
                .iter_mut()
                .filter(|op| ids.contains(&op.operation_id))
            {
                op.record_failure(message.clone(), now);
            }
            tracing::warn!("push of {} operation(s) failed: {}", batch.len(), message);
            FlushReport {
                submitted: batch.len(),
                failed: batch.len(),
                ..Default::default()
            }
        }
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
