// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable daemon state stored at the synced root.
//!
//! Holds the known fingerprints, the outbound queue and the remote cursor.
//! Loading never fails: an unreadable, corrupt, or foreign state file yields
//! empty state. Saving writes a temp file, fsyncs it, then renames it over the
//! state file so a crash never leaves a truncated document behind.

use std::collections::{BTreeMap, VecDeque};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::op::OutboundOperation;

/// State file name at the synced root.
pub const STATE_FILE_NAME: &str = ".docsync-state.json";

/// Temp file used while saving.
pub const STATE_TMP_NAME: &str = ".docsync-state.json.tmp";

/// Lock file held by a running daemon.
pub const LOCK_FILE_NAME: &str = ".docsync.lock";

/// Number of delivered operation ids remembered for echo suppression.
pub const RECENT_OPS_CAP: usize = 500;

/// Whether a canonical relative path is one of the daemon's own files.
pub fn is_reserved(relative_path: &str) -> bool {
    matches!(
        relative_path,
        STATE_FILE_NAME | STATE_TMP_NAME | LOCK_FILE_NAME
    )
}

/// Path of the state file for a root.
pub fn state_path(root: &Path) -> PathBuf {
    root.join(STATE_FILE_NAME)
}

/// Everything the daemon persists between ticks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaemonState {
    /// Source this state belongs to.
    #[serde(default)]
    pub source_id: String,
    /// Last fingerprint synced per relative path.
    #[serde(default)]
    pub known: BTreeMap<String, String>,
    /// Pending operations in FIFO order.
    #[serde(default)]
    pub queue: Vec<OutboundOperation>,
    /// Position in the server's change history.
    #[serde(default)]
    pub cursor: u64,
    /// Recently delivered operation ids, oldest first.
    #[serde(default)]
    pub recent_operation_ids: VecDeque<String>,
}

impl DaemonState {
    /// Create empty state for a source.
    pub fn new(source_id: &str) -> Self {
        DaemonState {
            source_id: source_id.to_string(),
            ..Default::default()
        }
    }

    /// Load the state for `source_id` from `root`, falling back to empty state.
    pub fn load(root: &Path, source_id: &str) -> Self {
        let path = state_path(root);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Self::new(source_id);
            }
            Err(e) => {
                tracing::warn!("cannot read {}: {}, starting fresh", path.display(), e);
                return Self::new(source_id);
            }
        };

        match serde_json::from_str::<DaemonState>(&content) {
            Ok(state) if state.source_id == source_id => state,
            Ok(state) => {
                tracing::warn!(
                    "state file belongs to source {}, starting fresh for {}",
                    state.source_id,
                    source_id
                );
                Self::new(source_id)
            }
            Err(e) => {
                tracing::warn!("corrupt state file {}: {}, starting fresh", path.display(), e);
                Self::new(source_id)
            }
        }
    }

    /// Persist the state atomically to `root`.
    pub fn save(&self, root: &Path) -> Result<()> {
        let tmp = root.join(STATE_TMP_NAME);
        let json = serde_json::to_string_pretty(self)?;
        {
            let mut file = File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, state_path(root))?;
        Ok(())
    }

    /// Whether any operation is queued for the path.
    pub fn has_pending(&self, relative_path: &str) -> bool {
        self.queue.iter().any(|op| op.relative_path == relative_path)
    }

    /// Whether an upsert with this exact content hash is queued for the path.
    pub fn has_queued(&self, relative_path: &str, content_hash: &str) -> bool {
        self.queue.iter().any(|op| {
            !op.is_delete && op.relative_path == relative_path && op.content_hash == content_hash
        })
    }

    /// Whether a delete is queued for the path.
    pub fn has_queued_delete(&self, relative_path: &str) -> bool {
        self.queue
            .iter()
            .any(|op| op.is_delete && op.relative_path == relative_path)
    }

    /// Remember a delivered operation id, evicting the oldest past the cap.
    pub fn remember_delivered(&mut self, operation_id: &str) {
        self.recent_operation_ids
            .push_back(operation_id.to_string());
        while self.recent_operation_ids.len() > RECENT_OPS_CAP {
            self.recent_operation_ids.pop_front();
        }
    }

    /// Whether the operation id was delivered by this daemon.
    pub fn was_delivered(&self, operation_id: &str) -> bool {
        self.recent_operation_ids.iter().any(|id| id == operation_id)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
