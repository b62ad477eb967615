// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Outbound operations and their retry schedule.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::protocol::PushItem;
use crate::scan::CONTENT_TYPE;

/// First retry delay.
pub const BACKOFF_BASE_MS: u64 = 1000;

/// Upper bound on the retry delay.
pub const BACKOFF_MAX_MS: u64 = 60_000;

/// Delay before the next delivery attempt after `attempts` failures.
///
/// `1000ms * 2^(attempts - 1)`, capped at 60s. Zero attempts counts as one.
pub fn backoff(attempts: u32) -> Duration {
    let exp = attempts.saturating_sub(1).min(16);
    let ms = BACKOFF_BASE_MS.saturating_mul(1u64 << exp);
    Duration::from_millis(ms.min(BACKOFF_MAX_MS))
}

/// A local change waiting to be delivered to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundOperation {
    pub operation_id: String,
    pub relative_path: String,
    /// Empty for deletes.
    #[serde(default)]
    pub content: String,
    /// Empty for deletes.
    #[serde(default)]
    pub content_hash: String,
    pub content_type: String,
    /// Last fingerprint seen on the server; absent for new files.
    #[serde(default)]
    pub base_hash: Option<String>,
    #[serde(default)]
    pub is_delete: bool,
    #[serde(default)]
    pub attempts: u32,
    pub next_attempt_at: DateTime<Utc>,
    #[serde(default)]
    pub last_error: Option<String>,
}

impl OutboundOperation {
    /// Create or update a file.
    pub fn upsert(
        operation_id: String,
        relative_path: String,
        content: String,
        content_hash: String,
        base_hash: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        OutboundOperation {
            operation_id,
            relative_path,
            content,
            content_hash,
            content_type: CONTENT_TYPE.to_string(),
            base_hash,
            is_delete: false,
            attempts: 0,
            next_attempt_at: now,
            last_error: None,
        }
    }

    /// Delete a file.
    pub fn delete(
        operation_id: String,
        relative_path: String,
        base_hash: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        OutboundOperation {
            operation_id,
            relative_path,
            content: String::new(),
            content_hash: String::new(),
            content_type: CONTENT_TYPE.to_string(),
            base_hash,
            is_delete: true,
            attempts: 0,
            next_attempt_at: now,
            last_error: None,
        }
    }

    /// Whether the retry delay has elapsed.
    pub fn is_ready(&self, now: DateTime<Utc>) -> bool {
        self.next_attempt_at <= now
    }

    /// Record a failed delivery and schedule the next attempt.
    pub fn record_failure(&mut self, error: impl Into<String>, now: DateTime<Utc>) {
        self.attempts = self.attempts.saturating_add(1);
        self.last_error = Some(error.into());
        let delay = chrono::Duration::from_std(backoff(self.attempts))
            .unwrap_or_else(|_| chrono::Duration::milliseconds(BACKOFF_MAX_MS as i64));
        self.next_attempt_at = now + delay;
    }

    /// Wire form of the operation.
    pub fn to_push_item(&self) -> PushItem {
        PushItem {
            operation_id: self.operation_id.clone(),
            relative_path: self.relative_path.clone(),
            content: self.content.clone(),
            content_type: self.content_type.clone(),
            content_hash: self.content_hash.clone(),
            base_hash: self.base_hash.clone(),
            is_delete: self.is_delete,
        }
    }
}

#[cfg(test)]
#[path = "op_tests.rs"]
mod tests;
