// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wire types exchanged with the sync server.
//!
//! Field names are camelCase on the wire; enum values are snake_case.
//! Delta events and conflict resolutions are tagged enums so callers handle
//! every case.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Direction of a sync source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    /// Local changes are pushed; remote changes are never pulled.
    PushOnly,
    /// Local changes are pushed and remote changes are pulled.
    Bidirectional,
    /// Local files are imported; local deletions are not propagated.
    ImportOnly,
}

impl SourceMode {
    /// Whether remote changes are applied locally.
    pub fn pulls(self) -> bool {
        self == SourceMode::Bidirectional
    }

    /// Whether local deletions are pushed.
    pub fn pushes_deletes(self) -> bool {
        self != SourceMode::ImportOnly
    }
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceMode::PushOnly => "push-only",
            SourceMode::Bidirectional => "bidirectional",
            SourceMode::ImportOnly => "import-only",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for SourceMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.replace('_', "-").as_str() {
            "push-only" => Ok(SourceMode::PushOnly),
            "bidirectional" => Ok(SourceMode::Bidirectional),
            "import-only" => Ok(SourceMode::ImportOnly),
            other => Err(format!(
                "invalid mode '{}' (expected push-only, bidirectional or import-only)",
                other
            )),
        }
    }
}

/// Whether a source is currently syncing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    Active,
    Paused,
}

/// A registered daemon identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub id: String,
    pub name: String,
    pub platform: String,
    pub version: String,
    #[serde(default)]
    pub last_heartbeat_at: Option<DateTime<Utc>>,
}

/// Body of a connector registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub platform: String,
    pub version: String,
}

/// Server-owned description of a sync source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub id: String,
    pub connector_id: String,
    #[serde(default)]
    pub name: String,
    pub mode: SourceMode,
    pub status: SourceStatus,
    #[serde(default)]
    pub include_patterns: Vec<String>,
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

/// Body of a source creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSourceRequest {
    pub connector_id: String,
    pub name: String,
    pub mode: SourceMode,
    #[serde(default)]
    pub include_patterns: Vec<String>,
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

/// Body of a source status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusRequest {
    pub status: SourceStatus,
}

/// A file tracked by the server for a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    pub relative_path: String,
    pub last_synced_hash: String,
}

/// One operation in a push batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushItem {
    pub operation_id: String,
    pub relative_path: String,
    #[serde(default)]
    pub content: String,
    pub content_type: String,
    #[serde(default)]
    pub content_hash: String,
    #[serde(default)]
    pub base_hash: Option<String>,
    #[serde(default)]
    pub is_delete: bool,
}

/// Body of a push batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushRequest {
    pub items: Vec<PushItem>,
}

/// Outcome of a push batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushResult {
    pub applied: usize,
    pub conflicts: usize,
}

/// Payload of an upsert event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertPayload {
    pub hash: String,
    pub content: String,
    pub content_type: String,
    #[serde(default)]
    pub operation_id: Option<String>,
}

/// Payload of a delete event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePayload {
    #[serde(default)]
    pub operation_id: Option<String>,
}

/// What a delta event does to a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeltaChange {
    Upsert {
        #[serde(rename = "relativePath")]
        relative_path: String,
        payload: UpsertPayload,
    },
    Delete {
        #[serde(rename = "relativePath")]
        relative_path: String,
        #[serde(default)]
        payload: DeletePayload,
    },
}

impl DeltaChange {
    /// Path the change applies to.
    pub fn relative_path(&self) -> &str {
        match self {
            DeltaChange::Upsert { relative_path, .. } | DeltaChange::Delete { relative_path, .. } => {
                relative_path
            }
        }
    }

    /// Id of the operation that produced the change, if any.
    pub fn operation_id(&self) -> Option<&str> {
        match self {
            DeltaChange::Upsert { payload, .. } => payload.operation_id.as_deref(),
            DeltaChange::Delete { payload, .. } => payload.operation_id.as_deref(),
        }
    }
}

/// One entry of the server's change history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaEvent {
    pub cursor: u64,
    #[serde(flatten)]
    pub change: DeltaChange,
}

/// A page of delta events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaPage {
    pub events: Vec<DeltaEvent>,
    pub next_cursor: u64,
}

/// Lifecycle of a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictStatus {
    Open,
    Resolved,
}

/// Divergence between a pushed change and the server's current content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub id: String,
    pub source_id: String,
    pub relative_path: String,
    #[serde(default)]
    pub base_hash: Option<String>,
    pub local_content: String,
    pub local_hash: String,
    #[serde(default)]
    pub local_deleted: bool,
    pub remote_content: String,
    pub remote_hash: String,
    pub status: ConflictStatus,
    #[serde(default)]
    pub resolution: Option<ResolutionKind>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
}

/// How a conflict is resolved, without content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionKind {
    KeepLocal,
    KeepRemote,
    ManualMerge,
}

impl FromStr for ResolutionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.replace('_', "-").as_str() {
            "keep-local" => Ok(ResolutionKind::KeepLocal),
            "keep-remote" => Ok(ResolutionKind::KeepRemote),
            "manual-merge" => Ok(ResolutionKind::ManualMerge),
            _ => Err(Error::InvalidResolution(s.to_string())),
        }
    }
}

/// A complete resolution decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The server adopts the content that triggered the conflict.
    KeepLocal,
    /// The server keeps its content; the local change is discarded.
    KeepRemote,
    /// The server adopts operator-supplied content.
    ManualMerge(String),
}

impl Resolution {
    /// Build a resolution from its kind and optional merged content.
    pub fn new(kind: ResolutionKind, content: Option<String>) -> Result<Self> {
        match kind {
            ResolutionKind::KeepLocal => Ok(Resolution::KeepLocal),
            ResolutionKind::KeepRemote => Ok(Resolution::KeepRemote),
            ResolutionKind::ManualMerge => content
                .map(Resolution::ManualMerge)
                .ok_or(Error::MissingMergeContent),
        }
    }

    /// The kind of this resolution.
    pub fn kind(&self) -> ResolutionKind {
        match self {
            Resolution::KeepLocal => ResolutionKind::KeepLocal,
            Resolution::KeepRemote => ResolutionKind::KeepRemote,
            Resolution::ManualMerge(_) => ResolutionKind::ManualMerge,
        }
    }
}

/// Body of a resolve call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    pub resolution: ResolutionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_content: Option<String>,
}

impl From<Resolution> for ResolveRequest {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Resolution::ManualMerge(content) => ResolveRequest {
                resolution: ResolutionKind::ManualMerge,
                resolved_content: Some(content),
            },
            other => ResolveRequest {
                resolution: other.kind(),
                resolved_content: None,
            },
        }
    }
}

impl TryFrom<ResolveRequest> for Resolution {
    type Error = Error;

    fn try_from(req: ResolveRequest) -> Result<Self> {
        Resolution::new(req.resolution, req.resolved_content)
    }
}

/// Count of differing lines in a preview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSummary {
    pub different_lines: usize,
}

/// One differing line; `None` means the side has no such line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineChange {
    pub line: usize,
    pub local: Option<String>,
    pub remote: Option<String>,
}

/// Line-level preview of a conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictPreview {
    pub relative_path: String,
    pub summary: PreviewSummary,
    pub changes: Vec<LineChange>,
}

/// Current server content of a tracked file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileContent {
    pub relative_path: String,
    pub content: String,
    pub hash: String,
}

/// Body of an operator file save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFileRequest {
    pub relative_path: String,
    pub content: String,
    #[serde(default)]
    pub base_hash: Option<String>,
}

/// Outcome of an operator file save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateFileResult {
    Saved {
        hash: String,
    },
    Conflict {
        #[serde(rename = "conflictId")]
        conflict_id: String,
    },
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
