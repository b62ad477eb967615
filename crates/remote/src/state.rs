// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Server state management.
//!
//! Holds every workspace's connectors, sources, tracked files, change
//! history and conflicts behind one mutex. Cursors come from a single
//! counter so they increase across the whole server.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use docsync_core::diff;
use docsync_core::hash::{fingerprint, is_safe_relative, normalize_path};
use docsync_core::protocol::{
    Conflict, ConflictPreview, ConflictStatus, Connector, CreateSourceRequest, DeletePayload,
    DeltaChange, DeltaEvent, DeltaPage, FileContent, PushRequest, PushResult, RegisterRequest,
    Resolution, ResolveRequest, Source, SourceFile, SourceStatus, UpdateFileRequest,
    UpdateFileResult, UpsertPayload,
};
use docsync_core::scan::CONTENT_TYPE;
use docsync_core::IgnoreRules;

use crate::error::{Result, ServerError};

/// Largest page a delta pull may return.
pub const MAX_PAGE: u32 = 1000;

/// Shared server state.
#[derive(Clone, Default)]
pub struct ServerState {
    inner: Arc<Mutex<Inner>>,
    token: Option<Arc<str>>,
}

#[derive(Default)]
struct Inner {
    workspaces: HashMap<String, Workspace>,
    /// Cursor of the last emitted event.
    cursor: u64,
}

#[derive(Default)]
struct Workspace {
    connectors: HashMap<String, Connector>,
    sources: Vec<Source>,
    files: HashMap<String, BTreeMap<String, StoredFile>>,
    events: HashMap<String, Vec<DeltaEvent>>,
    conflicts: Vec<Conflict>,
}

#[derive(Debug, Clone)]
struct StoredFile {
    content: String,
    hash: String,
}

/// A change offered to a source, from a push item or a file save.
struct Change {
    relative_path: String,
    /// New content; `None` deletes the path.
    content: Option<String>,
    base_hash: Option<String>,
    operation_id: Option<String>,
}

/// What applying a change did.
#[derive(Debug, PartialEq, Eq)]
enum Applied {
    Stored(Option<String>),
    Unchanged(Option<String>),
    Conflict(String),
}

impl ServerState {
    /// Create empty state. With a token, every request must carry it.
    pub fn new(token: Option<String>) -> Self {
        ServerState {
            inner: Arc::default(),
            token: token.map(Arc::from),
        }
    }

    /// Bearer token required by the API, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub async fn register(&self, workspace: &str, req: RegisterRequest) -> Result<Connector> {
        if req.name.trim().is_empty() {
            return Err(ServerError::BadRequest("connector name is empty".into()));
        }
        let connector = Connector {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            platform: req.platform,
            version: req.version,
            last_heartbeat_at: None,
        };
        let mut inner = self.inner.lock().await;
        inner
            .workspace(workspace)
            .connectors
            .insert(connector.id.clone(), connector.clone());
        info!(workspace, connector = %connector.id, "registered connector");
        Ok(connector)
    }

    pub async fn heartbeat(&self, workspace: &str, connector_id: &str) -> Result<Connector> {
        let mut inner = self.inner.lock().await;
        let connector = inner
            .workspace(workspace)
            .connectors
            .get_mut(connector_id)
            .ok_or_else(|| ServerError::NotFound(format!("connector {}", connector_id)))?;
        connector.last_heartbeat_at = Some(Utc::now());
        debug!(workspace, connector = connector_id, "heartbeat");
        Ok(connector.clone())
    }

    pub async fn create_source(&self, workspace: &str, req: CreateSourceRequest) -> Result<Source> {
        if req.name.trim().is_empty() {
            return Err(ServerError::BadRequest("source name is empty".into()));
        }
        IgnoreRules::new::<_, &str>(&req.include_patterns, &req.exclude_patterns, &[])?;

        let mut inner = self.inner.lock().await;
        let ws = inner.workspace(workspace);
        if !ws.connectors.contains_key(&req.connector_id) {
            return Err(ServerError::NotFound(format!(
                "connector {}",
                req.connector_id
            )));
        }
        let source = Source {
            id: Uuid::new_v4().to_string(),
            connector_id: req.connector_id,
            name: req.name,
            mode: req.mode,
            status: SourceStatus::Active,
            include_patterns: req.include_patterns,
            exclude_patterns: req.exclude_patterns,
        };
        ws.sources.push(source.clone());
        info!(workspace, source = %source.id, mode = %source.mode, "created source");
        Ok(source)
    }

    pub async fn list_sources(&self, workspace: &str) -> Vec<Source> {
        let mut inner = self.inner.lock().await;
        inner.workspace(workspace).sources.clone()
    }

    pub async fn set_status(
        &self,
        workspace: &str,
        source_id: &str,
        status: SourceStatus,
    ) -> Result<Source> {
        let mut inner = self.inner.lock().await;
        let source = inner
            .workspace(workspace)
            .sources
            .iter_mut()
            .find(|s| s.id == source_id)
            .ok_or_else(|| source_not_found(source_id))?;
        source.status = status;
        info!(workspace, source = source_id, ?status, "source status changed");
        Ok(source.clone())
    }

    pub async fn list_files(&self, workspace: &str, source_id: &str) -> Result<Vec<SourceFile>> {
        let mut inner = self.inner.lock().await;
        let ws = inner.workspace(workspace);
        ws.source(source_id)?;
        Ok(ws
            .files
            .get(source_id)
            .map(|files| {
                files
                    .iter()
                    .map(|(path, f)| SourceFile {
                        relative_path: path.clone(),
                        last_synced_hash: f.hash.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Apply a batch in order. Paths are checked before anything is applied.
    pub async fn push(
        &self,
        workspace: &str,
        source_id: &str,
        req: PushRequest,
    ) -> Result<PushResult> {
        let changes = req
            .items
            .into_iter()
            .map(|item| -> Result<Change> {
                Ok(Change {
                    relative_path: checked_path(&item.relative_path)?,
                    content: (!item.is_delete).then_some(item.content),
                    base_hash: item.base_hash,
                    operation_id: Some(item.operation_id),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let now = Utc::now();
        let mut inner = self.inner.lock().await;
        let Inner { workspaces, cursor } = &mut *inner;
        let ws = workspaces.entry(workspace.to_string()).or_default();
        ws.source(source_id)?;

        let mut result = PushResult::default();
        for change in changes {
            match ws.apply(source_id, change, cursor, now) {
                Applied::Conflict(_) => result.conflicts += 1,
                Applied::Stored(_) | Applied::Unchanged(_) => result.applied += 1,
            }
        }
        debug!(
            workspace,
            source = source_id,
            applied = result.applied,
            conflicts = result.conflicts,
            "push applied"
        );
        Ok(result)
    }

    /// Events after `cursor`, oldest first, at most `limit` of them.
    pub async fn pull_deltas(
        &self,
        workspace: &str,
        source_id: &str,
        cursor: u64,
        limit: u32,
    ) -> Result<DeltaPage> {
        let limit = limit.clamp(1, MAX_PAGE) as usize;
        let mut inner = self.inner.lock().await;
        let ws = inner.workspace(workspace);
        ws.source(source_id)?;

        let events: Vec<DeltaEvent> = ws
            .events
            .get(source_id)
            .map(|all| {
                all.iter()
                    .filter(|e| e.cursor > cursor)
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        let next_cursor = events.last().map_or(cursor, |e| e.cursor);
        Ok(DeltaPage {
            events,
            next_cursor,
        })
    }

    /// Open conflicts of a source, oldest first.
    pub async fn list_conflicts(&self, workspace: &str, source_id: &str) -> Result<Vec<Conflict>> {
        let mut inner = self.inner.lock().await;
        let ws = inner.workspace(workspace);
        ws.source(source_id)?;
        let mut open: Vec<Conflict> = ws
            .conflicts
            .iter()
            .filter(|c| c.source_id == source_id && c.status == ConflictStatus::Open)
            .cloned()
            .collect();
        open.sort_by_key(|c| c.created_at);
        Ok(open)
    }

    pub async fn preview(
        &self,
        workspace: &str,
        source_id: &str,
        conflict_id: &str,
    ) -> Result<ConflictPreview> {
        let mut inner = self.inner.lock().await;
        let ws = inner.workspace(workspace);
        ws.source(source_id)?;
        let conflict = ws.conflict(source_id, conflict_id)?;
        Ok(diff::preview(
            &conflict.relative_path,
            &conflict.local_content,
            &conflict.remote_content,
        ))
    }

    /// Settle an open conflict. Resolved conflicts are terminal.
    pub async fn resolve(
        &self,
        workspace: &str,
        source_id: &str,
        conflict_id: &str,
        req: ResolveRequest,
    ) -> Result<Conflict> {
        let now = Utc::now();
        let mut inner = self.inner.lock().await;
        let Inner { workspaces, cursor } = &mut *inner;
        let ws = workspaces.entry(workspace.to_string()).or_default();
        ws.source(source_id)?;

        let conflict = ws.conflict(source_id, conflict_id)?.clone();
        if conflict.status == ConflictStatus::Resolved {
            return Err(ServerError::AlreadyResolved(conflict_id.to_string()));
        }
        let resolution = Resolution::try_from(req)?;
        let kind = resolution.kind();
        let path = conflict.relative_path.clone();

        match resolution {
            Resolution::KeepLocal => {
                let content = (!conflict.local_deleted).then_some(conflict.local_content);
                ws.store(source_id, &path, content, None, cursor);
            }
            Resolution::KeepRemote => {
                let current = ws.file(source_id, &path).map(|f| f.content.clone());
                ws.store(source_id, &path, current, None, cursor);
            }
            Resolution::ManualMerge(content) => {
                ws.store(source_id, &path, Some(content), None, cursor);
            }
        }

        let stored = ws
            .conflicts
            .iter_mut()
            .find(|c| c.id == conflict_id)
            .ok_or_else(|| conflict_not_found(conflict_id))?;
        stored.status = ConflictStatus::Resolved;
        stored.resolution = Some(kind);
        stored.resolved_at = Some(now);
        info!(workspace, source = source_id, conflict = conflict_id, ?kind, "resolved conflict");
        Ok(stored.clone())
    }

    pub async fn get_file(
        &self,
        workspace: &str,
        source_id: &str,
        relative_path: &str,
    ) -> Result<FileContent> {
        let path = checked_path(relative_path)?;
        let mut inner = self.inner.lock().await;
        let ws = inner.workspace(workspace);
        ws.source(source_id)?;
        let file = ws
            .file(source_id, &path)
            .ok_or_else(|| ServerError::NotFound(format!("file {}", path)))?;
        Ok(FileContent {
            relative_path: path,
            content: file.content.clone(),
            hash: file.hash.clone(),
        })
    }

    /// Save operator content. A save against a moved base opens a conflict.
    pub async fn update_file(
        &self,
        workspace: &str,
        source_id: &str,
        req: UpdateFileRequest,
    ) -> Result<UpdateFileResult> {
        let change = Change {
            relative_path: checked_path(&req.relative_path)?,
            content: Some(req.content),
            base_hash: req.base_hash,
            operation_id: None,
        };

        let now = Utc::now();
        let mut inner = self.inner.lock().await;
        let Inner { workspaces, cursor } = &mut *inner;
        let ws = workspaces.entry(workspace.to_string()).or_default();
        ws.source(source_id)?;

        match ws.apply(source_id, change, cursor, now) {
            Applied::Stored(hash) | Applied::Unchanged(hash) => Ok(UpdateFileResult::Saved {
                hash: hash.unwrap_or_default(),
            }),
            Applied::Conflict(conflict_id) => Ok(UpdateFileResult::Conflict { conflict_id }),
        }
    }
}

impl Inner {
    fn workspace(&mut self, id: &str) -> &mut Workspace {
        self.workspaces.entry(id.to_string()).or_default()
    }
}

impl Workspace {
    fn source(&self, source_id: &str) -> Result<&Source> {
        self.sources
            .iter()
            .find(|s| s.id == source_id)
            .ok_or_else(|| source_not_found(source_id))
    }

    fn conflict(&self, source_id: &str, conflict_id: &str) -> Result<&Conflict> {
        self.conflicts
            .iter()
            .find(|c| c.id == conflict_id && c.source_id == source_id)
            .ok_or_else(|| conflict_not_found(conflict_id))
    }

    fn file(&self, source_id: &str, path: &str) -> Option<&StoredFile> {
        self.files.get(source_id).and_then(|files| files.get(path))
    }

    /// Apply a change unless the server moved since the change's base.
    ///
    /// A change conflicts when the current hash differs from both its base
    /// and its own hash. Deleting an absent file or writing identical
    /// content changes nothing and emits nothing.
    fn apply(
        &mut self,
        source_id: &str,
        change: Change,
        cursor: &mut u64,
        now: DateTime<Utc>,
    ) -> Applied {
        let current = self.file(source_id, &change.relative_path).cloned();
        let new_hash = change.content.as_deref().map(|c| fingerprint(c.as_bytes()));

        let Some(current) = current else {
            if change.content.is_none() {
                return Applied::Unchanged(None);
            }
            self.store(
                source_id,
                &change.relative_path,
                change.content,
                change.operation_id,
                cursor,
            );
            return Applied::Stored(new_hash);
        };

        if new_hash.as_deref() == Some(current.hash.as_str()) {
            return Applied::Unchanged(new_hash);
        }
        if change.base_hash.as_deref() != Some(current.hash.as_str()) {
            return Applied::Conflict(self.open_conflict(source_id, change, new_hash, current, now));
        }

        self.store(
            source_id,
            &change.relative_path,
            change.content,
            change.operation_id,
            cursor,
        );
        Applied::Stored(new_hash)
    }

    /// Write or remove a path and record the event.
    fn store(
        &mut self,
        source_id: &str,
        path: &str,
        content: Option<String>,
        operation_id: Option<String>,
        cursor: &mut u64,
    ) {
        let files = self.files.entry(source_id.to_string()).or_default();
        let change = match content {
            Some(content) => {
                let hash = fingerprint(content.as_bytes());
                files.insert(
                    path.to_string(),
                    StoredFile {
                        content: content.clone(),
                        hash: hash.clone(),
                    },
                );
                DeltaChange::Upsert {
                    relative_path: path.to_string(),
                    payload: UpsertPayload {
                        hash,
                        content,
                        content_type: CONTENT_TYPE.to_string(),
                        operation_id,
                    },
                }
            }
            None => {
                files.remove(path);
                DeltaChange::Delete {
                    relative_path: path.to_string(),
                    payload: DeletePayload { operation_id },
                }
            }
        };

        *cursor += 1;
        self.events
            .entry(source_id.to_string())
            .or_default()
            .push(DeltaEvent {
                cursor: *cursor,
                change,
            });
    }

    /// Record a conflict, reusing an open one for the same path and content.
    fn open_conflict(
        &mut self,
        source_id: &str,
        change: Change,
        local_hash: Option<String>,
        current: StoredFile,
        now: DateTime<Utc>,
    ) -> String {
        let local_deleted = change.content.is_none();
        let local_hash = local_hash.unwrap_or_default();

        if let Some(existing) = self.conflicts.iter().find(|c| {
            c.source_id == source_id
                && c.status == ConflictStatus::Open
                && c.relative_path == change.relative_path
                && c.local_hash == local_hash
                && c.local_deleted == local_deleted
                && c.remote_hash == current.hash
        }) {
            return existing.id.clone();
        }

        let conflict = Conflict {
            id: Uuid::new_v4().to_string(),
            source_id: source_id.to_string(),
            relative_path: change.relative_path,
            base_hash: change.base_hash,
            local_content: change.content.unwrap_or_default(),
            local_hash,
            local_deleted,
            remote_content: current.content,
            remote_hash: current.hash,
            status: ConflictStatus::Open,
            resolution: None,
            created_at: now,
            resolved_at: None,
        };
        info!(
            source = source_id,
            path = %conflict.relative_path,
            conflict = %conflict.id,
            "opened conflict"
        );
        let id = conflict.id.clone();
        self.conflicts.push(conflict);
        id
    }
}

fn checked_path(path: &str) -> Result<String> {
    let normalized = normalize_path(path);
    if is_safe_relative(&normalized) {
        Ok(normalized)
    } else {
        Err(ServerError::BadRequest(format!(
            "unsafe relative path '{}'",
            path
        )))
    }
}

fn source_not_found(id: &str) -> ServerError {
    ServerError::NotFound(format!("source {}", id))
}

fn conflict_not_found(id: &str) -> ServerError {
    ServerError::NotFound(format!("conflict {}", id))
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
