// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync and daemon tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::Mutex;

use docsync_core::protocol::{
    Conflict, ConflictPreview, ConflictStatus, Connector, CreateSourceRequest, DeltaChange,
    DeltaEvent, DeltaPage, FileContent, PushRequest, PushResult, RegisterRequest, Resolution,
    Source, SourceFile, SourceMode, SourceStatus, UpdateFileRequest, UpdateFileResult,
    UpsertPayload,
};
use docsync_core::scan::CONTENT_TYPE;

use super::transport::{ApiFuture, RemoteApi, TransportError, TransportResult};

/// Build a source descriptor.
pub fn make_source(id: &str, mode: SourceMode, status: SourceStatus) -> Source {
    Source {
        id: id.to_string(),
        connector_id: "conn-1".to_string(),
        name: format!("{} docs", id),
        mode,
        status,
        include_patterns: Vec::new(),
        exclude_patterns: Vec::new(),
    }
}

/// Build an upsert delta event.
pub fn upsert_event(cursor: u64, path: &str, content: &str, op_id: Option<&str>) -> DeltaEvent {
    DeltaEvent {
        cursor,
        change: DeltaChange::Upsert {
            relative_path: path.to_string(),
            payload: UpsertPayload {
                hash: docsync_core::fingerprint(content.as_bytes()),
                content: content.to_string(),
                content_type: CONTENT_TYPE.to_string(),
                operation_id: op_id.map(str::to_string),
            },
        },
    }
}

/// Build an open conflict between two versions of a file.
pub fn make_conflict(id: &str, path: &str, local: &str, remote: &str) -> Conflict {
    Conflict {
        id: id.to_string(),
        source_id: "src-1".to_string(),
        relative_path: path.to_string(),
        base_hash: None,
        local_content: local.to_string(),
        local_hash: docsync_core::fingerprint(local.as_bytes()),
        local_deleted: false,
        remote_content: remote.to_string(),
        remote_hash: docsync_core::fingerprint(remote.as_bytes()),
        status: ConflictStatus::Open,
        resolution: None,
        created_at: chrono::Utc::now(),
        resolved_at: None,
    }
}

/// Build a delete delta event.
pub fn delete_event(cursor: u64, path: &str) -> DeltaEvent {
    DeltaEvent {
        cursor,
        change: DeltaChange::Delete {
            relative_path: path.to_string(),
            payload: Default::default(),
        },
    }
}

#[derive(Default)]
struct MockState {
    sources: Vec<Source>,
    files: Vec<SourceFile>,
    pages: VecDeque<DeltaPage>,
    push_results: VecDeque<TransportResult<PushResult>>,
    pushes: Vec<PushRequest>,
    pulls: Vec<u64>,
    heartbeats: usize,
    fail_heartbeat: bool,
    fail_list_sources: Option<TransportError>,
    resolutions: Vec<(String, Resolution)>,
    conflicts: Vec<Conflict>,
    contents: Vec<FileContent>,
    saves: Vec<UpdateFileRequest>,
}

/// Scripted in-memory stand-in for the server.
///
/// Pushes succeed with every item applied unless a result was queued with
/// [`MockRemote::queue_push_result`]; pulls return queued pages, then an
/// empty page at the requested cursor.
#[derive(Default)]
pub struct MockRemote {
    state: Mutex<MockState>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(source: Source) -> Self {
        let mock = Self::new();
        mock.state.lock().unwrap().sources.push(source);
        mock
    }

    pub fn set_files(&self, files: &[(&str, &str)]) {
        self.state.lock().unwrap().files = files
            .iter()
            .map(|(path, hash)| SourceFile {
                relative_path: path.to_string(),
                last_synced_hash: hash.to_string(),
            })
            .collect();
    }

    pub fn queue_page(&self, page: DeltaPage) {
        self.state.lock().unwrap().pages.push_back(page);
    }

    pub fn queue_push_result(&self, result: TransportResult<PushResult>) {
        self.state.lock().unwrap().push_results.push_back(result);
    }

    pub fn fail_heartbeat(&self) {
        self.state.lock().unwrap().fail_heartbeat = true;
    }

    pub fn fail_list_sources(&self, err: TransportError) {
        self.state.lock().unwrap().fail_list_sources = Some(err);
    }

    /// Push requests received so far.
    pub fn pushes(&self) -> Vec<PushRequest> {
        self.state.lock().unwrap().pushes.clone()
    }

    /// Cursors requested by pulls so far.
    pub fn pulls(&self) -> Vec<u64> {
        self.state.lock().unwrap().pulls.clone()
    }

    pub fn heartbeats(&self) -> usize {
        self.state.lock().unwrap().heartbeats
    }

    pub fn resolutions(&self) -> Vec<(String, Resolution)> {
        self.state.lock().unwrap().resolutions.clone()
    }

    pub fn add_conflict(&self, conflict: Conflict) {
        self.state.lock().unwrap().conflicts.push(conflict);
    }

    /// Make `path` readable through `get_file`.
    pub fn set_content(&self, path: &str, content: &str) {
        self.state.lock().unwrap().contents.push(FileContent {
            relative_path: path.to_string(),
            content: content.to_string(),
            hash: docsync_core::fingerprint(content.as_bytes()),
        });
    }

    /// File saves received so far.
    pub fn saves(&self) -> Vec<UpdateFileRequest> {
        self.state.lock().unwrap().saves.clone()
    }
}

fn not_found(what: &str) -> TransportError {
    TransportError::Status {
        status: 404,
        body: format!("{} not found", what),
    }
}

impl RemoteApi for MockRemote {
    fn register(&self, req: RegisterRequest) -> ApiFuture<'_, Connector> {
        Box::pin(async move {
            Ok(Connector {
                id: "conn-1".to_string(),
                name: req.name,
                platform: req.platform,
                version: req.version,
                last_heartbeat_at: None,
            })
        })
    }

    fn heartbeat<'a>(&'a self, _connector_id: &'a str) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            if state.fail_heartbeat {
                return Err(TransportError::Request("heartbeat refused".to_string()));
            }
            state.heartbeats += 1;
            Ok(())
        })
    }

    fn create_source(&self, req: CreateSourceRequest) -> ApiFuture<'_, Source> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            let source = Source {
                id: format!("src-{}", state.sources.len() + 1),
                connector_id: req.connector_id,
                name: req.name,
                mode: req.mode,
                status: SourceStatus::Active,
                include_patterns: req.include_patterns,
                exclude_patterns: req.exclude_patterns,
            };
            state.sources.push(source.clone());
            Ok(source)
        })
    }

    fn list_sources(&self) -> ApiFuture<'_, Vec<Source>> {
        Box::pin(async move {
            let state = self.state.lock().unwrap();
            match &state.fail_list_sources {
                Some(err) => Err(err.clone()),
                None => Ok(state.sources.clone()),
            }
        })
    }

    fn set_source_status<'a>(
        &'a self,
        source_id: &'a str,
        status: SourceStatus,
    ) -> ApiFuture<'a, Source> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            let source = state
                .sources
                .iter_mut()
                .find(|s| s.id == source_id)
                .ok_or_else(|| not_found("source"))?;
            source.status = status;
            Ok(source.clone())
        })
    }

    fn list_source_files<'a>(&'a self, _source_id: &'a str) -> ApiFuture<'a, Vec<SourceFile>> {
        Box::pin(async move { Ok(self.state.lock().unwrap().files.clone()) })
    }

    fn push_batch<'a>(
        &'a self,
        _source_id: &'a str,
        req: PushRequest,
    ) -> ApiFuture<'a, PushResult> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            let applied = req.items.len();
            state.pushes.push(req);
            state.push_results.pop_front().unwrap_or(Ok(PushResult {
                applied,
                conflicts: 0,
            }))
        })
    }

    fn pull_deltas<'a>(
        &'a self,
        _source_id: &'a str,
        cursor: u64,
        _limit: u32,
    ) -> ApiFuture<'a, DeltaPage> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.pulls.push(cursor);
            Ok(state.pages.pop_front().unwrap_or(DeltaPage {
                events: Vec::new(),
                next_cursor: cursor,
            }))
        })
    }

    fn list_conflicts<'a>(&'a self, _source_id: &'a str) -> ApiFuture<'a, Vec<Conflict>> {
        Box::pin(async move { Ok(self.state.lock().unwrap().conflicts.clone()) })
    }

    fn conflict_preview<'a>(
        &'a self,
        _source_id: &'a str,
        conflict_id: &'a str,
    ) -> ApiFuture<'a, ConflictPreview> {
        Box::pin(async move {
            let state = self.state.lock().unwrap();
            let conflict = state
                .conflicts
                .iter()
                .find(|c| c.id == conflict_id)
                .ok_or_else(|| not_found("conflict"))?;
            Ok(docsync_core::diff::preview(
                &conflict.relative_path,
                &conflict.local_content,
                &conflict.remote_content,
            ))
        })
    }

    fn resolve_conflict<'a>(
        &'a self,
        _source_id: &'a str,
        conflict_id: &'a str,
        resolution: Resolution,
    ) -> ApiFuture<'a, Conflict> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state
                .resolutions
                .push((conflict_id.to_string(), resolution.clone()));
            let conflict = state
                .conflicts
                .iter_mut()
                .find(|c| c.id == conflict_id)
                .ok_or_else(|| not_found("conflict"))?;
            if conflict.status == ConflictStatus::Resolved {
                return Err(TransportError::Status {
                    status: 409,
                    body: "conflict already resolved".to_string(),
                });
            }
            conflict.status = ConflictStatus::Resolved;
            conflict.resolution = Some(resolution.kind());
            Ok(conflict.clone())
        })
    }

    fn get_file<'a>(
        &'a self,
        _source_id: &'a str,
        relative_path: &'a str,
    ) -> ApiFuture<'a, FileContent> {
        Box::pin(async move {
            self.state
                .lock()
                .unwrap()
                .contents
                .iter()
                .find(|f| f.relative_path == relative_path)
                .cloned()
                .ok_or_else(|| not_found("file"))
        })
    }

    fn update_file<'a>(
        &'a self,
        _source_id: &'a str,
        req: UpdateFileRequest,
    ) -> ApiFuture<'a, UpdateFileResult> {
        Box::pin(async move {
            let hash = docsync_core::fingerprint(req.content.as_bytes());
            self.state.lock().unwrap().saves.push(req);
            Ok(UpdateFileResult::Saved { hash })
        })
    }
}
