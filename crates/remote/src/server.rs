// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP server implementation.
//!
//! Every sync route lives under `/api/workspaces/:workspace/sync` and
//! requires the configured bearer token. Handlers are thin: they extract
//! path, query and body, call into [`ServerState`], and serialize the
//! result as JSON.

use std::future::Future;

use axum::extract::{Path, Query, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::{debug, warn};

use docsync_core::protocol::{
    Conflict, ConflictPreview, Connector, CreateSourceRequest, DeltaPage, FileContent,
    PushRequest, PushResult, RegisterRequest, ResolveRequest, SetStatusRequest, Source,
    SourceFile, UpdateFileRequest, UpdateFileResult,
};

use crate::error::{Result, ServerError};
use crate::state::ServerState;

/// Page size used when a pull names no limit.
pub const DEFAULT_PAGE: u32 = 200;

#[derive(Debug, Deserialize)]
struct WorkspacePath {
    workspace: String,
}

#[derive(Debug, Deserialize)]
struct ConnectorPath {
    workspace: String,
    connector: String,
}

#[derive(Debug, Deserialize)]
struct SourcePath {
    workspace: String,
    source: String,
}

#[derive(Debug, Deserialize)]
struct ConflictPath {
    workspace: String,
    source: String,
    conflict: String,
}

#[derive(Debug, Deserialize)]
struct DeltaQuery {
    #[serde(default)]
    cursor: u64,
    #[serde(default = "default_page")]
    limit: u32,
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

#[derive(Debug, Deserialize)]
struct FileQuery {
    path: String,
}

/// Build the application router.
pub fn router(state: ServerState) -> Router {
    let sync = Router::new()
        .route("/connectors", post(register))
        .route("/connectors/:connector/heartbeat", post(heartbeat))
        .route("/sources", get(list_sources).post(create_source))
        .route("/sources/:source/status", post(set_status))
        .route("/sources/:source/files", get(list_files))
        .route("/sources/:source/push", post(push))
        .route("/sources/:source/deltas", get(pull_deltas))
        .route("/sources/:source/conflicts", get(list_conflicts))
        .route(
            "/sources/:source/conflicts/:conflict/preview",
            get(conflict_preview),
        )
        .route(
            "/sources/:source/conflicts/:conflict/resolve",
            post(resolve_conflict),
        )
        .route("/sources/:source/file", get(get_file).put(update_file))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token));

    Router::new()
        .route("/health", get(health))
        .nest("/api/workspaces/:workspace/sync", sync)
        .with_state(state)
}

/// Serve the API on `listener` until `shutdown` completes.
pub async fn serve<F>(listener: TcpListener, state: ServerState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn require_token(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> std::result::Result<Response, ServerError> {
    debug!(method = %req.method(), uri = %req.uri(), "request");
    if let Some(expected) = state.token() {
        let presented = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        if presented != Some(expected) {
            warn!(uri = %req.uri(), "rejected request without valid token");
            return Err(ServerError::Unauthorized);
        }
    }
    Ok(next.run(req).await)
}

async fn health() -> &'static str {
    "ok"
}

async fn register(
    State(state): State<ServerState>,
    Path(p): Path<WorkspacePath>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<Connector>> {
    state.register(&p.workspace, req).await.map(Json)
}

async fn heartbeat(
    State(state): State<ServerState>,
    Path(p): Path<ConnectorPath>,
) -> Result<Json<Connector>> {
    state.heartbeat(&p.workspace, &p.connector).await.map(Json)
}

async fn create_source(
    State(state): State<ServerState>,
    Path(p): Path<WorkspacePath>,
    Json(req): Json<CreateSourceRequest>,
) -> Result<Json<Source>> {
    state.create_source(&p.workspace, req).await.map(Json)
}

async fn list_sources(
    State(state): State<ServerState>,
    Path(p): Path<WorkspacePath>,
) -> Json<Vec<Source>> {
    Json(state.list_sources(&p.workspace).await)
}

async fn set_status(
    State(state): State<ServerState>,
    Path(p): Path<SourcePath>,
    Json(req): Json<SetStatusRequest>,
) -> Result<Json<Source>> {
    state
        .set_status(&p.workspace, &p.source, req.status)
        .await
        .map(Json)
}

async fn list_files(
    State(state): State<ServerState>,
    Path(p): Path<SourcePath>,
) -> Result<Json<Vec<SourceFile>>> {
    state.list_files(&p.workspace, &p.source).await.map(Json)
}

async fn push(
    State(state): State<ServerState>,
    Path(p): Path<SourcePath>,
    Json(req): Json<PushRequest>,
) -> Result<Json<PushResult>> {
    state.push(&p.workspace, &p.source, req).await.map(Json)
}

async fn pull_deltas(
    State(state): State<ServerState>,
    Path(p): Path<SourcePath>,
    Query(q): Query<DeltaQuery>,
) -> Result<Json<DeltaPage>> {
    state
        .pull_deltas(&p.workspace, &p.source, q.cursor, q.limit)
        .await
        .map(Json)
}

async fn list_conflicts(
    State(state): State<ServerState>,
    Path(p): Path<SourcePath>,
) -> Result<Json<Vec<Conflict>>> {
    state.list_conflicts(&p.workspace, &p.source).await.map(Json)
}

async fn conflict_preview(
    State(state): State<ServerState>,
    Path(p): Path<ConflictPath>,
) -> Result<Json<ConflictPreview>> {
    state
        .preview(&p.workspace, &p.source, &p.conflict)
        .await
        .map(Json)
}

async fn resolve_conflict(
    State(state): State<ServerState>,
    Path(p): Path<ConflictPath>,
    Json(req): Json<ResolveRequest>,
) -> Result<Json<Conflict>> {
    state
        .resolve(&p.workspace, &p.source, &p.conflict, req)
        .await
        .map(Json)
}

async fn get_file(
    State(state): State<ServerState>,
    Path(p): Path<SourcePath>,
    Query(q): Query<FileQuery>,
) -> Result<Json<FileContent>> {
    state
        .get_file(&p.workspace, &p.source, &q.path)
        .await
        .map(Json)
}

async fn update_file(
    State(state): State<ServerState>,
    Path(p): Path<SourcePath>,
    Json(req): Json<UpdateFileRequest>,
) -> Result<Json<UpdateFileResult>> {
    state.update_file(&p.workspace, &p.source, req).await.map(Json)
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
