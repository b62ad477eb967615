// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for the server's sync API.
//!
//! Provides a trait-based transport layer that enables:
//! - Real HTTP requests for production
//! - Mock transports for unit testing

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use docsync_core::protocol::{
    Conflict, ConflictPreview, Connector, CreateSourceRequest, DeltaPage, FileContent, PushRequest,
    PushResult, RegisterRequest, Resolution, ResolveRequest, SetStatusRequest, Source, SourceFile,
    SourceStatus, UpdateFileRequest, UpdateFileResult,
};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{Error, Result};

/// Every request is abandoned after this long.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error type for transport operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request never produced a response (network failure, timeout).
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl TransportError {
    /// Status code of a rejected request, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Boxed future returned by [`RemoteApi`] methods.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = TransportResult<T>> + Send + 'a>>;

/// The server's sync API.
///
/// This trait abstracts over the actual transport mechanism, allowing
/// for easy testing with mock implementations.
pub trait RemoteApi: Send + Sync {
    /// Register a connector identity.
    fn register(&self, req: RegisterRequest) -> ApiFuture<'_, Connector>;

    /// Report that a connector is alive.
    fn heartbeat<'a>(&'a self, connector_id: &'a str) -> ApiFuture<'a, ()>;

    /// Create a source owned by a connector.
    fn create_source(&self, req: CreateSourceRequest) -> ApiFuture<'_, Source>;

    /// List all sources in the workspace.
    fn list_sources(&self) -> ApiFuture<'_, Vec<Source>>;

    /// Pause or resume a source.
    fn set_source_status<'a>(
        &'a self,
        source_id: &'a str,
        status: SourceStatus,
    ) -> ApiFuture<'a, Source>;

    /// The server's file map for a source.
    fn list_source_files<'a>(&'a self, source_id: &'a str) -> ApiFuture<'a, Vec<SourceFile>>;

    /// Submit a batch of outbound operations.
    fn push_batch<'a>(&'a self, source_id: &'a str, req: PushRequest)
        -> ApiFuture<'a, PushResult>;

    /// Fetch change events after `cursor`.
    fn pull_deltas<'a>(
        &'a self,
        source_id: &'a str,
        cursor: u64,
        limit: u32,
    ) -> ApiFuture<'a, DeltaPage>;

    /// Open conflicts for a source.
    fn list_conflicts<'a>(&'a self, source_id: &'a str) -> ApiFuture<'a, Vec<Conflict>>;

    /// Line-level preview of a conflict.
    fn conflict_preview<'a>(
        &'a self,
        source_id: &'a str,
        conflict_id: &'a str,
    ) -> ApiFuture<'a, ConflictPreview>;

    /// Resolve a conflict, returning the resolved record.
    fn resolve_conflict<'a>(
        &'a self,
        source_id: &'a str,
        conflict_id: &'a str,
        resolution: Resolution,
    ) -> ApiFuture<'a, Conflict>;

    /// Current server content of a file.
    fn get_file<'a>(&'a self, source_id: &'a str, relative_path: &'a str)
        -> ApiFuture<'a, FileContent>;

    /// Save a file against an explicit base.
    fn update_file<'a>(
        &'a self,
        source_id: &'a str,
        req: UpdateFileRequest,
    ) -> ApiFuture<'a, UpdateFileResult>;
}

/// HTTP transport implementation using reqwest.
pub struct HttpTransport {
    client: Client,
    base: Url,
    token: String,
}

impl HttpTransport {
    /// Create a transport for the configured workspace.
    pub fn new(config: &Config) -> Result<Self> {
        let base = Url::parse(&config.sync_base())
            .map_err(|e| Error::Config(format!("invalid server URL: {}", e)))?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("cannot build HTTP client: {}", e)))?;
        Ok(HttpTransport {
            client,
            base,
            token: config.access_token.clone(),
        })
    }

    fn url(&self, segments: &[&str]) -> TransportResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::Request(format!("cannot extend URL {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> TransportResult<T> {
        let resp = req
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!("server rejected request with {}: {}", status, body);
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

impl RemoteApi for HttpTransport {
    fn register(&self, req: RegisterRequest) -> ApiFuture<'_, Connector> {
        Box::pin(async move {
            let url = self.url(&["connectors"])?;
            self.send(self.client.post(url).json(&req)).await
        })
    }

    fn heartbeat<'a>(&'a self, connector_id: &'a str) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            let url = self.url(&["connectors", connector_id, "heartbeat"])?;
            self.send::<Connector>(self.client.post(url)).await?;
            Ok(())
        })
    }

    fn create_source(&self, req: CreateSourceRequest) -> ApiFuture<'_, Source> {
        Box::pin(async move {
            let url = self.url(&["sources"])?;
            self.send(self.client.post(url).json(&req)).await
        })
    }

    fn list_sources(&self) -> ApiFuture<'_, Vec<Source>> {
        Box::pin(async move {
            let url = self.url(&["sources"])?;
            self.send(self.client.get(url)).await
        })
    }

    fn set_source_status<'a>(
        &'a self,
        source_id: &'a str,
        status: SourceStatus,
    ) -> ApiFuture<'a, Source> {
        Box::pin(async move {
            let url = self.url(&["sources", source_id, "status"])?;
            let body = SetStatusRequest { status };
            self.send(self.client.post(url).json(&body)).await
        })
    }

    fn list_source_files<'a>(&'a self, source_id: &'a str) -> ApiFuture<'a, Vec<SourceFile>> {
        Box::pin(async move {
            let url = self.url(&["sources", source_id, "files"])?;
            self.send(self.client.get(url)).await
        })
    }

    fn push_batch<'a>(
        &'a self,
        source_id: &'a str,
        req: PushRequest,
    ) -> ApiFuture<'a, PushResult> {
        Box::pin(async move {
            let url = self.url(&["sources", source_id, "push"])?;
            self.send(self.client.post(url).json(&req)).await
        })
    }

    fn pull_deltas<'a>(
        &'a self,
        source_id: &'a str,
        cursor: u64,
        limit: u32,
    ) -> ApiFuture<'a, DeltaPage> {
        Box::pin(async move {
            let url = self.url(&["sources", source_id, "deltas"])?;
            let query = [("cursor", cursor.to_string()), ("limit", limit.to_string())];
            self.send(self.client.get(url).query(&query)).await
        })
    }

    fn list_conflicts<'a>(&'a self, source_id: &'a str) -> ApiFuture<'a, Vec<Conflict>> {
        Box::pin(async move {
            let url = self.url(&["sources", source_id, "conflicts"])?;
            self.send(self.client.get(url)).await
        })
    }

    fn conflict_preview<'a>(
        &'a self,
        source_id: &'a str,
        conflict_id: &'a str,
    ) -> ApiFuture<'a, ConflictPreview> {
        Box::pin(async move {
            let url = self.url(&["sources", source_id, "conflicts", conflict_id, "preview"])?;
            self.send(self.client.get(url)).await
        })
    }

    fn resolve_conflict<'a>(
        &'a self,
        source_id: &'a str,
        conflict_id: &'a str,
        resolution: Resolution,
    ) -> ApiFuture<'a, Conflict> {
        Box::pin(async move {
            let url = self.url(&["sources", source_id, "conflicts", conflict_id, "resolve"])?;
            let body = ResolveRequest::from(resolution);
            self.send(self.client.post(url).json(&body)).await
        })
    }

    fn get_file<'a>(
        &'a self,
        source_id: &'a str,
        relative_path: &'a str,
    ) -> ApiFuture<'a, FileContent> {
        Box::pin(async move {
            let url = self.url(&["sources", source_id, "file"])?;
            self.send(self.client.get(url).query(&[("path", relative_path)]))
                .await
        })
    }

    fn update_file<'a>(
        &'a self,
        source_id: &'a str,
        req: UpdateFileRequest,
    ) -> ApiFuture<'a, UpdateFileResult> {
        Box::pin(async move {
            let url = self.url(&["sources", source_id, "file"])?;
            self.send(self.client.put(url).json(&req)).await
        })
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
