// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use docsync_core::protocol::{CreateSourceRequest, Source, SourceMode, SourceStatus};

use crate::error::Result;
use crate::sync::RemoteApi;

/// Create a source owned by a connector.
pub async fn create<A: RemoteApi + ?Sized>(
    api: &A,
    connector_id: &str,
    name: &str,
    mode: SourceMode,
    include_patterns: Vec<String>,
    exclude_patterns: Vec<String>,
) -> Result<Source> {
    // Reject bad globs before the server stores them.
    docsync_core::IgnoreRules::new::<_, &str>(&include_patterns, &exclude_patterns, &[])?;

    let source = api
        .create_source(CreateSourceRequest {
            connector_id: connector_id.to_string(),
            name: name.to_string(),
            mode,
            include_patterns,
            exclude_patterns,
        })
        .await?;
    tracing::info!("created {} source {}", source.mode, source.id);
    Ok(source)
}

/// List every source in the workspace.
pub async fn list<A: RemoteApi + ?Sized>(api: &A) -> Result<Vec<Source>> {
    Ok(api.list_sources().await?)
}

/// Pause or resume a source.
pub async fn set_status<A: RemoteApi + ?Sized>(
    api: &A,
    source_id: &str,
    status: SourceStatus,
) -> Result<Source> {
    Ok(api.set_source_status(source_id, status).await?)
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
