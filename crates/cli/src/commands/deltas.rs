// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use docsync_core::protocol::DeltaPage;

use crate::error::Result;
use crate::sync::RemoteApi;

/// Fetch one page of change events without applying them.
pub async fn deltas<A: RemoteApi + ?Sized>(
    api: &A,
    source_id: &str,
    cursor: u64,
    limit: u32,
) -> Result<DeltaPage> {
    Ok(api.pull_deltas(source_id, cursor, limit).await?)
}
