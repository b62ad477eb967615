// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use docsync_core::protocol::{Connector, RegisterRequest};
use serde::Serialize;

use crate::error::Result;
use crate::sync::RemoteApi;

/// Acknowledgement of a heartbeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatAck {
    pub connector_id: String,
    pub ok: bool,
}

/// Register this machine as a connector.
pub async fn register<A: RemoteApi + ?Sized>(
    api: &A,
    name: &str,
    platform: &str,
    version: &str,
) -> Result<Connector> {
    let connector = api
        .register(RegisterRequest {
            name: name.to_string(),
            platform: platform.to_string(),
            version: version.to_string(),
        })
        .await?;
    tracing::info!("registered connector {}", connector.id);
    Ok(connector)
}

/// Send one heartbeat for a connector.
pub async fn heartbeat<A: RemoteApi + ?Sized>(api: &A, connector_id: &str) -> Result<HeartbeatAck> {
    api.heartbeat(connector_id).await?;
    Ok(HeartbeatAck {
        connector_id: connector_id.to_string(),
        ok: true,
    })
}
