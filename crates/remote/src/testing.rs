// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test server utilities for integration testing.
//!
//! Provides a TestServer that runs on a random port so client tests can
//! talk real HTTP to an isolated server and inspect its state directly.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::server;
use crate::state::ServerState;

/// Workspace id test clients use.
pub const WORKSPACE: &str = "test-workspace";
/// Token the test server requires.
pub const TOKEN: &str = "test-token";

/// A server running on a random local port until shut down or dropped.
pub struct TestServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    state: ServerState,
}

impl TestServer {
    /// Start a new test server on a random available port.
    pub async fn start() -> std::io::Result<Self> {
        let state = ServerState::new(Some(TOKEN.to_string()));
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app_state = state.clone();
        tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            if let Err(e) = server::serve(listener, app_state, shutdown).await {
                tracing::error!("test server error: {}", e);
            }
        });

        Ok(TestServer {
            addr,
            shutdown_tx: Some(shutdown_tx),
            state,
        })
    }

    /// Get the address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL clients use as their server URL.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get access to the server state for verification.
    pub fn state(&self) -> &ServerState {
        &self.state
    }

    /// Stop accepting connections.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
