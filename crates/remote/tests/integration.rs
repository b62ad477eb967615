// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Integration tests for the docsync-remote server binary.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::process::{Child, Command, Stdio};
use std::time::Duration;

use serde_json::{json, Value};

const TOKEN: &str = "integration-token";

/// Helper to spawn a server process and clean it up on drop.
struct ServerProcess {
    child: Child,
    port: u16,
}

impl ServerProcess {
    fn spawn() -> Self {
        // Reserve a free port, then hand it to the server
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .and_then(|l| l.local_addr())
            .expect("reserve port")
            .port();

        let child = Command::new(env!("CARGO_BIN_EXE_docsync-remote"))
            .arg("--bind")
            .arg(format!("127.0.0.1:{}", port))
            .arg("--token")
            .arg(TOKEN)
            .env_remove("DOCSYNC_ACCESS_TOKEN")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn server process");

        ServerProcess { child, port }
    }

    fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    /// Poll the health route until the server answers.
    async fn wait_ready(&self) {
        // CI runners can be slow, so we use generous timeouts
        for _ in 0..50 {
            if let Ok(resp) = reqwest::get(self.url("/health")).await {
                if resp.status().is_success() {
                    return;
                }
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        panic!("server did not become ready");
    }
}

impl Drop for ServerProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[tokio::test]
async fn test_server_lifecycle() {
    let server = ServerProcess::spawn();
    server.wait_ready().await;

    let client = reqwest::Client::new();
    let base = "/api/workspaces/ws/sync";

    let unauthorized = client
        .get(server.url(&format!("{}/sources", base)))
        .send()
        .await
        .unwrap();
    assert_eq!(unauthorized.status(), 401);

    let connector: Value = client
        .post(server.url(&format!("{}/connectors", base)))
        .bearer_auth(TOKEN)
        .json(&json!({"name": "ci", "platform": "linux", "version": "0.1.0"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(connector["id"].is_string());

    let heartbeat = client
        .post(server.url(&format!(
            "{}/connectors/{}/heartbeat",
            base,
            connector["id"].as_str().unwrap()
        )))
        .bearer_auth(TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(heartbeat.status(), 200);
    // Server process is automatically killed when dropped
}
