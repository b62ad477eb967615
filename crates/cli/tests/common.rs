// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use docsync_core::protocol::{SourceMode, SourceStatus};
pub use docsync_remote::testing::{TestServer, TOKEN, WORKSPACE};
pub use dsync::daemon::{Daemon, DaemonOptions, TickOutcome, TickReport};
pub use dsync::sync::HttpTransport;
pub use dsync::Config;
pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// The CLI binary with no docsync settings inherited from the caller.
pub fn docsync() -> Command {
    let mut cmd = cargo_bin_cmd!("docsync");
    cmd.env_remove("DOCSYNC_SERVER_URL")
        .env_remove("DOCSYNC_WORKSPACE_ID")
        .env_remove("DOCSYNC_ACCESS_TOKEN")
        .env("RUST_LOG", "warn");
    cmd
}

/// The CLI binary configured to talk to `server`.
pub fn docsync_for(server: &TestServer) -> Command {
    let mut cmd = docsync();
    cmd.env("DOCSYNC_SERVER_URL", server.url())
        .env("DOCSYNC_WORKSPACE_ID", WORKSPACE)
        .env("DOCSYNC_ACCESS_TOKEN", TOKEN);
    cmd
}

/// An HTTP client for `server`.
pub fn transport(server: &TestServer) -> HttpTransport {
    let config = Config::new(
        Some(server.url()),
        Some(WORKSPACE.to_string()),
        Some(TOKEN.to_string()),
    )
    .unwrap();
    HttpTransport::new(&config).unwrap()
}

/// Register a connector and create a source with `mode`; returns its id.
pub async fn create_source(server: &TestServer, mode: SourceMode) -> String {
    let api = transport(server);
    let connector = dsync::commands::connector::register(&api, "test", "linux", "0.1.0")
        .await
        .unwrap();
    dsync::commands::source::create(&api, &connector.id, "notes", mode, vec![], vec![])
        .await
        .unwrap()
        .id
}

/// A daemon for `source_id` rooted at `root`.
pub fn daemon(server: &TestServer, source_id: &str, root: &Path) -> Daemon<HttpTransport> {
    Daemon::new(transport(server), DaemonOptions::new(source_id, root))
}

/// Run one tick and require it to complete.
pub async fn tick(daemon: &mut Daemon<HttpTransport>) -> TickReport {
    match daemon.run_tick().await {
        TickOutcome::Completed(report) => report,
        other => panic!("tick did not complete: {:?}", other),
    }
}

pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

pub fn read(root: &Path, rel: &str) -> String {
    std::fs::read_to_string(root.join(rel)).unwrap()
}
