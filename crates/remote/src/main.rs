// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! docsync-remote: reference sync server.
//!
//! State lives in memory; restarting the server forgets every workspace.

use std::net::SocketAddr;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use docsync_remote::{serve, ServerState};

/// docsync-remote: sync server for Markdown connectors
#[derive(Parser, Debug)]
#[command(name = "docsync-remote")]
#[command(about = "HTTP sync server for docsync connectors")]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1:7891")]
    bind: SocketAddr,

    /// Bearer token clients must present
    #[arg(short, long, env = "DOCSYNC_ACCESS_TOKEN")]
    token: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let listener = TcpListener::bind(args.bind).await?;
    info!("Starting docsync-remote");
    info!("  Bind address: {}", listener.local_addr()?);
    if args.token.is_none() {
        info!("  No access token configured; requests are not authenticated");
    }

    let state = ServerState::new(args.token);
    serve(listener, state, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Shutting down");
    })
    .await?;

    Ok(())
}
