// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! dsync - the docsync connector library.
//!
//! This crate provides the functionality behind the `docsync` CLI: a daemon
//! that keeps a local directory of Markdown documents in sync with a
//! document server, plus one-off commands for sources and conflicts.
//!
//! # Main Components
//!
//! - [`config`] - Connection settings read from the environment
//! - [`sync`] - HTTP transport, outbound queue and delta applier
//! - [`daemon`] - The tick loop that drives a sync
//! - [`Error`] - Error types for all operations
//!
//! # Running a daemon
//!
//! ```rust,ignore
//! use dsync::daemon::{Daemon, DaemonOptions};
//! use dsync::sync::HttpTransport;
//! use dsync::Config;
//!
//! let config = Config::from_env()?;
//! let api = HttpTransport::new(&config)?;
//! let mut daemon = Daemon::new(api, DaemonOptions::new("src-1", "/home/me/notes"));
//! daemon.run_tick().await;
//! ```

mod cli;
pub mod commands;
pub mod config;
pub mod daemon;
pub mod env;
pub mod error;
pub mod sync;

pub use cli::{Cli, Command, ConflictCommand, StatusArg};
pub use config::Config;
pub use error::{Error, Result};

use commands::print_json;
use sync::HttpTransport;

/// Run a parsed command on a single-threaded runtime.
pub fn run(command: Command) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(dispatch(command))
}

async fn dispatch(command: Command) -> Result<()> {
    let config = Config::from_env()?;
    let api = HttpTransport::new(&config)?;

    match command {
        Command::Register {
            name,
            platform,
            client_version,
        } => print_json(
            &commands::connector::register(&api, &name, &platform, &client_version).await?,
        ),
        Command::Heartbeat { connector_id } => {
            print_json(&commands::connector::heartbeat(&api, &connector_id).await?)
        }
        Command::CreateSource {
            connector_id,
            name,
            mode,
            include,
            exclude,
        } => print_json(
            &commands::source::create(&api, &connector_id, &name, mode, include, exclude).await?,
        ),
        Command::ListSources => print_json(&commands::source::list(&api).await?),
        Command::SourceStatus { source_id, status } => print_json(
            &commands::source::set_status(&api, &source_id, status.into()).await?,
        ),
        Command::PushBatch { source_id, file } => {
            print_json(&commands::push::push_batch(&api, &source_id, &file).await?)
        }
        Command::SyncFile {
            source_id,
            root,
            relative_path,
        } => print_json(
            &commands::push::sync_file(&api, &source_id, &root, &relative_path).await?,
        ),
        Command::Deltas {
            source_id,
            cursor,
            limit,
        } => print_json(&commands::deltas::deltas(&api, &source_id, cursor, limit).await?),
        Command::Conflicts { source_id, action } => {
            run_conflicts(&api, &source_id, action.unwrap_or(ConflictCommand::List)).await
        }
        Command::Daemon {
            source_id,
            root,
            interval_ms,
        } => {
            let options =
                commands::daemon::options(&source_id, &root, interval_ms, config::scan_limits())?;
            commands::daemon::run(api, options).await
        }
    }
}

async fn run_conflicts(
    api: &HttpTransport,
    source_id: &str,
    action: ConflictCommand,
) -> Result<()> {
    use commands::conflicts;

    match action {
        ConflictCommand::List => print_json(&conflicts::list(api, source_id).await?),
        ConflictCommand::Tree => print_json(&conflicts::tree(api, source_id).await?),
        ConflictCommand::Preview { conflict_id } => {
            print_json(&conflicts::preview(api, source_id, &conflict_id).await?)
        }
        ConflictCommand::Resolve {
            conflict_id,
            resolution,
            content_file,
        } => print_json(
            &conflicts::resolve(
                api,
                source_id,
                &conflict_id,
                resolution,
                content_file.as_deref(),
            )
            .await?,
        ),
        ConflictCommand::Template { conflict_id } => {
            print!("{}", conflicts::template(api, source_id, &conflict_id).await?);
            Ok(())
        }
        ConflictCommand::Show { relative_path } => {
            print_json(&conflicts::show(api, source_id, &relative_path).await?)
        }
        ConflictCommand::Save {
            relative_path,
            file,
            base_hash,
            new: _,
        } => print_json(
            &conflicts::save(api, source_id, &relative_path, &file, base_hash).await?,
        ),
    }
}
