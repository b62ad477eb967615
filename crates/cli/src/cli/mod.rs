// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use docsync_core::protocol::{ResolutionKind, SourceMode, SourceStatus};

use crate::sync::PAGE_LIMIT;

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

#[derive(Parser)]
#[command(name = "docsync")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Keep a directory of Markdown documents in sync with a document server")]
#[command(
    long_about = "Keep a directory of Markdown documents in sync with a document server.\n\n\
    Connection settings come from DOCSYNC_SERVER_URL, DOCSYNC_WORKSPACE_ID and\n\
    DOCSYNC_ACCESS_TOKEN. Results are printed as JSON."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Source status accepted on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StatusArg {
    Active,
    Paused,
}

impl From<StatusArg> for SourceStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Active => SourceStatus::Active,
            StatusArg::Paused => SourceStatus::Paused,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Register this machine as a connector
    Register {
        /// Display name of the connector
        #[arg(value_parser = non_empty_string)]
        name: String,

        /// Platform reported to the server
        #[arg(long, default_value = std::env::consts::OS)]
        platform: String,

        /// Client version reported to the server
        #[arg(long = "client-version", default_value = env!("CARGO_PKG_VERSION"))]
        client_version: String,
    },

    /// Report that a connector is alive
    Heartbeat {
        connector_id: String,
    },

    /// Create a source for a connector
    CreateSource {
        connector_id: String,

        #[arg(value_parser = non_empty_string)]
        name: String,

        /// Sync direction: push-only, bidirectional or import-only
        #[arg(short, long, default_value_t = SourceMode::Bidirectional)]
        mode: SourceMode,

        /// Only sync paths matching this glob (repeatable)
        #[arg(short, long = "include", value_name = "GLOB")]
        include: Vec<String>,

        /// Never sync paths matching this glob (repeatable)
        #[arg(short, long = "exclude", value_name = "GLOB")]
        exclude: Vec<String>,
    },

    /// List sources in the workspace
    ListSources,

    /// Pause or resume a source
    SourceStatus {
        source_id: String,
        #[arg(value_enum)]
        status: StatusArg,
    },

    /// Push operations from a JSON file
    PushBatch {
        source_id: String,
        /// JSON file with `{"items": [...]}` or a bare array of items
        file: PathBuf,
    },

    /// Push one local file immediately
    SyncFile {
        source_id: String,
        root: PathBuf,
        relative_path: String,
    },

    /// Show change events after a cursor
    Deltas {
        source_id: String,
        #[arg(long, default_value_t = 0)]
        cursor: u64,
        #[arg(short = 'n', long, default_value_t = PAGE_LIMIT)]
        limit: u32,
    },

    /// Inspect and resolve conflicts
    Conflicts {
        source_id: String,
        #[command(subcommand)]
        action: Option<ConflictCommand>,
    },

    /// Run the sync daemon for a source
    Daemon {
        source_id: String,
        root: PathBuf,
        /// Tick interval in milliseconds (default 5000)
        interval_ms: Option<u64>,
    },
}

#[derive(Subcommand)]
pub enum ConflictCommand {
    /// List open conflicts (default)
    List,

    /// List tracked files with their hashes, grouped by directory
    Tree,

    /// Show the lines that differ between both versions
    Preview { conflict_id: String },

    /// Resolve a conflict
    Resolve {
        conflict_id: String,
        /// keep-local, keep-remote or manual-merge
        resolution: ResolutionKind,
        /// Merged content for manual-merge
        #[arg(long = "content-file", value_name = "FILE")]
        content_file: Option<PathBuf>,
    },

    /// Print a merge template seeded with both versions
    Template { conflict_id: String },

    /// Print the server's current version of a file
    Show { relative_path: String },

    /// Save a file to the server
    Save {
        relative_path: String,
        file: PathBuf,
        /// Hash the edit was based on, as printed by `show`
        #[arg(long = "base-hash", required_unless_present = "new")]
        base_hash: Option<String>,
        /// The file does not exist on the server yet
        #[arg(long, conflicts_with = "base_hash")]
        new: bool,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
