// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::TransportError;

/// All possible errors that can occur in the docsync CLI.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Core(#[from] docsync_core::Error),

    #[error("source not found: {0}\n  hint: run 'docsync list-sources' to see configured sources")]
    SourceNotFound(String),

    #[error("conflict not found: {0}\n  hint: run 'docsync conflicts <source-id> list' to see open conflicts")]
    ConflictNotFound(String),

    #[error("{0} still contains conflict markers\n  hint: edit the merge so no <<<<<<< / >>>>>>> lines remain")]
    UnresolvedMarkers(String),

    #[error("not a synchronized file: {0}\n  hint: only .md and .markdown files are synchronized")]
    UnsupportedFile(String),

    #[error("invalid root: {0}\n  hint: the sync root must be an existing directory")]
    InvalidRoot(String),

    #[error("another daemon holds the lock on {0}")]
    LockHeld(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for docsync operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
