// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for docsync-core operations.

use thiserror::Error;

/// All possible errors that can occur in docsync-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("unsafe relative path: '{0}'\n  hint: paths must stay inside the synced root")]
    UnsafePath(String),

    #[error("sync root is not a directory: {0}")]
    InvalidRoot(String),

    #[error("invalid resolution: '{0}'\n  hint: valid resolutions are: keep-local, keep-remote, manual-merge")]
    InvalidResolution(String),

    #[error("manual merge requires resolved content")]
    MissingMergeContent,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for docsync-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
