// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables used by the CLI are defined here
//! with typed accessor functions. The variable name constants are generated
//! by `build.rs` and live in the [`vars`] submodule.

/// Generated environment variable name constants.
pub mod vars {
    include!(concat!(env!("OUT_DIR"), "/env_vars.rs"));
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Returns the value of `DOCSYNC_SERVER_URL` if set and non-empty.
pub fn server_url() -> Option<String> {
    non_empty(vars::SERVER_URL)
}

/// Returns the value of `DOCSYNC_WORKSPACE_ID` if set and non-empty.
pub fn workspace_id() -> Option<String> {
    non_empty(vars::WORKSPACE_ID)
}

/// Returns the value of `DOCSYNC_ACCESS_TOKEN` if set and non-empty.
pub fn access_token() -> Option<String> {
    non_empty(vars::ACCESS_TOKEN)
}

/// Returns `DOCSYNC_MAX_FILES` if set to a valid number.
pub fn max_files() -> Option<usize> {
    non_empty(vars::MAX_FILES).and_then(|v| v.parse().ok())
}

/// Returns `DOCSYNC_MAX_FILE_BYTES` if set to a valid number.
pub fn max_file_bytes() -> Option<u64> {
    non_empty(vars::MAX_FILE_BYTES).and_then(|v| v.parse().ok())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
