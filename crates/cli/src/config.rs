// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection configuration.
//!
//! Everything the CLI needs to reach the server comes from the environment:
//! - `DOCSYNC_SERVER_URL`: base URL of the document server
//! - `DOCSYNC_WORKSPACE_ID`: workspace the connector belongs to
//! - `DOCSYNC_ACCESS_TOKEN`: bearer token sent with every request
//!
//! Scan limits can be tuned with `DOCSYNC_MAX_FILES` and
//! `DOCSYNC_MAX_FILE_BYTES`.

use docsync_core::ScanLimits;

use crate::env;
use crate::error::{Error, Result};

/// Server connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the server, without a trailing slash.
    pub server_url: String,
    pub workspace_id: String,
    pub access_token: String,
}

impl Config {
    /// Build a config from explicit values, validating each one.
    pub fn new(
        server_url: Option<String>,
        workspace_id: Option<String>,
        access_token: Option<String>,
    ) -> Result<Self> {
        let server_url = server_url.ok_or_else(|| missing(env::vars::SERVER_URL))?;
        let workspace_id = workspace_id.ok_or_else(|| missing(env::vars::WORKSPACE_ID))?;
        let access_token = access_token.ok_or_else(|| missing(env::vars::ACCESS_TOKEN))?;

        if !server_url.starts_with("http://") && !server_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "{} must be an http(s) URL, got '{}'",
                env::vars::SERVER_URL,
                server_url
            )));
        }

        Ok(Config {
            server_url: server_url.trim_end_matches('/').to_string(),
            workspace_id,
            access_token,
        })
    }

    /// Read the config from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(env::server_url(), env::workspace_id(), env::access_token())
    }

    /// Base URL of the workspace's sync API.
    pub fn sync_base(&self) -> String {
        format!(
            "{}/api/workspaces/{}/sync",
            self.server_url, self.workspace_id
        )
    }
}

fn missing(var: &str) -> Error {
    Error::Config(format!("{} is not set", var))
}

/// Scan limits from the environment, falling back to the defaults.
pub fn scan_limits() -> ScanLimits {
    let defaults = ScanLimits::default();
    ScanLimits {
        max_files: env::max_files().unwrap_or(defaults.max_files),
        max_file_bytes: env::max_file_bytes().unwrap_or(defaults.max_file_bytes),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
