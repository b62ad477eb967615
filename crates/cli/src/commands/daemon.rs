// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;
use std::time::Duration;

use docsync_core::ScanLimits;

use crate::daemon::{Daemon, DaemonOptions};
use crate::error::{Error, Result};
use crate::sync::RemoteApi;

/// Build daemon options from command arguments.
pub fn options(
    source_id: &str,
    root: &Path,
    interval_ms: Option<u64>,
    limits: ScanLimits,
) -> Result<DaemonOptions> {
    let mut options = DaemonOptions::new(source_id, root);
    if let Some(ms) = interval_ms {
        if ms == 0 {
            return Err(Error::Config("interval must be at least 1ms".to_string()));
        }
        options.interval = Duration::from_millis(ms);
    }
    options.limits = limits;
    Ok(options)
}

/// Run the sync daemon until Ctrl-C.
pub async fn run<A: RemoteApi>(api: A, options: DaemonOptions) -> Result<()> {
    Daemon::new(api, options).run().await
}

#[cfg(test)]
#[path = "daemon_tests.rs"]
mod tests;
