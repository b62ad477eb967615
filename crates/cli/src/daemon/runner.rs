// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon runner: tick loop and per-tick sync.
//!
//! The daemon:
//! 1. Acquires flock on the root so only one daemon syncs it
//! 2. Fires a tick on a fixed interval, skipping overlapping firings
//! 3. Pushes local changes and pulls remote ones each tick
//! 4. Persists its state after every tick, successful or not

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use docsync_core::protocol::SourceStatus;
use docsync_core::state::LOCK_FILE_NAME;
use docsync_core::{normalize_path, DaemonState, IgnoreRules, ScanLimits};
use tokio::time::MissedTickBehavior;

use crate::error::{Error, Result};
use crate::sync::{apply_deltas, flush, plan_changes, DeltaReport, FlushReport, RemoteApi};

/// Tick interval when none is given.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(5000);

/// Minimum time between heartbeats.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// What a daemon syncs and how often.
#[derive(Debug, Clone)]
pub struct DaemonOptions {
    pub source_id: String,
    pub root: PathBuf,
    pub interval: Duration,
    pub limits: ScanLimits,
}

impl DaemonOptions {
    pub fn new(source_id: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        DaemonOptions {
            source_id: source_id.into(),
            root: root.into(),
            interval: DEFAULT_INTERVAL,
            limits: ScanLimits::default(),
        }
    }
}

/// Summary of one completed tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// The source was paused; nothing was synced.
    pub paused: bool,
    /// Files included by the scan.
    pub scanned: usize,
    /// Operations enqueued by planning.
    pub enqueued: usize,
    pub flush: FlushReport,
    /// Present for bidirectional sources.
    pub pulled: Option<DeltaReport>,
}

/// Result of asking the daemon to tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// Another tick was still running.
    Skipped,
    Completed(TickReport),
    Failed(Error),
}

/// Marks a tick in progress; clears the flag when dropped.
///
/// `run_tick` takes `&mut self`, so one `Daemon` cannot overlap ticks and
/// this guard never trips there. The flag makes the Idle/Ticking state
/// explicit: an interval firing that observes Ticking is skipped, and a
/// tick future dropped mid-way still returns the daemon to Idle.
struct TickGuard {
    flag: Arc<AtomicBool>,
}

impl TickGuard {
    fn try_begin(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| TickGuard {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for TickGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// A sync daemon for one source and root.
pub struct Daemon<A: RemoteApi> {
    api: A,
    options: DaemonOptions,
    state: DaemonState,
    last_heartbeat: Option<Instant>,
    ticking: Arc<AtomicBool>,
}

impl<A: RemoteApi> Daemon<A> {
    /// Create a daemon, loading any state persisted under the root.
    pub fn new(api: A, options: DaemonOptions) -> Self {
        let state = DaemonState::load(&options.root, &options.source_id);
        Daemon {
            api,
            options,
            state,
            last_heartbeat: None,
            ticking: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &DaemonState {
        &self.state
    }

    pub fn options(&self) -> &DaemonOptions {
        &self.options
    }

    /// Run one tick unless one is already in progress.
    ///
    /// Errors are logged and returned in the outcome; state is persisted
    /// either way.
    pub async fn run_tick(&mut self) -> TickOutcome {
        let Some(_guard) = TickGuard::try_begin(&self.ticking) else {
            tracing::debug!("tick already in progress, skipping");
            return TickOutcome::Skipped;
        };

        let result = self.tick(Utc::now()).await;

        if let Err(e) = self.state.save(&self.options.root) {
            tracing::error!("failed to persist state: {}", e);
        }

        match result {
            Ok(report) => TickOutcome::Completed(report),
            Err(e) => {
                tracing::error!("tick failed: {}", e);
                TickOutcome::Failed(e)
            }
        }
    }

    async fn tick(&mut self, now: DateTime<Utc>) -> Result<TickReport> {
        let root = self.options.root.clone();
        let source_id = self.options.source_id.clone();

        let is_dir = fs::metadata(&root).map(|m| m.is_dir()).unwrap_or(false);
        if !is_dir {
            return Err(Error::InvalidRoot(root.display().to_string()));
        }

        let source = self
            .api
            .list_sources()
            .await?
            .into_iter()
            .find(|s| s.id == source_id)
            .ok_or_else(|| Error::SourceNotFound(source_id.clone()))?;

        self.maybe_heartbeat(&source.connector_id).await;

        if source.status == SourceStatus::Paused {
            tracing::info!("source {} is paused", source_id);
            return Ok(TickReport {
                paused: true,
                ..Default::default()
            });
        }

        let remote_hashes: HashMap<String, String> = self
            .api
            .list_source_files(&source_id)
            .await?
            .into_iter()
            .map(|f| (normalize_path(&f.relative_path), f.last_synced_hash))
            .collect();

        let rules = IgnoreRules::load(&root, &source.include_patterns, &source.exclude_patterns)?;
        let scan = docsync_core::scan(&root, &rules, self.options.limits)?;
        let enqueued = plan_changes(&mut self.state, &scan, &remote_hashes, source.mode, now);
        if enqueued > 0 {
            tracing::info!("queued {} local change(s)", enqueued);
        }

        let flushed = flush(&self.api, &source_id, &mut self.state, now).await;

        let pulled = if source.mode.pulls() {
            Some(
                apply_deltas(
                    &self.api,
                    &source_id,
                    &root,
                    &rules,
                    self.options.limits,
                    &mut self.state,
                )
                .await?,
            )
        } else {
            None
        };

        Ok(TickReport {
            paused: false,
            scanned: scan.files.len(),
            enqueued,
            flush: flushed,
            pulled,
        })
    }

    async fn maybe_heartbeat(&mut self, connector_id: &str) {
        if self
            .last_heartbeat
            .is_some_and(|at| at.elapsed() < HEARTBEAT_INTERVAL)
        {
            return;
        }
        match self.api.heartbeat(connector_id).await {
            Ok(()) => self.last_heartbeat = Some(Instant::now()),
            Err(e) => tracing::warn!("heartbeat failed: {}", e),
        }
    }

    /// Tick on the configured interval until Ctrl-C.
    pub async fn run(mut self) -> Result<()> {
        let root = self.options.root.clone();
        if !root.is_dir() {
            return Err(Error::InvalidRoot(root.display().to_string()));
        }
        let _lock = acquire_lock(&root.join(LOCK_FILE_NAME))?;

        tracing::info!(
            "syncing source {} at {} every {}ms",
            self.options.source_id,
            root.display(),
            self.options.interval.as_millis()
        );

        let mut interval = tokio::time::interval(self.options.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.run_tick().await;
                }
                res = &mut shutdown => {
                    if let Err(e) = res {
                        tracing::warn!("cannot listen for Ctrl-C: {}", e);
                    }
                    tracing::info!("shutting down");
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Take the exclusive daemon lock at `lock_path`.
///
/// The lock is held until the returned file is dropped.
pub fn acquire_lock(lock_path: &Path) -> Result<File> {
    use fs2::FileExt;

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)?;

    file.try_lock_exclusive()
        .map_err(|_| Error::LockHeld(lock_path.display().to_string()))?;

    Ok(file)
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
