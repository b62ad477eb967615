// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The sync daemon.
//!
//! A daemon owns one source bound to one local root. On every tick it
//! pushes local changes to the server and, for bidirectional sources, pulls
//! remote changes back. State is persisted after every tick so a restart
//! resumes where the last tick left off.

mod runner;

pub use runner::{
    acquire_lock, Daemon, DaemonOptions, TickOutcome, TickReport, DEFAULT_INTERVAL,
    HEARTBEAT_INTERVAL,
};
