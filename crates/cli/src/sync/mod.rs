// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Synchronization with the document server.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Queue     │────►│  RemoteApi  │────►│   Server    │
//! │ (plan/flush)│     │   (trait)   │     │             │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │
//!                            ▼
//!                     ┌─────────────┐
//!                     │   Deltas    │  (pull into local tree)
//!                     └─────────────┘
//! ```
//!
//! # Features
//!
//! - HTTP transport with bearer auth and a per-request timeout
//! - Outbound queue with FIFO batches and exponential backoff
//! - Cursor-based pull of remote changes with echo suppression
//! - Injectable transport trait for testing

mod delta;
mod queue;
mod transport;

pub use delta::{apply_deltas, DeltaReport, PAGE_LIMIT};
pub use queue::{flush, plan_changes, FlushReport, MAX_BATCH};
pub use transport::{
    ApiFuture, HttpTransport, RemoteApi, TransportError, TransportResult, REQUEST_TIMEOUT,
};

#[cfg(test)]
pub(crate) mod test_helpers;
