// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! docsync-remote: reference sync server for docsync connectors.
//!
//! Keeps tracked files, change history and conflicts in memory per
//! workspace and serves them over the HTTP sync API. The [`testing`]
//! module runs it on a random port for client tests.

pub mod error;
pub mod server;
pub mod state;
pub mod testing;

pub use error::{Result, ServerError};
pub use server::{router, serve};
pub use state::ServerState;
