// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command implementations.
//!
//! Each command talks to the server through a [`RemoteApi`] and returns a
//! serializable result; the dispatcher prints it as pretty JSON.
//!
//! [`RemoteApi`]: crate::sync::RemoteApi

pub mod conflicts;
pub mod connector;
pub mod daemon;
pub mod deltas;
pub mod push;
pub mod source;

use serde::Serialize;

use crate::error::Result;

/// Print a command result as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
