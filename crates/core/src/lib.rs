// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! docsync-core: Shared library for the docsync daemon and server.
//!
//! This crate provides fingerprints, path normalization, ignore rules, the
//! tree scanner, the wire protocol, outbound operations, the persisted daemon
//! state, and conflict previews used by both the `docsync` CLI and
//! `docsync-remote`.

pub mod diff;
pub mod error;
pub mod hash;
pub mod ignore;
pub mod op;
pub mod protocol;
pub mod scan;
pub mod state;

pub use error::{Error, Result};
pub use hash::{fingerprint, normalize_path};
pub use ignore::IgnoreRules;
pub use op::{backoff, OutboundOperation};
pub use protocol::{
    Conflict, ConflictPreview, ConflictStatus, DeltaChange, DeltaEvent, DeltaPage, Resolution,
    ResolutionKind, Source, SourceMode, SourceStatus,
};
pub use scan::{scan, Scan, ScanLimits, ScannedFile};
pub use state::DaemonState;
