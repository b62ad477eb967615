// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Local tree scanner.
//!
//! Walks the synced root in file-name order and returns every Markdown file
//! that passes the size limit and the ignore rules, together with its content
//! and fingerprint.
//!
//! Symbolic links are not followed. A symlinked Markdown file is left out
//! of the sync and reported as skipped.

use std::collections::BTreeSet;
use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, Result};
use crate::hash::{fingerprint, relative_key};
use crate::ignore::IgnoreRules;
use crate::state::is_reserved;

/// Directory names never descended into.
pub const SKIPPED_DIRS: &[&str] = &[".git", ".hg", ".svn", "node_modules"];

/// File extensions of the synchronized content type.
pub const SYNCED_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Content type sent with every synchronized file.
pub const CONTENT_TYPE: &str = "text/markdown";

/// Default soft cap on the number of files per scan.
pub const DEFAULT_MAX_FILES: usize = 5000;

/// Default per-file size limit in bytes.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 1024 * 1024;

/// Limits applied while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLimits {
    /// Stop after this many files were included.
    pub max_files: usize,
    /// Files larger than this are skipped.
    pub max_file_bytes: u64,
}

impl Default for ScanLimits {
    fn default() -> Self {
        ScanLimits {
            max_files: DEFAULT_MAX_FILES,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

/// A file observed during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    /// Canonical root-relative path.
    pub relative_path: String,
    /// Fingerprint of `content`.
    pub fingerprint: String,
    /// File content.
    pub content: String,
}

/// Result of scanning a root.
#[derive(Debug, Default)]
pub struct Scan {
    /// Included files in walk order.
    pub files: Vec<ScannedFile>,
    /// Files skipped for exceeding the size limit.
    pub oversize: usize,
    /// Files rejected by the ignore rules.
    pub ignored: usize,
    /// Whether the walk stopped at the file cap.
    pub truncated: bool,
    /// Files present on disk but left out: oversize, ignored, symlinked or
    /// not valid UTF-8.
    pub skipped: BTreeSet<String>,
    /// Entries that could not be read. A directory entry covers everything
    /// below it; `""` is the root itself.
    pub unreadable: Vec<String>,
}

impl Scan {
    /// Whether the walk proves that `path`, missing from `files`, is gone.
    ///
    /// A truncated walk, a skipped file or an unreadable ancestor proves
    /// nothing.
    pub fn confirms_absent(&self, path: &str) -> bool {
        if self.truncated || self.skipped.contains(path) {
            return false;
        }
        !self.unreadable.iter().any(|entry| {
            entry.is_empty()
                || path == entry
                || path
                    .strip_prefix(entry.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

/// Whether a path has the synchronized extension.
pub fn is_synced_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SYNCED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

/// Scan `root` for synchronized files.
pub fn scan(root: &Path, rules: &IgnoreRules, limits: ScanLimits) -> Result<Scan> {
    let meta = std::fs::metadata(root)
        .map_err(|e| Error::InvalidRoot(format!("{}: {}", root.display(), e)))?;
    if !meta.is_dir() {
        return Err(Error::InvalidRoot(root.display().to_string()));
    }

    let mut result = Scan::default();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("skipping unreadable entry: {}", e);
                let key = e
                    .path()
                    .and_then(|p| relative_key(root, p))
                    .unwrap_or_default();
                result.unreadable.push(key);
                continue;
            }
        };
        if !is_synced_file(entry.path()) {
            continue;
        }
        let file_type = entry.file_type();
        if !file_type.is_file() && !file_type.is_symlink() {
            continue;
        }
        let Some(key) = relative_key(root, entry.path()) else {
            continue;
        };
        if is_reserved(&key) {
            continue;
        }
        if file_type.is_symlink() {
            tracing::debug!("skipping {}: symbolic link", key);
            result.skipped.insert(key);
            continue;
        }

        if result.files.len() >= limits.max_files {
            tracing::debug!("file cap of {} reached, stopping scan", limits.max_files);
            result.truncated = true;
            break;
        }

        let size = match entry.metadata() {
            Ok(m) => m.len(),
            Err(e) => {
                tracing::warn!("skipping {}: {}", key, e);
                result.unreadable.push(key);
                continue;
            }
        };
        if size > limits.max_file_bytes {
            tracing::debug!("skipping {} ({} bytes over limit)", key, size);
            result.oversize += 1;
            result.skipped.insert(key);
            continue;
        }
        if !rules.allows(&key) {
            result.ignored += 1;
            result.skipped.insert(key);
            continue;
        }

        let bytes = match std::fs::read(entry.path()) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("skipping {}: {}", key, e);
                result.unreadable.push(key);
                continue;
            }
        };
        let fingerprint = fingerprint(&bytes);
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(_) => {
                tracing::warn!("skipping {}: not valid UTF-8", key);
                result.skipped.insert(key);
                continue;
            }
        };

        result.files.push(ScannedFile {
            relative_path: key,
            fingerprint,
            content,
        });
    }

    Ok(result)
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
