// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Line-level conflict previews and manual-merge templates.

use crate::protocol::{ConflictPreview, LineChange, PreviewSummary};

/// Marker opening the local side of a merge template.
pub const MARKER_LOCAL: &str = "<<<<<<< local";
/// Marker separating the two sides.
pub const MARKER_SEPARATOR: &str = "=======";
/// Marker closing the remote side.
pub const MARKER_REMOTE: &str = ">>>>>>> remote";

/// Compare two texts line by line at equal positions.
///
/// Line numbers are 1-based; a side that has run out of lines reports `None`.
pub fn line_changes(local: &str, remote: &str) -> Vec<LineChange> {
    let local_lines: Vec<&str> = local.lines().collect();
    let remote_lines: Vec<&str> = remote.lines().collect();
    let len = local_lines.len().max(remote_lines.len());

    (0..len)
        .filter_map(|i| {
            let l = local_lines.get(i).copied();
            let r = remote_lines.get(i).copied();
            (l != r).then(|| LineChange {
                line: i + 1,
                local: l.map(str::to_string),
                remote: r.map(str::to_string),
            })
        })
        .collect()
}

/// Build the preview for a conflicting path.
pub fn preview(relative_path: &str, local: &str, remote: &str) -> ConflictPreview {
    let changes = line_changes(local, remote);
    ConflictPreview {
        relative_path: relative_path.to_string(),
        summary: PreviewSummary {
            different_lines: changes.len(),
        },
        changes,
    }
}

/// Seed text for a manual merge containing both versions between markers.
pub fn merge_template(local: &str, remote: &str) -> String {
    let mut out = String::with_capacity(local.len() + remote.len() + 48);
    out.push_str(MARKER_LOCAL);
    out.push('\n');
    push_block(&mut out, local);
    out.push_str(MARKER_SEPARATOR);
    out.push('\n');
    push_block(&mut out, remote);
    out.push_str(MARKER_REMOTE);
    out.push('\n');
    out
}

fn push_block(out: &mut String, text: &str) {
    out.push_str(text);
    if !text.is_empty() && !text.ends_with('\n') {
        out.push('\n');
    }
}

/// Whether text still contains unresolved merge markers.
///
/// A bare separator line is also a Markdown heading underline, so only the
/// opening and closing markers count.
pub fn has_conflict_markers(text: &str) -> bool {
    text.lines()
        .any(|l| l.starts_with(MARKER_LOCAL) || l.starts_with(MARKER_REMOTE))
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;
