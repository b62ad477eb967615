// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Include/exclude globs and ignore-file rules.
//!
//! Globs compile to anchored regular expressions over canonical relative
//! paths (`/`-separated). A path survives when it matches an include (if any
//! are configured), matches no exclude, and the ignore-file rules, evaluated
//! in order with the last match winning, leave it un-ignored.

use std::path::Path;

use regex::Regex;

use crate::error::{Error, Result};

/// Name of the ignore file read from the synced root.
pub const IGNORE_FILE_NAME: &str = ".docsyncignore";

/// Compile a glob into an anchored regex.
///
/// `**/` matches zero or more leading directories, `**` anywhere else
/// matches across separators, `*` stays within one segment and `?` matches a
/// single non-separator character.
///
/// Empty globs and globs that climb out of the root with `..` are rejected.
pub fn glob_to_regex(glob: &str) -> Result<Regex> {
    let invalid = |reason: &str| Error::InvalidPattern {
        pattern: glob.to_string(),
        reason: reason.to_string(),
    };
    if glob.trim().is_empty() {
        return Err(invalid("empty pattern"));
    }
    if glob.split('/').any(|segment| segment == "..") {
        return Err(invalid("patterns cannot leave the root"));
    }

    let mut re = String::with_capacity(glob.len() * 2 + 2);
    re.push('^');

    let mut chars = glob.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                if chars.peek() == Some(&'/') {
                    chars.next();
                    re.push_str("(?:.*/)?");
                } else {
                    re.push_str(".*");
                }
            }
            '*' => re.push_str("[^/]*"),
            '?' => re.push_str("[^/]"),
            other => {
                let mut buf = [0u8; 4];
                re.push_str(&regex::escape(other.encode_utf8(&mut buf)));
            }
        }
    }
    re.push('$');

    Regex::new(&re).map_err(|e| Error::InvalidPattern {
        pattern: glob.to_string(),
        reason: e.to_string(),
    })
}

/// One compiled line of an ignore file.
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    regex: Regex,
    negated: bool,
}

impl IgnoreRule {
    /// Parse one ignore-file line. Blank lines and comments yield `None`.
    ///
    /// A leading `!` re-includes, a leading `/` anchors to the root, a
    /// trailing `/` covers everything below a directory, and a pattern
    /// without an inner `/` matches at any depth.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (negated, body) = match line.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, line),
        };

        let dir_only = body.ends_with('/');
        let trimmed = body.trim_end_matches('/');
        let (anchored, core) = match trimmed.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (trimmed.contains('/'), trimmed),
        };
        if core.is_empty() {
            return Ok(None);
        }

        let mut glob = String::new();
        if !anchored && !core.starts_with("**") {
            glob.push_str("**/");
        }
        glob.push_str(core);
        if dir_only {
            glob.push_str("/**");
        }

        Ok(Some(IgnoreRule {
            regex: glob_to_regex(&glob)?,
            negated,
        }))
    }

    /// Whether the rule matches the path.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Whether the rule re-includes matches instead of ignoring them.
    pub fn is_negated(&self) -> bool {
        self.negated
    }
}

/// Compiled include/exclude globs plus ignore-file rules.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    includes: Vec<Regex>,
    excludes: Vec<Regex>,
    rules: Vec<IgnoreRule>,
}

impl IgnoreRules {
    /// Compile include/exclude globs and ignore-file lines.
    pub fn new<G: AsRef<str>, L: AsRef<str>>(
        includes: &[G],
        excludes: &[G],
        ignore_lines: &[L],
    ) -> Result<Self> {
        Ok(IgnoreRules {
            includes: compile_globs(includes)?,
            excludes: compile_globs(excludes)?,
            rules: parse_rules(ignore_lines)?,
        })
    }

    /// Compile globs plus the ignore file found at `root`, if any.
    ///
    /// A malformed ignore file is logged and skipped rather than failing.
    pub fn load<G: AsRef<str>>(root: &Path, includes: &[G], excludes: &[G]) -> Result<Self> {
        let lines = read_ignore_file(root)?;
        let rules = parse_rules(&lines).unwrap_or_else(|e| {
            tracing::warn!("skipping {}: {}", IGNORE_FILE_NAME, e);
            Vec::new()
        });
        Ok(IgnoreRules {
            includes: compile_globs(includes)?,
            excludes: compile_globs(excludes)?,
            rules,
        })
    }

    /// Whether a canonical relative path survives all rules.
    pub fn allows(&self, path: &str) -> bool {
        if !self.includes.is_empty() && !self.includes.iter().any(|r| r.is_match(path)) {
            return false;
        }
        if self.excludes.iter().any(|r| r.is_match(path)) {
            return false;
        }
        !self.is_ignored(path)
    }

    /// Whether the ignore-file rules ignore the path. Last match wins.
    pub fn is_ignored(&self, path: &str) -> bool {
        let mut ignored = false;
        for rule in &self.rules {
            if rule.matches(path) {
                ignored = !rule.is_negated();
            }
        }
        ignored
    }
}

fn compile_globs<G: AsRef<str>>(globs: &[G]) -> Result<Vec<Regex>> {
    globs.iter().map(|g| glob_to_regex(g.as_ref())).collect()
}

fn parse_rules<L: AsRef<str>>(lines: &[L]) -> Result<Vec<IgnoreRule>> {
    let mut rules = Vec::new();
    for line in lines {
        if let Some(rule) = IgnoreRule::parse(line.as_ref())? {
            rules.push(rule);
        }
    }
    Ok(rules)
}

/// Read the ignore file lines at `root`. A missing file yields no lines.
pub fn read_ignore_file(root: &Path) -> Result<Vec<String>> {
    match std::fs::read_to_string(root.join(IGNORE_FILE_NAME)) {
        Ok(content) => Ok(content.lines().map(str::to_string).collect()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[path = "ignore_tests.rs"]
mod tests;
