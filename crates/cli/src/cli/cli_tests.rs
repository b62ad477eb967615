// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use super::*;
use clap::CommandFactory;

fn parse(args: &[&str]) -> Command {
    let mut argv = vec!["docsync"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap().command
}

#[test]
fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn test_daemon_interval_is_optional() {
    match parse(&["daemon", "src-1", "/docs"]) {
        Command::Daemon { interval_ms, .. } => assert_eq!(interval_ms, None),
        _ => panic!("expected daemon"),
    }
    match parse(&["daemon", "src-1", "/docs", "250"]) {
        Command::Daemon {
            source_id,
            root,
            interval_ms,
        } => {
            assert_eq!(source_id, "src-1");
            assert_eq!(root, PathBuf::from("/docs"));
            assert_eq!(interval_ms, Some(250));
        }
        _ => panic!("expected daemon"),
    }
}

#[test]
fn test_create_source_mode_spellings() {
    for spelling in ["import-only", "import_only"] {
        match parse(&["create-source", "conn-1", "notes", "--mode", spelling]) {
            Command::CreateSource { mode, .. } => assert_eq!(mode, SourceMode::ImportOnly),
            _ => panic!("expected create-source"),
        }
    }
    match parse(&["create-source", "conn-1", "notes"]) {
        Command::CreateSource { mode, include, .. } => {
            assert_eq!(mode, SourceMode::Bidirectional);
            assert!(include.is_empty());
        }
        _ => panic!("expected create-source"),
    }
}

#[test]
fn test_conflicts_defaults_to_list() {
    match parse(&["conflicts", "src-1"]) {
        Command::Conflicts { action, .. } => assert!(action.is_none()),
        _ => panic!("expected conflicts"),
    }
}

#[test]
fn test_conflicts_resolve_parses_resolution() {
    match parse(&[
        "conflicts",
        "src-1",
        "resolve",
        "c1",
        "manual-merge",
        "--content-file",
        "merged.md",
    ]) {
        Command::Conflicts {
            action:
                Some(ConflictCommand::Resolve {
                    resolution,
                    content_file,
                    ..
                }),
            ..
        } => {
            assert_eq!(resolution, ResolutionKind::ManualMerge);
            assert_eq!(content_file, Some(PathBuf::from("merged.md")));
        }
        _ => panic!("expected conflicts resolve"),
    }
}

#[test]
fn test_invalid_resolution_is_rejected() {
    let err = Cli::try_parse_from(["docsync", "conflicts", "src-1", "resolve", "c1", "merge"]);
    assert!(err.is_err());
}

#[test]
fn test_register_rejects_blank_name() {
    assert!(Cli::try_parse_from(["docsync", "register", "  "]).is_err());
}

#[test]
fn test_save_requires_base_hash_or_new() {
    let bare = Cli::try_parse_from(["docsync", "conflicts", "src-1", "save", "a.md", "edit.md"]);
    assert!(bare.is_err());

    let both = Cli::try_parse_from([
        "docsync",
        "conflicts",
        "src-1",
        "save",
        "a.md",
        "edit.md",
        "--new",
        "--base-hash",
        "h1",
    ]);
    assert!(both.is_err());

    match parse(&["conflicts", "src-1", "save", "a.md", "edit.md", "--base-hash", "h1"]) {
        Command::Conflicts {
            action: Some(ConflictCommand::Save { base_hash, new, .. }),
            ..
        } => {
            assert_eq!(base_hash.as_deref(), Some("h1"));
            assert!(!new);
        }
        _ => panic!("expected conflicts save"),
    }
    match parse(&["conflicts", "src-1", "save", "a.md", "edit.md", "--new"]) {
        Command::Conflicts {
            action: Some(ConflictCommand::Save { base_hash, new, .. }),
            ..
        } => {
            assert_eq!(base_hash, None);
            assert!(new);
        }
        _ => panic!("expected conflicts save"),
    }
}
