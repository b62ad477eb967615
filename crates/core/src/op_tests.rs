// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

#[parameterized(
    zero = { 0, 1000 },
    first = { 1, 1000 },
    second = { 2, 2000 },
    third = { 3, 4000 },
    sixth = { 6, 32_000 },
    seventh_capped = { 7, 60_000 },
    huge_capped = { 1000, 60_000 },
    max_capped = { u32::MAX, 60_000 },
)]
fn backoff_values(attempts: u32, expected_ms: u64) {
    assert_eq!(backoff(attempts), Duration::from_millis(expected_ms));
}

#[test]
fn backoff_is_non_decreasing() {
    let mut prev = Duration::ZERO;
    for attempts in 1..=64 {
        let delay = backoff(attempts);
        assert!(delay >= prev, "backoff({}) decreased", attempts);
        assert!(delay <= Duration::from_millis(BACKOFF_MAX_MS));
        prev = delay;
    }
}

#[test]
fn new_operations_are_ready_immediately() {
    let op = OutboundOperation::upsert(
        "op-1".into(),
        "a.md".into(),
        "hi".into(),
        "h".into(),
        None,
        now(),
    );
    assert!(op.is_ready(now()));
    assert_eq!(op.attempts, 0);
    assert_eq!(op.content_type, "text/markdown");
}

#[test]
fn record_failure_schedules_backoff() {
    let mut op = OutboundOperation::delete("op-1".into(), "a.md".into(), Some("h".into()), now());

    op.record_failure("connection refused", now());
    assert_eq!(op.attempts, 1);
    assert_eq!(op.last_error.as_deref(), Some("connection refused"));
    assert_eq!(op.next_attempt_at, now() + chrono::Duration::seconds(1));
    assert!(!op.is_ready(now()));

    op.record_failure("timeout", now());
    assert_eq!(op.attempts, 2);
    assert_eq!(op.next_attempt_at, now() + chrono::Duration::seconds(2));
    assert!(op.is_ready(now() + chrono::Duration::seconds(2)));
}

#[test]
fn delete_push_item_has_empty_content() {
    let op = OutboundOperation::delete("op-9".into(), "gone.md".into(), Some("h".into()), now());
    let item = op.to_push_item();
    assert!(item.is_delete);
    assert!(item.content.is_empty());
    assert!(item.content_hash.is_empty());
    assert_eq!(item.base_hash.as_deref(), Some("h"));
    assert_eq!(item.operation_id, "op-9");
}
