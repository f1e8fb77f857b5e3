use std::time::Duration;
use transport_log::TieBreak;
use transport_log::compute::temporal::{resolve_window, select_sample};
use transport_log::prelude::*;

/// Test 1: Payloads with embedded zero bytes survive and are detached from the source
#[test]
fn test_payload_with_zero_bytes() {
    let mut source = vec![0u8, 1, 0, 2, 0];
    let msg = Message::new(Duration::from_nanos(9), &source, "raw.Bytes", "/raw");
    source.fill(0xff);

    assert_eq!(msg.data(), &[0u8, 1, 0, 2, 0]);
    assert_eq!(msg.len_bytes(), 5);
}

/// Test 2: Default message is an empty placeholder and cannot be recorded
#[test]
fn test_default_message_placeholder() {
    let msg = Message::default();
    assert!(msg.data().is_empty());
    assert!(msg.message_type().is_empty());
    assert!(msg.topic().is_empty());
    assert_eq!(msg.time_received(), Duration::ZERO);

    let mut store = MessageStore::new();
    assert!(matches!(store.insert(msg), Err(LogError::InvalidInput(_))));
}

/// Test 3: Extreme time stamps
#[test]
fn test_extreme_times() {
    let max = Duration::from_nanos(u64::MAX);
    let range = QualifiedTimeRange::new(QualifiedTime::at(Duration::ZERO), QualifiedTime::at(max));
    assert!(range.is_valid());

    let mut store = MessageStore::new();
    store
        .insert(Message::new(Duration::ZERO, b"first", "pkg.Msg", "/t"))
        .unwrap();
    store
        .insert(Message::new(max, b"last", "pkg.Msg", "/t"))
        .unwrap();

    assert_eq!(store.query(&AllTopics::new(range)).unwrap().len(), 2);

    let after_last = QualifiedTime::new(max, Qualifier::ClosestAfter);
    assert!(store.lookup(&after_last, None).is_none());
    let before_first = QualifiedTime::new(Duration::ZERO, Qualifier::ClosestBefore);
    assert!(store.lookup(&before_first, None).is_none());
}

/// Test 4: Empty store answers every query with an empty batch
#[test]
fn test_empty_store_queries() {
    let store = MessageStore::new();
    assert_eq!(store.start_time(), None);
    assert_eq!(store.end_time(), None);
    assert!(store.topics().is_empty());

    for q in Qualifier::ALL {
        let range = QualifiedTimeRange::from_start(QualifiedTime::new(Duration::from_secs(1), q));
        assert!(store.query(&AllTopics::new(range)).unwrap().is_empty());
        assert!(
            store
                .lookup(&QualifiedTime::new(Duration::from_secs(1), q), None)
                .is_none()
        );
    }
}

/// Test 5: Every sample at a duplicated boundary stamp is part of the window
#[test]
fn test_duplicate_stamps_at_window_edges() {
    let samples: Vec<Duration> = [5, 5, 5, 10, 10].into_iter().map(Duration::from_nanos).collect();

    let start = QualifiedTimeRange::from_start(QualifiedTime::new(
        Duration::from_nanos(7),
        Qualifier::OrClosestBefore,
    ));
    assert_eq!(resolve_window(&samples, &start), Some(0..5));

    let finish = QualifiedTimeRange::until(QualifiedTime::new(
        Duration::from_nanos(7),
        Qualifier::ClosestAfter,
    ));
    assert_eq!(resolve_window(&samples, &finish), Some(0..5));

    let edge = QualifiedTime::new(Duration::from_nanos(7), Qualifier::OrClosestBefore);
    assert_eq!(select_sample(&samples, &edge, TieBreak::Earliest), Some(0));
    assert_eq!(select_sample(&samples, &edge, TieBreak::Latest), Some(2));
}

/// Test 6: Cleared and taken values behave as fresh indeterminate values
#[test]
fn test_cleared_and_taken_values() {
    let mut range = QualifiedTimeRange::new(
        QualifiedTime::at(Duration::from_secs(3)),
        QualifiedTime::at(Duration::from_secs(1)),
    );
    assert!(!range.is_valid());

    let taken = std::mem::take(&mut range);
    assert!(range.is_valid());
    assert!(range.start().is_indeterminate());
    assert!(!taken.is_valid());

    let mut start = *taken.start();
    start.clear();
    assert!(start.is_indeterminate());
    assert_eq!(taken.start().time(), Some(Duration::from_secs(3)));
}
