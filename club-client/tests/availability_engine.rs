// club-client/tests/availability_engine.rs
// Availability engine against the in-memory backend

mod common;

use chrono::NaiveTime;
use chrono_tz::{America::New_York, Tz, UTC};
use club_client::AvailabilitySource;
use common::*;

fn at(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

// ========== Tee times ==========

#[tokio::test]
async fn test_future_date_without_bookings() {
    let backend = MockBackend::new();
    let (engine, _) = engine(backend.clone(), local(UTC, date(2025, 6, 19), 12, 0), UTC);

    let slots = engine.tee_time_slots(date(2025, 6, 20)).await;

    assert_eq!(slots.source, AvailabilitySource::Computed);
    assert_eq!(slots.items.len(), 52);
    assert!(slots.items.iter().all(|s| s.available));
    assert_eq!(slots.open_times().next(), Some("06:00"));
    assert_eq!(backend.calls(TEE_BOOKINGS), 1);
}

#[tokio::test]
async fn test_booked_tee_time_is_closed() {
    let tz: Tz = New_York;
    let day = date(2025, 6, 21);
    let backend = MockBackend::new();
    backend.book_tee_time(local(tz, day, 9, 0));
    // Same wall-clock time on another day
    backend.book_tee_time(local(tz, date(2025, 6, 22), 10, 0));

    let (engine, _) = engine(backend, local(tz, date(2025, 6, 20), 9, 7), tz);
    let slots = engine.tee_time_slots(day).await;

    let closed: Vec<&str> = slots
        .items
        .iter()
        .filter(|s| !s.available)
        .map(|s| s.time.as_str())
        .collect();
    assert_eq!(closed, vec!["09:00"]);
    assert_eq!(slots.items.len(), 52);
}

#[tokio::test]
async fn test_cancelled_tee_time_stays_open() {
    let day = date(2025, 6, 21);
    let backend = MockBackend::new();
    backend.cancel_tee_time(local(UTC, day, 9, 0));
    backend.book_tee_time(local(UTC, day, 9, 15));

    let (engine, _) = engine(backend, local(UTC, date(2025, 6, 20), 12, 0), UTC);
    let slots = engine.tee_time_slots(day).await;

    assert!(slots.is_open("09:00"));
    assert!(!slots.is_open("09:15"));
}

#[tokio::test]
async fn test_today_hides_past_slots() {
    let tz: Tz = New_York;
    let today = date(2025, 6, 20);
    let (engine, clock) = engine(MockBackend::new(), local(tz, today, 9, 7), tz);

    let slots = engine.tee_time_slots(today).await;
    assert_eq!(slots.open_times().next(), Some("09:15"));
    assert!(
        slots
            .open_times()
            .all(|t| shared::util::parse_time_of_day(t).unwrap() > at(9, 7))
    );

    // Exactly on a slot boundary the slot itself has started
    clock.set(local(tz, today, 9, 15));
    let slots = engine.tee_time_slots(today).await;
    assert_eq!(slots.open_times().next(), Some("09:30"));
}

#[tokio::test]
async fn test_tee_fetch_failure_degrades_visibly() {
    let backend = MockBackend::new();
    backend.fail(TEE_BOOKINGS, "upstream timeout");
    backend.book_tee_time(local(UTC, date(2025, 6, 20), 9, 0));
    let (engine, _) = engine(backend, local(UTC, date(2025, 6, 19), 12, 0), UTC);

    let slots = engine.tee_time_slots(date(2025, 6, 20)).await;

    assert!(slots.is_degraded());
    assert_eq!(slots.degraded_reason(), Some("upstream timeout"));
    assert_eq!(slots.items.len(), 52);
    assert!(slots.is_open("09:00"));
}

// ========== Dining slots ==========

#[tokio::test]
async fn test_dining_overlap_computed_locally() {
    let day = date(2025, 6, 20);
    let backend = MockBackend::new();
    let venue = backend.add_venue("Grill Room");
    let big = backend.add_table(venue, "1", 6);
    backend.add_table(venue, "2", 4);
    backend.book_table(venue, big.id, local(UTC, day, 18, 0), 120);
    backend.fail(SLOT_COUNTS, "function get_dining_time_slots does not exist");

    let (engine, _) = engine(backend.clone(), local(UTC, date(2025, 6, 19), 12, 0), UTC);
    let slots = engine.dining_slots(venue, day, 6).await;

    assert_eq!(slots.source, AvailabilitySource::Computed);
    assert_eq!(slots.items.len(), 22);
    assert!(!slots.is_open("18:30"));
    assert!(slots.is_open("20:30"));
    assert!(slots.is_open("20:00"));
    assert!(!slots.is_open("16:30"));
    assert_eq!(slots.items.last().map(|s| s.time.as_str()), Some("21:30"));

    // A party of four still has table 2 all evening
    let slots = engine.dining_slots(venue, day, 4).await;
    assert!(slots.is_open("18:30"));
    assert_eq!(backend.calls(SLOT_COUNTS), 2);
}

#[tokio::test]
async fn test_dining_prefers_backend_counts() {
    let day = date(2025, 6, 20);
    let backend = MockBackend::new();
    let venue = backend.add_venue("Terrace");
    backend.set_slot_counts(venue, day, &[("18:30", 0), ("18:00", 2), ("19:00", 1)]);

    let (engine, _) = engine(backend.clone(), local(UTC, day, 18, 10), UTC);
    let slots = engine.dining_slots(venue, day, 2).await;

    assert_eq!(slots.source, AvailabilitySource::Backend);
    let times: Vec<&str> = slots.items.iter().map(|s| s.time.as_str()).collect();
    assert_eq!(times, vec!["18:00", "18:30", "19:00"]);
    // 18:00 has passed, 18:30 is full
    assert_eq!(slots.open_times().collect::<Vec<_>>(), vec!["19:00"]);
    assert_eq!(backend.calls(ALL_TABLES), 0);
}

#[tokio::test]
async fn test_backend_counts_leave_capacity_to_tables() {
    let day = date(2025, 6, 20);
    let backend = MockBackend::new();
    let venue = backend.add_venue("Terrace");
    backend.add_table(venue, "1", 2);
    backend.set_slot_counts(venue, day, &[("19:00", 1)]);

    let (engine, _) = engine(backend, local(UTC, date(2025, 6, 19), 12, 0), UTC);

    // Counts are venue-wide, so a party of 6 still sees the slot
    let slots = engine.dining_slots(venue, day, 6).await;
    assert_eq!(slots.source, AvailabilitySource::Backend);
    assert!(slots.is_open("19:00"));

    let tables = engine.dining_tables(venue, day, at(19, 0), 6).await;
    assert_eq!(tables.source, AvailabilitySource::Backend);
    assert!(tables.items.is_empty());
}

#[tokio::test]
async fn test_dining_total_failure_is_optimistic_and_flagged() {
    let day = date(2025, 6, 20);
    let backend = MockBackend::new();
    let venue = backend.add_venue("Terrace");
    backend.fail(SLOT_COUNTS, "rpc failed");
    backend.fail(ALL_TABLES, "permission denied for table tables");

    let (engine, _) = engine(backend, local(UTC, day, 15, 45), UTC);
    let slots = engine.dining_slots(venue, day, 2).await;

    assert!(slots.is_degraded());
    assert_eq!(slots.degraded_reason(), Some("permission denied for table tables"));
    assert_eq!(slots.items.len(), 22);
    // Past rule still applies in degraded mode
    assert_eq!(slots.open_times().next(), Some("16:00"));
    assert_eq!(slots.open_times().count(), 12);
}

// ========== Dining tables ==========

#[tokio::test]
async fn test_tables_from_backend() {
    let day = date(2025, 6, 20);
    let backend = MockBackend::new();
    let venue = backend.add_venue("Grill Room");
    let booked = backend.add_table(venue, "1", 6);
    let free = backend.add_table(venue, "2", 6);
    backend.add_table(venue, "3", 2);
    backend.book_table(venue, booked.id, local(UTC, day, 18, 0), 120);

    let (engine, _) = engine(backend.clone(), local(UTC, date(2025, 6, 19), 12, 0), UTC);
    let tables = engine.dining_tables(venue, day, at(19, 0), 4).await;

    assert_eq!(tables.source, AvailabilitySource::Backend);
    assert_eq!(tables.items, vec![free]);
    assert_eq!(backend.calls(ALL_TABLES), 0);
}

#[tokio::test]
async fn test_tables_fallback_excludes_booked() {
    let day = date(2025, 6, 20);
    let backend = MockBackend::new();
    let venue = backend.add_venue("Grill Room");
    let booked = backend.add_table(venue, "1", 6);
    let free = backend.add_table(venue, "2", 6);
    backend.book_table(venue, booked.id, local(UTC, day, 18, 0), 120);
    backend.fail(AVAILABLE_TABLES, "rpc failed");

    let (engine, _) = engine(backend.clone(), local(UTC, date(2025, 6, 19), 12, 0), UTC);

    let tables = engine.dining_tables(venue, day, at(19, 0), 6).await;
    assert_eq!(tables.source, AvailabilitySource::Computed);
    assert_eq!(tables.items, vec![free.clone()]);

    // Without bookings every eligible table is offered, flagged
    backend.fail(TABLE_BOOKINGS, "bookings unavailable");
    let tables = engine.dining_tables(venue, day, at(19, 0), 6).await;
    assert!(tables.is_degraded());
    assert_eq!(tables.items, vec![booked, free]);
}

#[tokio::test]
async fn test_tables_fallback_without_tables() {
    let backend = MockBackend::new();
    let venue = backend.add_venue("Grill Room");
    backend.fail(AVAILABLE_TABLES, "rpc failed");
    backend.fail(ALL_TABLES, "tables unavailable");

    let (engine, _) = engine(backend, local(UTC, date(2025, 6, 19), 12, 0), UTC);
    let tables = engine.dining_tables(venue, date(2025, 6, 20), at(19, 0), 2).await;

    assert!(tables.is_degraded());
    assert!(tables.items.is_empty());
}
