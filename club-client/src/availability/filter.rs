//! Slot filters
//!
//! Pure functions that take generated (or backend-provided) slots and strike
//! out what is taken or already past. Input order is preserved.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use shared::models::{BookedTable, DiningSlotCount, DiningTable, TimeSlot};
use shared::util::{format_time_of_day, local_to_utc, parse_time_of_day};

/// Close slots at or before `now` (club-local)
///
/// On `now`'s own date a slot starting at or before the current time of day
/// is closed. On an earlier date every slot is closed; later dates are left
/// alone.
pub fn mark_past(slots: &mut [TimeSlot], date: NaiveDate, now: NaiveDateTime) {
    let today = now.date();
    if date > today {
        return;
    }
    for slot in slots.iter_mut() {
        let past = date < today
            || parse_time_of_day(&slot.time).is_none_or(|t| t <= now.time());
        if past {
            slot.close();
        }
    }
}

/// Close every slot whose `HH:MM` matches a booked start time
pub fn filter_tee_times(slots: &mut [TimeSlot], booked: &[NaiveTime]) {
    let taken: std::collections::HashSet<String> =
        booked.iter().copied().map(format_time_of_day).collect();
    for slot in slots.iter_mut() {
        if taken.contains(&slot.time) {
            slot.close();
        }
    }
}

/// Tables seating `party_size` that are free for `[start, start + duration)`
pub fn free_tables<'a>(
    tables: &'a [DiningTable],
    bookings: &[BookedTable],
    start: DateTime<Utc>,
    duration_minutes: u32,
    party_size: u32,
) -> Vec<&'a DiningTable> {
    tables
        .iter()
        .filter(|table| table.capacity >= party_size)
        .filter(|table| {
            !bookings
                .iter()
                .any(|b| b.table_id == table.id && b.overlaps(start, duration_minutes))
        })
        .collect()
}

/// Compute dining availability from the venue's tables and existing bookings
///
/// A slot stays open when at least one table with enough seats has no booking
/// overlapping the reservation interval starting at that slot. The number of
/// such tables becomes the slot's capacity.
pub fn filter_dining(
    slots: &mut [TimeSlot],
    date: NaiveDate,
    tz: Tz,
    tables: &[DiningTable],
    bookings: &[BookedTable],
    party_size: u32,
    duration_minutes: u32,
) {
    for slot in slots.iter_mut() {
        let Some(time) = parse_time_of_day(&slot.time) else {
            slot.close();
            continue;
        };
        let start = local_to_utc(date, time, tz);
        let count = free_tables(tables, bookings, start, duration_minutes, party_size).len();
        slot.available_capacity = Some(count as u32);
        if count == 0 {
            slot.close();
        }
    }
}

/// Build slots from the backend's per-slot table counts
///
/// Times are normalized to `HH:MM` and sorted; rows with an unreadable time
/// are dropped.
pub fn apply_slot_counts(counts: &[DiningSlotCount]) -> Vec<TimeSlot> {
    let mut rows: Vec<(NaiveTime, i64)> = counts
        .iter()
        .filter_map(|c| match parse_time_of_day(&c.time_slot) {
            Some(t) => Some((t, c.available_tables_count)),
            None => {
                tracing::warn!(time_slot = %c.time_slot, "Ignoring slot with unreadable time");
                None
            }
        })
        .collect();
    rows.sort_by_key(|(t, _)| *t);
    rows.dedup_by_key(|(t, _)| *t);

    rows.into_iter()
        .map(|(time, count)| {
            let capacity = u32::try_from(count.max(0)).unwrap_or(u32::MAX);
            TimeSlot {
                time: format_time_of_day(time),
                available: capacity > 0,
                available_capacity: Some(capacity),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::{OperatingWindow, generate_slots};
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn open_times(slots: &[TimeSlot]) -> Vec<&str> {
        slots
            .iter()
            .filter(|s| s.available)
            .map(|s| s.time.as_str())
            .collect()
    }

    fn table(number: &str, capacity: u32) -> DiningTable {
        DiningTable {
            id: Uuid::new_v4(),
            table_number: number.into(),
            capacity,
            location: None,
        }
    }

    #[test]
    fn test_mark_past_today() {
        let day = date(2025, 6, 20);
        let mut slots = generate_slots(&OperatingWindow::TEE_TIME);
        mark_past(&mut slots, day, day.and_time(at(9, 0)));

        // 06:00..=09:00 is 13 slots
        assert_eq!(slots.iter().filter(|s| !s.available).count(), 13);
        assert_eq!(open_times(&slots).first(), Some(&"09:15"));
    }

    #[test]
    fn test_mark_past_mid_slot() {
        let day = date(2025, 6, 20);
        let mut slots = generate_slots(&OperatingWindow::TEE_TIME);
        mark_past(&mut slots, day, day.and_hms_opt(9, 7, 30).unwrap());
        assert_eq!(open_times(&slots).first(), Some(&"09:15"));
    }

    #[test]
    fn test_mark_past_other_days() {
        let today = date(2025, 6, 20);
        let now = today.and_time(at(12, 0));

        let mut tomorrow = generate_slots(&OperatingWindow::TEE_TIME);
        mark_past(&mut tomorrow, date(2025, 6, 21), now);
        assert!(tomorrow.iter().all(|s| s.available));

        let mut yesterday = generate_slots(&OperatingWindow::TEE_TIME);
        mark_past(&mut yesterday, date(2025, 6, 19), now);
        assert!(yesterday.iter().all(|s| !s.available));
    }

    #[test]
    fn test_filter_tee_times_exact_match() {
        let mut slots = generate_slots(&OperatingWindow::TEE_TIME);
        filter_tee_times(&mut slots, &[at(9, 0), at(9, 7)]);

        let closed: Vec<_> = slots.iter().filter(|s| !s.available).collect();
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].time, "09:00");
        assert_eq!(slots.len(), 52);
    }

    #[test]
    fn test_filter_dining_overlap() {
        let tz = chrono_tz::UTC;
        let day = date(2025, 6, 20);
        let big = table("T1", 6);
        let small = table("T2", 4);
        let booking = BookedTable {
            table_id: big.id,
            reservation_datetime: Utc.with_ymd_and_hms(2025, 6, 20, 18, 0, 0).unwrap(),
            duration_minutes: 120,
        };
        let tables = vec![big, small];

        let mut slots = generate_slots(&OperatingWindow::DINING);
        filter_dining(&mut slots, day, tz, &tables, &[booking], 6, 120);

        let by_time = |t: &str| slots.iter().find(|s| s.time == t).unwrap().clone();
        // 16:00 + 120 ends exactly when the booking starts
        assert!(by_time("16:00").available);
        assert!(!by_time("16:30").available);
        assert!(!by_time("18:30").available);
        assert!(!by_time("19:30").available);
        assert!(by_time("20:00").available);
        assert!(by_time("20:30").available);
        assert_eq!(by_time("20:30").available_capacity, Some(1));
    }

    #[test]
    fn test_filter_dining_party_too_large() {
        let mut slots = generate_slots(&OperatingWindow::DINING);
        filter_dining(
            &mut slots,
            date(2025, 6, 20),
            chrono_tz::UTC,
            &[table("T1", 4)],
            &[],
            8,
            120,
        );
        assert!(slots.iter().all(|s| !s.available && s.available_capacity == Some(0)));
    }

    #[test]
    fn test_free_tables() {
        let a = table("A", 2);
        let b = table("B", 4);
        let start = Utc.with_ymd_and_hms(2025, 6, 20, 19, 0, 0).unwrap();
        let booking = BookedTable {
            table_id: b.id,
            reservation_datetime: start - Duration::minutes(60),
            duration_minutes: 120,
        };
        let tables = vec![a.clone(), b];

        let free = free_tables(&tables, &[booking.clone()], start, 120, 2);
        assert_eq!(free, vec![&a]);
        assert!(free_tables(&tables, &[booking], start, 120, 3).is_empty());
    }

    #[test]
    fn test_apply_slot_counts() {
        let counts = vec![
            DiningSlotCount {
                time_slot: "18:30:00".into(),
                available_tables_count: 0,
            },
            DiningSlotCount {
                time_slot: "18:00:00".into(),
                available_tables_count: 3,
            },
            DiningSlotCount {
                time_slot: "garbage".into(),
                available_tables_count: 1,
            },
        ];
        let slots = apply_slot_counts(&counts);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].time, "18:00");
        assert!(slots[0].available);
        assert_eq!(slots[0].available_capacity, Some(3));
        assert_eq!(slots[1].time, "18:30");
        assert!(!slots[1].available);
    }
}
