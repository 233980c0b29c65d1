//! Time and formatting helpers
//!
//! Times of day travel as `"HH:MM"` strings between the backend and the UI.
//! Timestamps are stored in UTC; the club's own timezone decides what
//! "today" and a slot's wall-clock time mean.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Current UTC time
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Parse a time of day, accepting `HH:MM` and the backend's `HH:MM:SS`
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Format a time of day as zero-padded `HH:MM`
pub fn format_time_of_day(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Parse a calendar date (`YYYY-MM-DD`)
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Render an `HH:MM` slot for display, e.g. `"18:30"` -> `"6:30 PM"`
///
/// Returns the input unchanged when it is not a valid time of day.
pub fn format_12h(value: &str) -> String {
    let Some(time) = parse_time_of_day(value) else {
        return value.to_string();
    };
    let (is_pm, hour) = time.hour12();
    format!(
        "{}:{:02} {}",
        hour,
        time.minute(),
        if is_pm { "PM" } else { "AM" }
    )
}

/// Longest clock jump searched when a local time falls in a DST gap
const MAX_GAP_MINUTES: i64 = 3 * 60;

/// Club-local date + time of day -> UTC instant
///
/// An ambiguous time (clocks going back) takes the later instant. A time in a
/// DST gap takes the first valid instant after the gap; UTC is the last resort.
pub fn local_to_utc(date: NaiveDate, time: NaiveTime, tz: Tz) -> DateTime<Utc> {
    let naive = date.and_time(time);
    if let Some(dt) = tz.from_local_datetime(&naive).latest() {
        return dt.with_timezone(&Utc);
    }
    (1..=MAX_GAP_MINUTES)
        .filter_map(|m| naive.checked_add_signed(Duration::minutes(m)))
        .find_map(|shifted| tz.from_local_datetime(&shifted).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| {
            tracing::warn!(%naive, %tz, "Local time could not be resolved, reading it as UTC");
            naive.and_utc()
        })
}

/// UTC instant -> club-local wall-clock time
pub fn utc_to_local(ts: DateTime<Utc>, tz: Tz) -> NaiveDateTime {
    ts.with_timezone(&tz).naive_local()
}

/// Club-local day -> `[start, end)` UTC bounds
pub fn day_bounds_utc(date: NaiveDate, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let next_day = date.succ_opt().unwrap_or(date);
    (
        local_to_utc(date, NaiveTime::MIN, tz),
        local_to_utc(next_day, NaiveTime::MIN, tz),
    )
}

/// Serde helpers for backend timestamps.
///
/// `timestamptz` columns arrive as RFC 3339 with an offset, plain `timestamp`
/// columns without one; the latter are read as UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(value: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                    .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
                    .map(|naive| naive.and_utc())
                    .ok()
            })
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(parse_time_of_day("06:15"), NaiveTime::from_hms_opt(6, 15, 0));
        assert_eq!(parse_time_of_day("21:30:00"), NaiveTime::from_hms_opt(21, 30, 0));
        assert_eq!(parse_time_of_day("25:00"), None);
        assert_eq!(parse_time_of_day("noon"), None);
    }

    #[test]
    fn test_format_12h() {
        assert_eq!(format_12h("06:00"), "6:00 AM");
        assert_eq!(format_12h("12:00"), "12:00 PM");
        assert_eq!(format_12h("18:30"), "6:30 PM");
        assert_eq!(format_12h("00:15"), "12:15 AM");
        assert_eq!(format_12h("bogus"), "bogus");
    }

    #[test]
    fn test_local_to_utc_respects_timezone() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
        let time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let utc = local_to_utc(date, time, chrono_tz::America::New_York);
        assert_eq!(utc.to_rfc3339(), "2025-06-20T13:00:00+00:00");
        assert_eq!(
            utc_to_local(utc, chrono_tz::America::New_York),
            date.and_time(time)
        );
    }

    #[test]
    fn test_day_bounds_utc() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
        let (start, end) = day_bounds_utc(date, chrono_tz::UTC);
        assert_eq!(start.to_rfc3339(), "2025-06-20T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2025-06-21T00:00:00+00:00");
    }

    #[test]
    fn test_local_to_utc_dst_gap_moves_forward() {
        // New York skips 02:00-03:00 on 2025-03-09; 03:00 EDT is 07:00 UTC.
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let time = NaiveTime::from_hms_opt(2, 30, 0).unwrap();
        let utc = local_to_utc(date, time, chrono_tz::America::New_York);
        assert_eq!(utc.to_rfc3339(), "2025-03-09T07:00:00+00:00");
    }

    #[test]
    fn test_local_to_utc_ambiguous_takes_later() {
        // 01:30 happens twice in New York on 2025-11-02; the second is EST.
        let date = NaiveDate::from_ymd_opt(2025, 11, 2).unwrap();
        let time = NaiveTime::from_hms_opt(1, 30, 0).unwrap();
        let utc = local_to_utc(date, time, chrono_tz::America::New_York);
        assert_eq!(utc.to_rfc3339(), "2025-11-02T06:30:00+00:00");
    }

    #[test]
    fn test_day_bounds_utc_midnight_gap() {
        // Santiago jumps from 00:00 to 01:00 on 2025-09-07; the day starts at 01:00 -03.
        let date = NaiveDate::from_ymd_opt(2025, 9, 7).unwrap();
        let (start, end) = day_bounds_utc(date, chrono_tz::America::Santiago);
        assert_eq!(start.to_rfc3339(), "2025-09-07T04:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2025-09-08T03:00:00+00:00");
    }

    #[test]
    fn test_timestamp_parse_with_and_without_offset() {
        let with_offset = timestamp::parse("2025-06-20T09:00:00-04:00").unwrap();
        assert_eq!(with_offset.to_rfc3339(), "2025-06-20T13:00:00+00:00");

        let naive = timestamp::parse("2025-06-20T09:00:00").unwrap();
        assert_eq!(naive.to_rfc3339(), "2025-06-20T09:00:00+00:00");

        assert!(timestamp::parse("yesterday").is_none());
    }
}
