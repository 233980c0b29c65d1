//! Booking requests
//!
//! A [`BookingForm`] holds what the member has selected and typed. Turning it
//! into a [`TeeTimeRequest`] or [`DiningRequest`] is the only place form input
//! is validated, and it never touches the network.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{DiningReservationCreate, DiningTable, TeeTimeCreate};
use shared::util::{local_to_utc, parse_time_of_day};
use uuid::Uuid;

use crate::availability::ResourceKind;

/// Notes and special requests
pub const MAX_NOTE_LEN: usize = 500;

/// Selections and raw text input of one booking screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub date: Option<NaiveDate>,
    /// Selected slot, `HH:MM`
    pub time: Option<String>,
    /// Dining only
    pub venue_id: Option<Uuid>,
    /// Dining only
    pub table: Option<DiningTable>,
    /// Players (tee time) or party size (dining), as typed
    pub party_size: String,
    /// As typed; empty means none
    pub guest_count: String,
    pub notes: String,
}

impl BookingForm {
    /// Tee time form with one player and no guests
    pub fn tee_time() -> Self {
        Self {
            party_size: "1".into(),
            guest_count: "0".into(),
            ..Default::default()
        }
    }

    /// Dining form for a party of two
    pub fn dining() -> Self {
        Self {
            party_size: "2".into(),
            guest_count: "0".into(),
            ..Default::default()
        }
    }

    /// Whether every selection a tee time needs has been made
    pub fn is_tee_time_complete(&self) -> bool {
        self.date.is_some() && self.time.is_some()
    }

    /// Whether every selection a dining reservation needs has been made
    pub fn is_dining_complete(&self) -> bool {
        self.venue_id.is_some() && self.date.is_some() && self.time.is_some() && self.table.is_some()
    }

    /// Validate as a tee time booking; `now` is club-local
    pub fn tee_time_request(&self, now: NaiveDateTime) -> AppResult<TeeTimeRequest> {
        let date = self.date.ok_or_else(|| AppError::required("date"))?;
        let time = self.selected_time()?;
        if !ResourceKind::TeeTime.window().contains(time) {
            return Err(AppError::with_message(
                ErrorCode::TeeTimeOutsideWindow,
                format!("{} is not a tee time", shared::util::format_time_of_day(time)),
            ));
        }
        if date.and_time(time) <= now {
            return Err(AppError::new(ErrorCode::TeeTimeInPast));
        }

        Ok(TeeTimeRequest {
            date,
            time,
            players: parse_party_size(&self.party_size)?,
            guests: parse_guest_count(&self.guest_count)?,
            notes: parse_notes(&self.notes)?,
        })
    }

    /// Validate as a dining reservation; `now` is club-local
    pub fn dining_request(&self, now: NaiveDateTime) -> AppResult<DiningRequest> {
        let venue_id = self.venue_id.ok_or_else(|| AppError::required("venue"))?;
        let date = self.date.ok_or_else(|| AppError::required("date"))?;
        let time = self.selected_time()?;
        let table = self.table.clone().ok_or_else(|| AppError::required("table"))?;
        if !ResourceKind::Dining.window().contains(time) {
            return Err(AppError::with_message(
                ErrorCode::DiningSlotUnavailable,
                format!("{} is not a dining time", shared::util::format_time_of_day(time)),
            ));
        }
        if date.and_time(time) <= now {
            return Err(AppError::validation("That time has already passed"));
        }

        let party_size = parse_party_size(&self.party_size)?;
        if table.capacity < party_size {
            return Err(AppError::with_message(
                ErrorCode::TableTooSmall,
                format!(
                    "Table {} seats {}, not enough for a party of {}",
                    table.table_number, table.capacity, party_size
                ),
            ));
        }

        Ok(DiningRequest {
            venue_id,
            date,
            time,
            table,
            party_size,
            guests: parse_guest_count(&self.guest_count)?,
            special_requests: parse_notes(&self.notes)?,
        })
    }

    fn selected_time(&self) -> AppResult<NaiveTime> {
        let raw = self.time.as_deref().ok_or_else(|| AppError::required("time"))?;
        parse_time_of_day(raw).ok_or_else(|| {
            AppError::with_message(ErrorCode::InvalidFormat, format!("Invalid time: {}", raw))
        })
    }
}

// ============================================================================
// Validated requests
// ============================================================================

/// Validated tee time booking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeeTimeRequest {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub players: u32,
    pub guests: u32,
    pub notes: Option<String>,
}

impl TeeTimeRequest {
    pub fn start_utc(&self, tz: Tz) -> DateTime<Utc> {
        local_to_utc(self.date, self.time, tz)
    }

    pub fn into_create(self, user_id: Uuid, tz: Tz) -> TeeTimeCreate {
        TeeTimeCreate {
            user_id,
            start_time: self.start_utc(tz),
            players_count: self.players,
            guest_count: self.guests,
            notes: self.notes,
        }
    }
}

/// Validated dining reservation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiningRequest {
    pub venue_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub table: DiningTable,
    pub party_size: u32,
    pub guests: u32,
    pub special_requests: Option<String>,
}

impl DiningRequest {
    pub fn start_utc(&self, tz: Tz) -> DateTime<Utc> {
        local_to_utc(self.date, self.time, tz)
    }

    pub fn into_create(
        self,
        member_id: Uuid,
        tz: Tz,
        duration_minutes: u32,
    ) -> DiningReservationCreate {
        DiningReservationCreate {
            member_id,
            table_id: self.table.id,
            reservation_datetime: self.start_utc(tz),
            party_size: self.party_size,
            guest_count: self.guests,
            special_requests: self.special_requests,
            duration_minutes,
        }
    }
}

// ============================================================================
// Field parsing
// ============================================================================

fn parse_count(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Party size: a whole number of at least 1
pub fn parse_party_size(text: &str) -> AppResult<u32> {
    match parse_count(text) {
        Some(n) if n >= 1 => Ok(n),
        _ => Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "Party size must be a whole number of at least 1",
        )
        .with_detail("field", "party_size")),
    }
}

/// Guest count: a whole number, empty meaning zero
pub fn parse_guest_count(text: &str) -> AppResult<u32> {
    if text.trim().is_empty() {
        return Ok(0);
    }
    parse_count(text).ok_or_else(|| {
        AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "Guest count must be a whole number of 0 or more",
        )
        .with_detail("field", "guest_count")
    })
}

fn parse_notes(text: &str) -> AppResult<Option<String>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    if text.chars().count() > MAX_NOTE_LEN {
        return Err(AppError::validation(format!(
            "Notes are too long (max {} characters)",
            MAX_NOTE_LEN
        )));
    }
    Ok(Some(text.to_string()))
}
