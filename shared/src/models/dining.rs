//! Dining Models (venues, tables, reservations)

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::BookingStatus;
use crate::util::timestamp;

/// Default length of a dining reservation
pub const DEFAULT_DINING_DURATION_MINUTES: u32 = 120;

/// Dining venue (row of `resources` with `resource_type = 'dining'`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningVenue {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
}

/// Dining table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: Uuid,
    pub table_number: String,
    pub capacity: u32,
    #[serde(default)]
    pub location: Option<String>,
}

/// Per-slot table count returned by the backend slot function
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningSlotCount {
    /// `HH:MM` or `HH:MM:SS`
    pub time_slot: String,
    pub available_tables_count: i64,
}

/// Existing table reservation as read for availability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedTable {
    pub table_id: Uuid,
    #[serde(with = "timestamp")]
    pub reservation_datetime: DateTime<Utc>,
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
}

impl BookedTable {
    /// End of the occupied interval (exclusive)
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.reservation_datetime + Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Whether `[start, start + minutes)` intersects this reservation
    pub fn overlaps(&self, start: DateTime<Utc>, minutes: u32) -> bool {
        let end = start + Duration::minutes(i64::from(minutes));
        start < self.ends_at() && self.reservation_datetime < end
    }
}

fn default_duration() -> u32 {
    DEFAULT_DINING_DURATION_MINUTES
}

/// Create dining reservation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningReservationCreate {
    pub member_id: Uuid,
    pub table_id: Uuid,
    #[serde(with = "timestamp")]
    pub reservation_datetime: DateTime<Utc>,
    pub party_size: u32,
    pub guest_count: u32,
    pub special_requests: Option<String>,
    pub duration_minutes: u32,
}

/// Venue name embedded in a reservation listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueName {
    pub name: String,
}

/// Table details embedded in a reservation listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationTable {
    pub table_number: String,
    pub capacity: u32,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub resources: Option<VenueName>,
}

/// Member's dining reservation with table and venue (for list views)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningReservation {
    pub id: Uuid,
    #[serde(with = "timestamp")]
    pub reservation_datetime: DateTime<Utc>,
    pub party_size: u32,
    pub status: BookingStatus,
    #[serde(default)]
    pub guest_count: u32,
    #[serde(default)]
    pub special_requests: Option<String>,
    #[serde(default)]
    pub tables: Option<ReservationTable>,
}

impl DiningReservation {
    pub fn venue_name(&self) -> &str {
        self.tables
            .as_ref()
            .and_then(|t| t.resources.as_ref())
            .map(|r| r.name.as_str())
            .unwrap_or_default()
    }

    pub fn table_number(&self) -> &str {
        self.tables
            .as_ref()
            .map(|t| t.table_number.as_str())
            .unwrap_or_default()
    }
}
