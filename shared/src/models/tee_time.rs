//! Tee Time Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::BookingStatus;
use crate::util::timestamp;

/// Tee time booking (row of `tee_times`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeeTime {
    pub id: Uuid,
    #[serde(with = "timestamp")]
    pub start_time: DateTime<Utc>,
    pub players_count: u32,
    #[serde(default)]
    pub guest_count: u32,
    pub notes: Option<String>,
    #[serde(default)]
    pub status: Option<BookingStatus>,
    #[serde(default)]
    pub total_cost: Option<f64>,
}

/// Existing booking as read for availability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedTeeTime {
    #[serde(with = "timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub status: Option<BookingStatus>,
}

impl BookedTeeTime {
    /// Whether the booking still holds its slot; rows without a status do
    pub fn is_active(&self) -> bool {
        self.status.as_ref().is_none_or(BookingStatus::is_active)
    }
}

/// Create tee time payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeeTimeCreate {
    pub user_id: Uuid,
    #[serde(with = "timestamp")]
    pub start_time: DateTime<Utc>,
    pub players_count: u32,
    pub guest_count: u32,
    pub notes: Option<String>,
}
