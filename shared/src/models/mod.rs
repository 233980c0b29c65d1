//! Data models
//!
//! Mirrors of the hosted backend's tables and RPC results.
//! All IDs are UUIDs; all timestamps are UTC.

pub mod announcement;
pub mod dining;
pub mod profile;
pub mod slot;
pub mod tee_time;

use serde::{Deserialize, Serialize};

// Re-exports
pub use announcement::*;
pub use dining::*;
pub use profile::*;
pub use slot::*;
pub use tee_time::*;

/// Lifecycle status shared by tee times and dining reservations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
}

impl BookingStatus {
    /// Whether the booking still occupies its slot
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}
