//! Time Slot Model

use serde::{Deserialize, Serialize};

/// One bookable time-of-day unit (e.g. a tee time or a dining seating)
///
/// Regenerated on every date/venue change; never persisted by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Start time of day, `HH:MM`, aligned to the resource's granularity
    pub time: String,
    pub available: bool,
    /// Remaining capacity at this slot (tables for dining), when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_capacity: Option<u32>,
}

impl TimeSlot {
    /// An available slot with unknown capacity
    pub fn open(time: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            available: true,
            available_capacity: None,
        }
    }

    /// Mark this slot unavailable
    pub fn close(&mut self) {
        self.available = false;
    }
}
