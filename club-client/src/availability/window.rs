//! Slot generation
//!
//! A resource's candidate slots are every `granularity` minutes within each
//! hour of its operating window. The grid restarts at every full hour, so a
//! granularity that does not divide 60 leaves the tail of each hour unused.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::TimeSlot;

/// Bookable resource type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    TeeTime,
    Dining,
}

impl ResourceKind {
    pub fn window(&self) -> OperatingWindow {
        match self {
            Self::TeeTime => OperatingWindow::TEE_TIME,
            Self::Dining => OperatingWindow::DINING,
        }
    }
}

/// Operating hours `[start_hour, end_hour)` sliced into fixed-size slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingWindow {
    start_hour: u32,
    end_hour: u32,
    granularity_minutes: u32,
}

impl OperatingWindow {
    /// Tee times: 06:00 to 19:00 every 15 minutes (last slot 18:45)
    pub const TEE_TIME: Self = Self {
        start_hour: 6,
        end_hour: 19,
        granularity_minutes: 15,
    };

    /// Dining: 11:00 to 22:00 every 30 minutes (last seating 21:30)
    pub const DINING: Self = Self {
        start_hour: 11,
        end_hour: 22,
        granularity_minutes: 30,
    };

    pub fn new(start_hour: u32, end_hour: u32, granularity_minutes: u32) -> AppResult<Self> {
        if start_hour >= end_hour || end_hour > 24 {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                format!("invalid operating hours {}..{}", start_hour, end_hour),
            ));
        }
        if granularity_minutes == 0 || granularity_minutes > 60 {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                format!("slot granularity must be 1..=60 minutes, got {}", granularity_minutes),
            ));
        }
        Ok(Self {
            start_hour,
            end_hour,
            granularity_minutes,
        })
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    pub fn granularity_minutes(&self) -> u32 {
        self.granularity_minutes
    }

    /// Ordered candidate start times
    pub fn times(&self) -> Vec<NaiveTime> {
        (self.start_hour..self.end_hour)
            .flat_map(|hour| {
                (0..60)
                    .step_by(self.granularity_minutes as usize)
                    .filter_map(move |minute| NaiveTime::from_hms_opt(hour, minute, 0))
            })
            .collect()
    }

    /// Whether `time` is one of this window's slot starts
    pub fn contains(&self, time: NaiveTime) -> bool {
        time.second() == 0
            && time.nanosecond() == 0
            && (self.start_hour..self.end_hour).contains(&time.hour())
            && time.minute() % self.granularity_minutes == 0
    }
}

/// Generate the window's slots, all initially available
pub fn generate_slots(window: &OperatingWindow) -> Vec<TimeSlot> {
    window
        .times()
        .into_iter()
        .map(|t| TimeSlot::open(shared::util::format_time_of_day(t)))
        .collect()
}
