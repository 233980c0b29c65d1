//! Injected clock
//!
//! Availability depends on "now". Every component reads it through [`Clock`]
//! so tests can pin it.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use parking_lot::RwLock;

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        shared::util::now_utc()
    }
}

/// Settable clock for tests and replays
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<RwLock<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(RwLock::new(now)),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write() = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.write();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.now.read()
    }
}

/// Clock resolved into the club's timezone
#[derive(Clone)]
pub struct ClubTime {
    clock: Arc<dyn Clock>,
    tz: Tz,
}

impl ClubTime {
    pub fn new(clock: Arc<dyn Clock>, tz: Tz) -> Self {
        Self { clock, tz }
    }

    /// Wall clock in the given timezone
    pub fn system(tz: Tz) -> Self {
        Self::new(Arc::new(SystemClock), tz)
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn now_utc(&self) -> DateTime<Utc> {
        self.clock.now_utc()
    }

    /// Current club-local wall-clock time
    pub fn now_local(&self) -> NaiveDateTime {
        shared::util::utc_to_local(self.now_utc(), self.tz)
    }

    /// Current club-local calendar day
    pub fn today(&self) -> NaiveDate {
        self.now_local().date()
    }
}

impl std::fmt::Debug for ClubTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClubTime")
            .field("tz", &self.tz)
            .field("now", &self.now_utc())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_today_follows_club_timezone() {
        // 02:30 UTC on the 21st is still the evening of the 20th in New York.
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 6, 21, 2, 30, 0).unwrap());
        let time = ClubTime::new(Arc::new(clock.clone()), chrono_tz::America::New_York);
        assert_eq!(time.today(), NaiveDate::from_ymd_opt(2025, 6, 20).unwrap());

        clock.advance(chrono::Duration::hours(2));
        assert_eq!(time.today(), NaiveDate::from_ymd_opt(2025, 6, 21).unwrap());
    }
}
