//! Availability engine
//!
//! Combines slot generation, backend reads and the filters into the slot and
//! table lists a booking screen shows. Engine calls never fail: when a read
//! fails the result degrades and says so through [`AvailabilitySource`].

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use shared::models::{DEFAULT_DINING_DURATION_MINUTES, DiningTable, TimeSlot};
use shared::util::{day_bounds_utc, local_to_utc, utc_to_local};
use uuid::Uuid;

use super::filter::{apply_slot_counts, filter_dining, filter_tee_times, free_tables, mark_past};
use super::window::{ResourceKind, generate_slots};
use crate::backend::ClubBackend;
use crate::clock::ClubTime;

/// Where an availability answer came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AvailabilitySource {
    /// Computed by the backend
    Backend,
    /// Computed locally from fresh booking data
    Computed,
    /// Booking data could not be read; the list may offer taken slots
    Degraded { reason: String },
}

/// Availability answer plus its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability<T> {
    pub items: Vec<T>,
    pub source: AvailabilitySource,
}

impl<T> Availability<T> {
    fn new(items: Vec<T>, source: AvailabilitySource) -> Self {
        Self { items, source }
    }

    fn degraded(items: Vec<T>, reason: impl Into<String>) -> Self {
        Self::new(
            items,
            AvailabilitySource::Degraded {
                reason: reason.into(),
            },
        )
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.source, AvailabilitySource::Degraded { .. })
    }

    /// Why the answer is degraded, if it is
    pub fn degraded_reason(&self) -> Option<&str> {
        match &self.source {
            AvailabilitySource::Degraded { reason } => Some(reason),
            _ => None,
        }
    }
}

impl Availability<TimeSlot> {
    /// Whether `time` (`HH:MM`) is listed and open
    pub fn is_open(&self, time: &str) -> bool {
        self.items.iter().any(|s| s.time == time && s.available)
    }

    pub fn open_times(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .filter(|s| s.available)
            .map(|s| s.time.as_str())
    }
}

/// Availability calculator for tee times and dining
#[derive(Clone)]
pub struct AvailabilityEngine {
    backend: Arc<dyn ClubBackend>,
    time: ClubTime,
    dining_duration_minutes: u32,
}

impl AvailabilityEngine {
    pub fn new(backend: Arc<dyn ClubBackend>, time: ClubTime) -> Self {
        Self {
            backend,
            time,
            dining_duration_minutes: DEFAULT_DINING_DURATION_MINUTES,
        }
    }

    pub fn with_dining_duration(mut self, minutes: u32) -> Self {
        self.dining_duration_minutes = minutes;
        self
    }

    pub fn time(&self) -> &ClubTime {
        &self.time
    }

    pub fn backend(&self) -> &Arc<dyn ClubBackend> {
        &self.backend
    }

    pub fn dining_duration_minutes(&self) -> u32 {
        self.dining_duration_minutes
    }

    /// Tee time slots for `date`
    ///
    /// Every slot of the window is listed. Booked and past slots are closed.
    /// If bookings cannot be read, all future slots stay open and the answer
    /// is degraded.
    pub async fn tee_time_slots(&self, date: NaiveDate) -> Availability<TimeSlot> {
        let tz = self.time.timezone();
        let mut slots = generate_slots(&ResourceKind::TeeTime.window());
        let (from, to) = day_bounds_utc(date, tz);

        let source = match self.backend.fetch_tee_time_bookings(from, to).await {
            Ok(bookings) => {
                let booked: Vec<NaiveTime> = bookings
                    .iter()
                    .filter(|b| b.is_active())
                    .map(|b| utc_to_local(b.start_time, tz))
                    .filter(|local| local.date() == date)
                    .map(|local| local.time())
                    .collect();
                tracing::debug!(%date, booked = booked.len(), "Tee time bookings loaded");
                filter_tee_times(&mut slots, &booked);
                AvailabilitySource::Computed
            }
            Err(e) => {
                tracing::warn!(%date, error = %e, "Tee time bookings unavailable, showing all slots");
                AvailabilitySource::Degraded {
                    reason: e.user_message(),
                }
            }
        };

        mark_past(&mut slots, date, self.time.now_local());
        Availability::new(slots, source)
    }

    /// Dining slots for a venue, date and party
    ///
    /// Asks the backend first. The backend's slot counts are not per party:
    /// a slot with any free table is open, and capacity is checked when the
    /// tables are listed. If that fails, computes locally from the
    /// venue's tables and bookings; if those cannot be read either, every
    /// future slot of the dining window is offered and the answer is
    /// degraded.
    pub async fn dining_slots(
        &self,
        venue_id: Uuid,
        date: NaiveDate,
        party_size: u32,
    ) -> Availability<TimeSlot> {
        let now = self.time.now_local();

        let mut result = match self.backend.fetch_dining_time_slots(venue_id, date).await {
            Ok(counts) => Availability::new(apply_slot_counts(&counts), AvailabilitySource::Backend),
            Err(e) => {
                tracing::warn!(
                    %venue_id, %date, error = %e,
                    "Dining slot function failed, computing availability locally"
                );
                self.compute_dining_slots(venue_id, date, party_size).await
            }
        };

        mark_past(&mut result.items, date, now);
        result
    }

    async fn compute_dining_slots(
        &self,
        venue_id: Uuid,
        date: NaiveDate,
        party_size: u32,
    ) -> Availability<TimeSlot> {
        let tz = self.time.timezone();
        let mut slots = generate_slots(&ResourceKind::Dining.window());
        let (from, to) = day_bounds_utc(date, tz);
        // A reservation from the previous evening can still occupy a table.
        let from = from - chrono::Duration::minutes(i64::from(self.dining_duration_minutes));

        let reads = futures::future::try_join(
            self.backend.fetch_all_tables(venue_id, party_size),
            self.backend.fetch_table_bookings(venue_id, from, to),
        )
        .await;

        match reads {
            Ok((tables, bookings)) => {
                filter_dining(
                    &mut slots,
                    date,
                    tz,
                    &tables,
                    &bookings,
                    party_size,
                    self.dining_duration_minutes,
                );
                Availability::new(slots, AvailabilitySource::Computed)
            }
            Err(e) => {
                tracing::warn!(
                    %venue_id, %date, error = %e,
                    "Dining bookings unavailable, showing all slots"
                );
                Availability::degraded(slots, e.user_message())
            }
        }
    }

    /// Tables free for a party at a venue, date and time
    ///
    /// Asks the backend first. If that fails, lists the venue's tables that
    /// seat the party, minus those with an overlapping booking when bookings
    /// can be read.
    pub async fn dining_tables(
        &self,
        venue_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        party_size: u32,
    ) -> Availability<DiningTable> {
        let start = local_to_utc(date, time, self.time.timezone());
        let duration = self.dining_duration_minutes;

        match self
            .backend
            .fetch_available_tables(venue_id, start, duration, party_size)
            .await
        {
            Ok(tables) => {
                let tables = tables
                    .into_iter()
                    .filter(|t| t.capacity >= party_size)
                    .collect();
                return Availability::new(tables, AvailabilitySource::Backend);
            }
            Err(e) => tracing::warn!(
                %venue_id, %start, error = %e,
                "Table availability function failed, listing tables locally"
            ),
        }

        let tables = match self.backend.fetch_all_tables(venue_id, party_size).await {
            Ok(tables) => tables,
            Err(e) => {
                tracing::error!(%venue_id, error = %e, "Could not load tables");
                return Availability::degraded(Vec::new(), e.user_message());
            }
        };

        let window_start = start - chrono::Duration::minutes(i64::from(duration));
        let window_end = start + chrono::Duration::minutes(i64::from(duration));
        match self
            .backend
            .fetch_table_bookings(venue_id, window_start, window_end)
            .await
        {
            Ok(bookings) => {
                let free = free_tables(&tables, &bookings, start, duration, party_size)
                    .into_iter()
                    .cloned()
                    .collect();
                Availability::new(free, AvailabilitySource::Computed)
            }
            Err(e) => {
                tracing::warn!(%venue_id, error = %e, "Table bookings unavailable, listing every table");
                let eligible = tables
                    .into_iter()
                    .filter(|t| t.capacity >= party_size)
                    .collect();
                Availability::degraded(eligible, e.user_message())
            }
        }
    }
}

impl std::fmt::Debug for AvailabilityEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvailabilityEngine")
            .field("time", &self.time)
            .field("dining_duration_minutes", &self.dining_duration_minutes)
            .finish()
    }
}
