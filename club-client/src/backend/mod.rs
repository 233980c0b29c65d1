//! Backend collaborator contracts
//!
//! Everything the client needs from the hosted service, behind one trait so
//! the availability engine and booking flows can run against the network
//! implementation or an in-memory double.

mod supabase;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use shared::models::{
    Announcement, BookedTable, BookedTeeTime, DiningReservation, DiningReservationCreate,
    DiningSlotCount, DiningTable, DiningVenue, Profile, TeeTimeCreate,
};
use uuid::Uuid;

use crate::error::ClientResult;

pub use supabase::SupabaseBackend;

/// Hosted backend operations
#[async_trait]
pub trait ClubBackend: Send + Sync {
    // ========== Tee times ==========

    /// Existing tee-time starts within `[from, to)`
    async fn fetch_tee_time_bookings(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ClientResult<Vec<BookedTeeTime>>;

    /// Insert one tee-time booking
    async fn create_tee_time(&self, booking: &TeeTimeCreate, idempotency_key: Uuid)
    -> ClientResult<()>;

    // ========== Dining ==========

    /// Active dining venues, by name
    async fn fetch_dining_venues(&self) -> ClientResult<Vec<DiningVenue>>;

    /// Backend-computed slot list with free-table counts
    async fn fetch_dining_time_slots(
        &self,
        venue_id: Uuid,
        date: NaiveDate,
    ) -> ClientResult<Vec<DiningSlotCount>>;

    /// Backend-computed tables free for the whole interval and large enough
    async fn fetch_available_tables(
        &self,
        venue_id: Uuid,
        start: DateTime<Utc>,
        duration_minutes: u32,
        min_capacity: u32,
    ) -> ClientResult<Vec<DiningTable>>;

    /// Every active table at the venue seating at least `min_capacity`
    async fn fetch_all_tables(&self, venue_id: Uuid, min_capacity: u32)
    -> ClientResult<Vec<DiningTable>>;

    /// Active table reservations at the venue starting within `[from, to)`
    async fn fetch_table_bookings(
        &self,
        venue_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ClientResult<Vec<BookedTable>>;

    /// Insert one dining reservation
    async fn create_dining_reservation(
        &self,
        reservation: &DiningReservationCreate,
        idempotency_key: Uuid,
    ) -> ClientResult<()>;

    /// The member's reservations from `from` onwards, soonest first
    async fn fetch_upcoming_reservations(
        &self,
        member_id: Uuid,
        from: DateTime<Utc>,
    ) -> ClientResult<Vec<DiningReservation>>;

    // ========== Club ==========

    /// Announcements, newest first
    async fn fetch_announcements(&self) -> ClientResult<Vec<Announcement>>;

    async fn fetch_profile(&self, member_id: Uuid) -> ClientResult<Profile>;
}
