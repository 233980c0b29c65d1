//! Hosted backend over its REST/RPC API

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;
use shared::models::{
    Announcement, BookedTable, BookedTeeTime, DiningReservation, DiningReservationCreate,
    DiningSlotCount, DiningTable, DiningVenue, Profile, TeeTimeCreate,
};
use uuid::Uuid;

use super::ClubBackend;
use crate::error::ClientResult;
use crate::http::RestClient;

const DINING_RESOURCE_TYPE: &str = "dining";

fn ts(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[derive(Serialize)]
struct DiningTimeSlotsArgs {
    venue_id: Uuid,
    reservation_date: NaiveDate,
}

#[derive(Serialize)]
struct AvailableTablesArgs {
    venue_id: Uuid,
    reservation_start: String,
    duration_mins: u32,
    min_capacity: u32,
}

/// [`ClubBackend`] backed by the hosted service
#[derive(Debug, Clone)]
pub struct SupabaseBackend {
    rest: RestClient,
}

impl SupabaseBackend {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl ClubBackend for SupabaseBackend {
    async fn fetch_tee_time_bookings(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ClientResult<Vec<BookedTeeTime>> {
        self.rest
            .select(
                "tee_times",
                &[
                    ("select", "start_time,status".to_string()),
                    ("start_time", format!("gte.{}", ts(from))),
                    ("start_time", format!("lt.{}", ts(to))),
                ],
            )
            .await
    }

    async fn create_tee_time(
        &self,
        booking: &TeeTimeCreate,
        idempotency_key: Uuid,
    ) -> ClientResult<()> {
        self.rest
            .insert("tee_times", booking, Some(idempotency_key))
            .await
    }

    async fn fetch_dining_venues(&self) -> ClientResult<Vec<DiningVenue>> {
        self.rest
            .select(
                "resources",
                &[
                    ("select", "id,name,description,capacity".to_string()),
                    ("resource_type", format!("eq.{}", DINING_RESOURCE_TYPE)),
                    ("active", "eq.true".to_string()),
                    ("order", "name".to_string()),
                ],
            )
            .await
    }

    async fn fetch_dining_time_slots(
        &self,
        venue_id: Uuid,
        date: NaiveDate,
    ) -> ClientResult<Vec<DiningSlotCount>> {
        let args = DiningTimeSlotsArgs {
            venue_id,
            reservation_date: date,
        };
        self.rest.rpc("get_dining_time_slots", &args).await
    }

    async fn fetch_available_tables(
        &self,
        venue_id: Uuid,
        start: DateTime<Utc>,
        duration_minutes: u32,
        min_capacity: u32,
    ) -> ClientResult<Vec<DiningTable>> {
        let args = AvailableTablesArgs {
            venue_id,
            reservation_start: ts(start),
            duration_mins: duration_minutes,
            min_capacity,
        };
        self.rest.rpc("get_available_tables", &args).await
    }

    async fn fetch_all_tables(
        &self,
        venue_id: Uuid,
        min_capacity: u32,
    ) -> ClientResult<Vec<DiningTable>> {
        self.rest
            .select(
                "tables",
                &[
                    ("select", "id,table_number,capacity,location".to_string()),
                    ("resource_id", format!("eq.{}", venue_id)),
                    ("active", "eq.true".to_string()),
                    ("capacity", format!("gte.{}", min_capacity)),
                    ("order", "table_number".to_string()),
                ],
            )
            .await
    }

    async fn fetch_table_bookings(
        &self,
        venue_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ClientResult<Vec<BookedTable>> {
        self.rest
            .select(
                "dining_reservations",
                &[
                    (
                        "select",
                        "table_id,reservation_datetime,duration_minutes,tables!inner(resource_id)"
                            .to_string(),
                    ),
                    ("tables.resource_id", format!("eq.{}", venue_id)),
                    ("reservation_datetime", format!("gte.{}", ts(from))),
                    ("reservation_datetime", format!("lt.{}", ts(to))),
                    ("status", "in.(pending,confirmed)".to_string()),
                ],
            )
            .await
    }

    async fn create_dining_reservation(
        &self,
        reservation: &DiningReservationCreate,
        idempotency_key: Uuid,
    ) -> ClientResult<()> {
        self.rest
            .insert("dining_reservations", reservation, Some(idempotency_key))
            .await
    }

    async fn fetch_upcoming_reservations(
        &self,
        member_id: Uuid,
        from: DateTime<Utc>,
    ) -> ClientResult<Vec<DiningReservation>> {
        self.rest
            .select(
                "dining_reservations",
                &[
                    (
                        "select",
                        "id,reservation_datetime,party_size,status,guest_count,special_requests,\
                         tables(table_number,capacity,location,resources(name))"
                            .to_string(),
                    ),
                    ("member_id", format!("eq.{}", member_id)),
                    ("reservation_datetime", format!("gte.{}", ts(from))),
                    ("order", "reservation_datetime.asc".to_string()),
                ],
            )
            .await
    }

    async fn fetch_announcements(&self) -> ClientResult<Vec<Announcement>> {
        self.rest
            .select(
                "announcements",
                &[
                    ("select", "*".to_string()),
                    ("order", "created_at.desc".to_string()),
                ],
            )
            .await
    }

    async fn fetch_profile(&self, member_id: Uuid) -> ClientResult<Profile> {
        self.rest
            .select_one(
                "profiles",
                &[
                    ("select", "*".to_string()),
                    ("id", format!("eq.{}", member_id)),
                ],
            )
            .await
    }
}
