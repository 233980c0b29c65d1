// club-client/tests/common/mod.rs
// In-memory backend double shared by the integration tests

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use club_client::auth::Session;
use club_client::availability::free_tables;
use club_client::{AvailabilityEngine, ClientError, ClientResult, ClubBackend, ClubTime, FixedClock};
use http::StatusCode;
use parking_lot::Mutex;
use shared::client::AuthUser;
use shared::models::{
    Announcement, BookedTable, BookedTeeTime, BookingStatus, DiningReservation,
    DiningReservationCreate, DiningSlotCount, DiningTable, DiningVenue, Profile, TeeTimeCreate,
};
use tokio::sync::oneshot;
use uuid::Uuid;

pub const TEE_BOOKINGS: &str = "fetch_tee_time_bookings";
pub const CREATE_TEE_TIME: &str = "create_tee_time";
pub const VENUES: &str = "fetch_dining_venues";
pub const SLOT_COUNTS: &str = "fetch_dining_time_slots";
pub const AVAILABLE_TABLES: &str = "fetch_available_tables";
pub const ALL_TABLES: &str = "fetch_all_tables";
pub const TABLE_BOOKINGS: &str = "fetch_table_bookings";
pub const CREATE_RESERVATION: &str = "create_dining_reservation";

#[derive(Default)]
struct State {
    tee_bookings: Vec<BookedTeeTime>,
    venues: Vec<DiningVenue>,
    tables: HashMap<Uuid, Vec<DiningTable>>,
    table_bookings: Vec<(Uuid, BookedTable)>,
    slot_counts: HashMap<(Uuid, NaiveDate), Vec<DiningSlotCount>>,
    failing: HashMap<&'static str, String>,
    gates: HashMap<&'static str, VecDeque<oneshot::Receiver<()>>>,
    calls: HashMap<&'static str, usize>,
    created_tee_times: Vec<(TeeTimeCreate, Uuid)>,
    created_reservations: Vec<(DiningReservationCreate, Uuid)>,
}

/// Backend double: in-memory data, call counting, failure injection and
/// per-call gates to hold a response back
#[derive(Default)]
pub struct MockBackend {
    state: Mutex<State>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn book_tee_time(&self, start: DateTime<Utc>) {
        self.state
            .lock()
            .tee_bookings
            .push(BookedTeeTime {
                start_time: start,
                status: Some(BookingStatus::Confirmed),
            });
    }

    pub fn cancel_tee_time(&self, start: DateTime<Utc>) {
        self.state.lock().tee_bookings.push(BookedTeeTime {
            start_time: start,
            status: Some(BookingStatus::Cancelled),
        });
    }

    pub fn add_venue(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().venues.push(DiningVenue {
            id,
            name: name.into(),
            description: None,
            capacity: None,
        });
        id
    }

    pub fn add_table(&self, venue_id: Uuid, number: &str, capacity: u32) -> DiningTable {
        let table = DiningTable {
            id: Uuid::new_v4(),
            table_number: number.into(),
            capacity,
            location: None,
        };
        self.state
            .lock()
            .tables
            .entry(venue_id)
            .or_default()
            .push(table.clone());
        table
    }

    pub fn book_table(&self, venue_id: Uuid, table_id: Uuid, start: DateTime<Utc>, minutes: u32) {
        self.state.lock().table_bookings.push((
            venue_id,
            BookedTable {
                table_id,
                reservation_datetime: start,
                duration_minutes: minutes,
            },
        ));
    }

    pub fn set_slot_counts(&self, venue_id: Uuid, date: NaiveDate, counts: &[(&str, i64)]) {
        let counts = counts
            .iter()
            .map(|(time, n)| DiningSlotCount {
                time_slot: format!("{}:00", time),
                available_tables_count: *n,
            })
            .collect();
        self.state.lock().slot_counts.insert((venue_id, date), counts);
    }

    /// Make `op` fail with a 503 carrying `message`
    pub fn fail(&self, op: &'static str, message: &str) {
        self.state.lock().failing.insert(op, message.to_string());
    }

    pub fn heal(&self, op: &'static str) {
        self.state.lock().failing.remove(op);
    }

    /// Hold the next call of `op` until the returned sender fires or drops
    pub fn gate(&self, op: &'static str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.state.lock().gates.entry(op).or_default().push_back(rx);
        tx
    }

    pub fn calls(&self, op: &'static str) -> usize {
        self.state.lock().calls.get(op).copied().unwrap_or(0)
    }

    pub fn network_calls(&self) -> usize {
        self.state.lock().calls.values().sum()
    }

    pub fn created_tee_times(&self) -> Vec<(TeeTimeCreate, Uuid)> {
        self.state.lock().created_tee_times.clone()
    }

    pub fn created_reservations(&self) -> Vec<(DiningReservationCreate, Uuid)> {
        self.state.lock().created_reservations.clone()
    }

    async fn enter(&self, op: &'static str) -> ClientResult<()> {
        let gate = {
            let mut state = self.state.lock();
            *state.calls.entry(op).or_default() += 1;
            state.gates.get_mut(op).and_then(VecDeque::pop_front)
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        match self.state.lock().failing.get(op) {
            Some(message) => Err(ClientError::Api {
                status: StatusCode::SERVICE_UNAVAILABLE,
                code: None,
                message: message.clone(),
                details: None,
            }),
            None => Ok(()),
        }
    }

    fn bookings_for(&self, venue_id: Uuid) -> Vec<BookedTable> {
        self.state
            .lock()
            .table_bookings
            .iter()
            .filter(|(venue, _)| *venue == venue_id)
            .map(|(_, b)| b.clone())
            .collect()
    }

    fn tables_for(&self, venue_id: Uuid, min_capacity: u32) -> Vec<DiningTable> {
        self.state
            .lock()
            .tables
            .get(&venue_id)
            .map(|tables| {
                tables
                    .iter()
                    .filter(|t| t.capacity >= min_capacity)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl ClubBackend for MockBackend {
    async fn fetch_tee_time_bookings(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ClientResult<Vec<BookedTeeTime>> {
        self.enter(TEE_BOOKINGS).await?;
        Ok(self
            .state
            .lock()
            .tee_bookings
            .iter()
            .filter(|b| b.start_time >= from && b.start_time < to)
            .cloned()
            .collect())
    }

    async fn create_tee_time(&self, booking: &TeeTimeCreate, idempotency_key: Uuid) -> ClientResult<()> {
        self.enter(CREATE_TEE_TIME).await?;
        let mut state = self.state.lock();
        state.tee_bookings.push(BookedTeeTime {
            start_time: booking.start_time,
            status: Some(BookingStatus::Pending),
        });
        state.created_tee_times.push((booking.clone(), idempotency_key));
        Ok(())
    }

    async fn fetch_dining_venues(&self) -> ClientResult<Vec<DiningVenue>> {
        self.enter(VENUES).await?;
        Ok(self.state.lock().venues.clone())
    }

    async fn fetch_dining_time_slots(
        &self,
        venue_id: Uuid,
        date: NaiveDate,
    ) -> ClientResult<Vec<DiningSlotCount>> {
        self.enter(SLOT_COUNTS).await?;
        Ok(self
            .state
            .lock()
            .slot_counts
            .get(&(venue_id, date))
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_available_tables(
        &self,
        venue_id: Uuid,
        start: DateTime<Utc>,
        duration_minutes: u32,
        min_capacity: u32,
    ) -> ClientResult<Vec<DiningTable>> {
        self.enter(AVAILABLE_TABLES).await?;
        let tables = self.tables_for(venue_id, min_capacity);
        let bookings = self.bookings_for(venue_id);
        Ok(free_tables(&tables, &bookings, start, duration_minutes, min_capacity)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn fetch_all_tables(&self, venue_id: Uuid, min_capacity: u32) -> ClientResult<Vec<DiningTable>> {
        self.enter(ALL_TABLES).await?;
        Ok(self.tables_for(venue_id, min_capacity))
    }

    async fn fetch_table_bookings(
        &self,
        venue_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ClientResult<Vec<BookedTable>> {
        self.enter(TABLE_BOOKINGS).await?;
        Ok(self
            .bookings_for(venue_id)
            .into_iter()
            .filter(|b| b.reservation_datetime >= from && b.reservation_datetime < to)
            .collect())
    }

    async fn create_dining_reservation(
        &self,
        reservation: &DiningReservationCreate,
        idempotency_key: Uuid,
    ) -> ClientResult<()> {
        self.enter(CREATE_RESERVATION).await?;
        self.state
            .lock()
            .created_reservations
            .push((reservation.clone(), idempotency_key));
        Ok(())
    }

    async fn fetch_upcoming_reservations(
        &self,
        _member_id: Uuid,
        _from: DateTime<Utc>,
    ) -> ClientResult<Vec<DiningReservation>> {
        self.enter("fetch_upcoming_reservations").await?;
        Ok(Vec::new())
    }

    async fn fetch_announcements(&self) -> ClientResult<Vec<Announcement>> {
        self.enter("fetch_announcements").await?;
        Ok(Vec::new())
    }

    async fn fetch_profile(&self, member_id: Uuid) -> ClientResult<Profile> {
        self.enter("fetch_profile").await?;
        Err(ClientError::Api {
            status: StatusCode::NOT_ACCEPTABLE,
            code: Some("PGRST116".into()),
            message: format!("profile {} not found", member_id),
            details: None,
        })
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// UTC instant of a club-local wall-clock time
pub fn local(tz: Tz, d: NaiveDate, h: u32, m: u32) -> DateTime<Utc> {
    tz.from_local_datetime(&d.and_hms_opt(h, m, 0).unwrap())
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

pub fn engine(backend: Arc<MockBackend>, now: DateTime<Utc>, tz: Tz) -> (AvailabilityEngine, FixedClock) {
    let clock = FixedClock::new(now);
    let time = ClubTime::new(Arc::new(clock.clone()), tz);
    (AvailabilityEngine::new(backend, time), clock)
}

pub fn signed_in_session() -> club_client::SessionStore {
    let store = club_client::SessionStore::new();
    store.set(Some(Session {
        access_token: "access".into(),
        refresh_token: "refresh".into(),
        expires_at: Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0).unwrap(),
        user: AuthUser {
            id: Uuid::new_v4(),
            email: Some("member@club.test".into()),
        },
    }));
    store
}
