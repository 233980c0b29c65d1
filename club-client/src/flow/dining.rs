//! Dining reservation flow

use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::Mutex;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{DiningTable, DiningVenue, TimeSlot};
use shared::util::parse_time_of_day;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::{check_date, date_choices, ensure_current, until_closed};
use crate::auth::{AuthClient, SessionStore};
use crate::availability::{Availability, AvailabilityEngine};
use crate::booking::{BookingForm, SubmitError, SubmitState, Submitter, parse_party_size};
use crate::error::{ClientError, ClientResult};
use crate::generation::RequestGeneration;

#[derive(Debug)]
struct DiningState {
    form: BookingForm,
    venues: Vec<DiningVenue>,
    slots: Option<Availability<TimeSlot>>,
    tables: Option<Availability<DiningTable>>,
}

impl DiningState {
    fn clear_time(&mut self) {
        self.form.time = None;
        self.clear_table();
    }

    fn clear_table(&mut self) {
        self.form.table = None;
        self.tables = None;
    }
}

/// State of one dining reservation screen
///
/// Slots and tables are fetched under separate generations: picking another
/// time only supersedes the table fetch, while changing venue, date or party
/// supersedes both.
#[derive(Debug)]
pub struct DiningFlow {
    engine: AvailabilityEngine,
    session: SessionStore,
    auth: Option<AuthClient>,
    slot_generation: RequestGeneration,
    table_generation: RequestGeneration,
    cancel: CancellationToken,
    submitter: Submitter,
    state: Mutex<DiningState>,
}

impl DiningFlow {
    /// Open the flow on today's date, no venue selected
    pub fn new(engine: AvailabilityEngine, session: SessionStore) -> Self {
        let form = BookingForm {
            date: Some(engine.time().today()),
            ..BookingForm::dining()
        };
        Self {
            engine,
            session,
            auth: None,
            slot_generation: RequestGeneration::new(),
            table_generation: RequestGeneration::new(),
            cancel: CancellationToken::new(),
            submitter: Submitter::new(),
            state: Mutex::new(DiningState {
                form,
                venues: Vec::new(),
                slots: None,
                tables: None,
            }),
        }
    }

    /// Refresh the member's session before fetches and submits
    pub fn with_auth(mut self, auth: AuthClient) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn date_choices(&self) -> [NaiveDate; 2] {
        date_choices(self.engine.time())
    }

    pub fn form(&self) -> BookingForm {
        self.state.lock().form.clone()
    }

    pub fn venues(&self) -> Vec<DiningVenue> {
        self.state.lock().venues.clone()
    }

    pub fn slots(&self) -> Option<Availability<TimeSlot>> {
        self.state.lock().slots.clone()
    }

    pub fn tables(&self) -> Option<Availability<DiningTable>> {
        self.state.lock().tables.clone()
    }

    pub fn submit_state(&self) -> SubmitState {
        self.submitter.state()
    }

    fn sync_submittable(&self, state: &DiningState) {
        self.submitter.set_complete(state.form.is_dining_complete());
    }

    fn invalidate_all(&self) {
        self.slot_generation.invalidate();
        self.table_generation.invalidate();
    }

    /// Load the club's dining venues
    ///
    /// Unlike availability, a failure here is returned: there is nothing to
    /// fall back to.
    pub async fn load_venues(&self) -> ClientResult<Vec<DiningVenue>> {
        let backend = Arc::clone(self.engine.backend());
        let venues = until_closed(&self.cancel, backend.fetch_dining_venues())
            .await?
            .inspect_err(|e| tracing::error!(error = %e, "Could not load dining venues"))?;
        self.state.lock().venues = venues.clone();
        Ok(venues)
    }

    /// Change venue; clears time, table and both lists
    pub fn select_venue(&self, venue_id: Uuid) -> AppResult<()> {
        let mut state = self.state.lock();
        if !state.venues.is_empty() && !state.venues.iter().any(|v| v.id == venue_id) {
            return Err(AppError::with_message(
                ErrorCode::VenueNotFound,
                format!("Unknown venue {}", venue_id),
            ));
        }
        if state.form.venue_id == Some(venue_id) {
            return Ok(());
        }
        self.invalidate_all();
        state.form.venue_id = Some(venue_id);
        state.clear_time();
        state.slots = None;
        self.sync_submittable(&state);
        Ok(())
    }

    /// Change date; clears time, table and both lists
    pub fn select_date(&self, date: NaiveDate) -> AppResult<()> {
        check_date(self.engine.time(), date)?;
        let mut state = self.state.lock();
        if state.form.date == Some(date) {
            return Ok(());
        }
        self.invalidate_all();
        state.form.date = Some(date);
        state.clear_time();
        state.slots = None;
        self.sync_submittable(&state);
        Ok(())
    }

    /// Change party size; drops the slot and table lists, keeps the time
    pub fn set_party_size(&self, text: &str) {
        let mut state = self.state.lock();
        if state.form.party_size == text {
            return;
        }
        self.invalidate_all();
        state.form.party_size = text.to_string();
        state.clear_table();
        state.slots = None;
        self.sync_submittable(&state);
    }

    /// Select a slot from the current list; clears the table
    pub fn select_time(&self, time: &str) -> AppResult<()> {
        let mut state = self.state.lock();
        let open = state.slots.as_ref().is_some_and(|s| s.is_open(time));
        if !open {
            return Err(AppError::with_message(
                ErrorCode::DiningSlotUnavailable,
                format!("{} is not available", time),
            ));
        }
        if state.form.time.as_deref() == Some(time) {
            return Ok(());
        }
        self.table_generation.invalidate();
        state.form.time = Some(time.to_string());
        state.clear_table();
        self.sync_submittable(&state);
        Ok(())
    }

    /// Select a table from the current list
    pub fn select_table(&self, table_id: Uuid) -> AppResult<()> {
        let mut state = self.state.lock();
        let table = state
            .tables
            .as_ref()
            .and_then(|t| t.items.iter().find(|t| t.id == table_id))
            .cloned()
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::TableUnavailable,
                    "That table is not available at the selected time",
                )
            })?;
        state.form.table = Some(table);
        self.sync_submittable(&state);
        Ok(())
    }

    pub fn set_guests(&self, text: &str) {
        self.state.lock().form.guest_count = text.to_string();
    }

    pub fn set_special_requests(&self, text: &str) {
        self.state.lock().form.notes = text.to_string();
    }

    /// Fetch slots for the selected venue, date and party
    pub async fn refresh_slots(&self) -> ClientResult<Availability<TimeSlot>> {
        let (ticket, venue_id, date, party) = {
            let state = self.state.lock();
            let venue_id = state
                .form
                .venue_id
                .ok_or_else(|| ClientError::Validation("Please select a venue.".into()))?;
            let date = state.form.date.unwrap_or_else(|| self.engine.time().today());
            let party = party_or_validation(&state.form.party_size)?;
            (self.slot_generation.next(), venue_id, date, party)
        };

        let fetch = async {
            self.renew_session().await;
            self.engine.dining_slots(venue_id, date, party).await
        };
        let slots = until_closed(&self.cancel, fetch).await?;

        let mut state = self.state.lock();
        ensure_current(&self.slot_generation, ticket)?;
        if let Some(time) = state.form.time.as_deref()
            && !slots.is_open(time)
        {
            tracing::info!(%venue_id, %date, time, "Selected dining time is no longer available");
            self.table_generation.invalidate();
            state.clear_time();
        }
        state.slots = Some(slots.clone());
        self.sync_submittable(&state);
        Ok(slots)
    }

    /// Fetch tables for the selected venue, date, time and party
    pub async fn refresh_tables(&self) -> ClientResult<Availability<DiningTable>> {
        let (ticket, venue_id, date, time, party) = {
            let state = self.state.lock();
            let venue_id = state
                .form
                .venue_id
                .ok_or_else(|| ClientError::Validation("Please select a venue.".into()))?;
            let date = state.form.date.unwrap_or_else(|| self.engine.time().today());
            let time = state
                .form
                .time
                .as_deref()
                .and_then(parse_time_of_day)
                .ok_or_else(|| ClientError::Validation("Please select a time.".into()))?;
            let party = party_or_validation(&state.form.party_size)?;
            (self.table_generation.next(), venue_id, date, time, party)
        };

        let fetch = async {
            self.renew_session().await;
            self.engine.dining_tables(venue_id, date, time, party).await
        };
        let tables = until_closed(&self.cancel, fetch).await?;

        let mut state = self.state.lock();
        ensure_current(&self.table_generation, ticket)?;
        if let Some(selected) = state.form.table.as_ref()
            && !tables.items.iter().any(|t| t.id == selected.id)
        {
            tracing::info!(%venue_id, table = %selected.table_number, "Selected table is no longer available");
            state.form.table = None;
        }
        state.tables = Some(tables.clone());
        self.sync_submittable(&state);
        Ok(tables)
    }

    /// Reserve the selected table
    ///
    /// Form problems are reported without contacting the backend.
    pub async fn submit(&self) -> Result<(), SubmitError> {
        let now = self.engine.time().now_local();
        let request = self.state.lock().form.dining_request(now)?;
        self.renew_session().await;
        let member_id = self.session.user_id().ok_or(SubmitError::NotSignedIn)?;
        let reservation = request.into_create(
            member_id,
            self.engine.time().timezone(),
            self.engine.dining_duration_minutes(),
        );
        let backend = Arc::clone(self.engine.backend());

        self.submitter
            .submit(|key| async move { backend.create_dining_reservation(&reservation, key).await })
            .await
    }

    async fn renew_session(&self) {
        if let Some(auth) = &self.auth {
            auth.renew().await;
        }
    }

    /// Close the screen, cancelling anything in flight
    pub fn close(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for DiningFlow {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn party_or_validation(text: &str) -> ClientResult<u32> {
    parse_party_size(text).map_err(|e| ClientError::Validation(e.message))
}
