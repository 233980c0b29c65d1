//! Tee time booking flow

use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::Mutex;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::TimeSlot;
use tokio_util::sync::CancellationToken;

use super::{check_date, date_choices, ensure_current, until_closed};
use crate::auth::{AuthClient, SessionStore};
use crate::availability::{Availability, AvailabilityEngine};
use crate::booking::{BookingForm, SubmitError, SubmitState, Submitter};
use crate::error::ClientResult;
use crate::generation::RequestGeneration;

#[derive(Debug)]
struct TeeTimeState {
    form: BookingForm,
    slots: Option<Availability<TimeSlot>>,
    loading: bool,
}

/// State of one tee time booking screen
#[derive(Debug)]
pub struct TeeTimeFlow {
    engine: AvailabilityEngine,
    session: SessionStore,
    auth: Option<AuthClient>,
    generation: RequestGeneration,
    cancel: CancellationToken,
    submitter: Submitter,
    state: Mutex<TeeTimeState>,
}

impl TeeTimeFlow {
    /// Open the flow on today's date
    pub fn new(engine: AvailabilityEngine, session: SessionStore) -> Self {
        let form = BookingForm {
            date: Some(engine.time().today()),
            ..BookingForm::tee_time()
        };
        Self {
            engine,
            session,
            auth: None,
            generation: RequestGeneration::new(),
            cancel: CancellationToken::new(),
            submitter: Submitter::new(),
            state: Mutex::new(TeeTimeState {
                form,
                slots: None,
                loading: false,
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

    /// Latest applied availability, `None` until the first refresh lands
    pub fn slots(&self) -> Option<Availability<TimeSlot>> {
        self.state.lock().slots.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn submit_state(&self) -> SubmitState {
        self.submitter.state()
    }

    /// Change the date; clears the selected time and the slot list
    pub fn select_date(&self, date: NaiveDate) -> AppResult<()> {
        check_date(self.engine.time(), date)?;
        let mut state = self.state.lock();
        if state.form.date == Some(date) {
            return Ok(());
        }
        self.generation.invalidate();
        state.form.date = Some(date);
        state.form.time = None;
        state.slots = None;
        state.loading = false;
        self.submitter.set_complete(state.form.is_tee_time_complete());
        Ok(())
    }

    /// Select a slot from the current list; it must be open
    pub fn select_time(&self, time: &str) -> AppResult<()> {
        let mut state = self.state.lock();
        let open = state.slots.as_ref().is_some_and(|s| s.is_open(time));
        if !open {
            return Err(AppError::with_message(
                ErrorCode::TeeTimeUnavailable,
                format!("{} is not available", time),
            ));
        }
        state.form.time = Some(time.to_string());
        self.submitter.set_complete(state.form.is_tee_time_complete());
        Ok(())
    }

    pub fn set_players(&self, text: &str) {
        self.state.lock().form.party_size = text.to_string();
    }

    pub fn set_guests(&self, text: &str) {
        self.state.lock().form.guest_count = text.to_string();
    }

    pub fn set_notes(&self, text: &str) {
        self.state.lock().form.notes = text.to_string();
    }

    /// Fetch slots for the selected date
    ///
    /// Returns `ClientError::Cancelled` when the flow was closed or a newer
    /// selection superseded this request; the stale result is not applied.
    pub async fn refresh(&self) -> ClientResult<Availability<TimeSlot>> {
        let (ticket, date) = {
            let mut state = self.state.lock();
            let date = state.form.date.unwrap_or_else(|| self.engine.time().today());
            state.loading = true;
            (self.generation.next(), date)
        };

        let fetch = async {
            self.renew_session().await;
            self.engine.tee_time_slots(date).await
        };
        let slots = until_closed(&self.cancel, fetch).await?;

        let mut state = self.state.lock();
        ensure_current(&self.generation, ticket)?;
        state.loading = false;
        if let Some(time) = state.form.time.as_deref()
            && !slots.is_open(time)
        {
            tracing::info!(%date, time, "Selected tee time is no longer available");
            state.form.time = None;
        }
        state.slots = Some(slots.clone());
        self.submitter.set_complete(state.form.is_tee_time_complete());
        Ok(slots)
    }

    /// Book the selected tee time
    ///
    /// Form problems are reported without contacting the backend.
    pub async fn submit(&self) -> Result<(), SubmitError> {
        let now = self.engine.time().now_local();
        let request = self.state.lock().form.tee_time_request(now)?;
        self.renew_session().await;
        let user_id = self.session.user_id().ok_or(SubmitError::NotSignedIn)?;
        let booking = request.into_create(user_id, self.engine.time().timezone());
        let backend = Arc::clone(self.engine.backend());

        self.submitter
            .submit(|key| async move { backend.create_tee_time(&booking, key).await })
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

impl Drop for TeeTimeFlow {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
