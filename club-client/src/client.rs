//! Club client
//!
//! Wires configuration, session, backend and availability engine together
//! and hands out booking flows.

use std::sync::Arc;

use chrono_tz::Tz;
use shared::models::{Announcement, DiningReservation, DiningVenue, Profile};

use crate::auth::{AuthClient, SessionStore};
use crate::availability::AvailabilityEngine;
use crate::backend::{ClubBackend, SupabaseBackend};
use crate::clock::{Clock, ClubTime, SystemClock};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::flow::{DiningFlow, TeeTimeFlow};
use crate::http::RestClient;

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`ClubClient`]
///
/// # Example
///
/// ```no_run
/// use club_client::{ClientConfig, ClubClient};
///
/// let client = ClubClient::builder()
///     .config(ClientConfig::new("https://club.example.co", "public-anon-key"))
///     .build()
///     .expect("Failed to build client");
/// ```
#[derive(Default)]
pub struct ClubClientBuilder {
    config: Option<ClientConfig>,
    clock: Option<Arc<dyn Clock>>,
    backend: Option<Arc<dyn ClubBackend>>,
}

impl ClubClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the wall clock
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Replace the hosted backend for data calls; auth still goes to the
    /// configured service
    pub fn backend(mut self, backend: Arc<dyn ClubBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// # Errors
    ///
    /// Returns `ClientError::Config` if no configuration was given or it is
    /// invalid.
    pub fn build(self) -> ClientResult<ClubClient> {
        let config = self
            .config
            .ok_or_else(|| ClientError::Config("config is required".into()))?;
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let session = SessionStore::new();
        let rest = RestClient::new(&config, session.clone())?;
        let backend = self
            .backend
            .unwrap_or_else(|| Arc::new(SupabaseBackend::new(rest.clone())));
        let time = ClubTime::new(Arc::clone(&clock), config.timezone);

        tracing::debug!(base_url = %rest.base_url(), timezone = %config.timezone, "Club client ready");

        Ok(ClubClient {
            auth: AuthClient::new(rest, clock),
            engine: AvailabilityEngine::new(Arc::clone(&backend), time),
            backend,
            session,
            config,
        })
    }
}

// ============================================================================
// Client
// ============================================================================

/// Entry point for a member-facing front end
#[derive(Clone)]
pub struct ClubClient {
    config: ClientConfig,
    session: SessionStore,
    auth: AuthClient,
    backend: Arc<dyn ClubBackend>,
    engine: AvailabilityEngine,
}

impl ClubClient {
    pub fn builder() -> ClubClientBuilder {
        ClubClientBuilder::new()
    }

    /// Client from `CLUB_*` environment variables
    pub fn from_env() -> ClientResult<Self> {
        Self::builder().config(ClientConfig::from_env()).build()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn timezone(&self) -> Tz {
        self.config.timezone
    }

    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn engine(&self) -> &AvailabilityEngine {
        &self.engine
    }

    pub fn backend(&self) -> &Arc<dyn ClubBackend> {
        &self.backend
    }

    /// Open a tee time booking screen
    pub fn tee_time_flow(&self) -> TeeTimeFlow {
        TeeTimeFlow::new(self.engine.clone(), self.session.clone()).with_auth(self.auth.clone())
    }

    /// Open a dining reservation screen
    pub fn dining_flow(&self) -> DiningFlow {
        DiningFlow::new(self.engine.clone(), self.session.clone()).with_auth(self.auth.clone())
    }

    // ========== Read-only screens ==========
    //
    // Each read renews a session that is about to expire first.

    pub async fn dining_venues(&self) -> ClientResult<Vec<DiningVenue>> {
        self.auth.renew().await;
        self.backend.fetch_dining_venues().await
    }

    pub async fn announcements(&self) -> ClientResult<Vec<Announcement>> {
        self.auth.renew().await;
        self.backend.fetch_announcements().await
    }

    /// Signed-in member's profile
    pub async fn profile(&self) -> ClientResult<Profile> {
        self.auth.renew().await;
        let member_id = self.session.user_id().ok_or(ClientError::NotAuthenticated)?;
        self.backend.fetch_profile(member_id).await
    }

    /// Signed-in member's reservations from now on
    pub async fn upcoming_reservations(&self) -> ClientResult<Vec<DiningReservation>> {
        self.auth.renew().await;
        let member_id = self.session.user_id().ok_or(ClientError::NotAuthenticated)?;
        let now = self.engine.time().now_utc();
        self.backend.fetch_upcoming_reservations(member_id, now).await
    }
}

impl std::fmt::Debug for ClubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClubClient")
            .field("base_url", &self.config.base_url)
            .field("session", &self.session)
            .field("engine", &self.engine)
            .finish()
    }
}
