//! Session provider
//!
//! Signs members in and out against the hosted auth service and keeps the
//! current session in a [`SessionStore`]. Availability and booking code never
//! authenticate; they only read the member id from the store.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use shared::client::{
    AuthUser, RefreshRequest, SessionResponse, SignInRequest, SignUpMetadata, SignUpRequest,
    SignUpResponse,
};
use tokio::sync::watch;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::{ClientError, ClientResult};
use crate::http::RestClient;

/// Minimum password length accepted by the auth service
pub const MIN_PASSWORD_LEN: usize = 6;

/// Refresh this long before the access token expires
const REFRESH_MARGIN_SECS: i64 = 60;

// ============================================================================
// Session
// ============================================================================

/// Signed-in member session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: AuthUser,
}

impl Session {
    fn from_response(resp: SessionResponse, now: DateTime<Utc>) -> ClientResult<Self> {
        let expires_at = Duration::try_seconds(resp.expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                ClientError::InvalidResponse(format!(
                    "session lifetime out of range: {}s",
                    resp.expires_in
                ))
            })?;
        Ok(Self {
            access_token: resp.access_token,
            refresh_token: resp.refresh_token,
            expires_at,
            user: resp.user,
        })
    }

    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) >= self.expires_at
    }
}

// ============================================================================
// Session Store
// ============================================================================

/// Current session, shared by every component and observable for changes
#[derive(Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<Option<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current session
    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.tx.borrow().as_ref().map(|s| s.access_token.clone())
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.tx.borrow().as_ref().map(Session::user_id)
    }

    pub fn is_signed_in(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Replace the session and notify subscribers
    pub fn set(&self, session: Option<Session>) {
        self.tx.send_replace(session);
    }

    /// Subscribe to sign-in / sign-out / refresh changes
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("user_id", &self.user_id())
            .finish()
    }
}

// ============================================================================
// Auth Client
// ============================================================================

/// Outcome of a sign-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// Account created and signed in
    SignedIn(Session),
    /// Account created; the member must confirm their email first
    ConfirmationRequired(AuthUser),
}

/// Auth service client
#[derive(Clone)]
pub struct AuthClient {
    rest: RestClient,
    clock: Arc<dyn Clock>,
}

impl AuthClient {
    pub fn new(rest: RestClient, clock: Arc<dyn Clock>) -> Self {
        Self { rest, clock }
    }

    pub fn store(&self) -> &SessionStore {
        self.rest.session()
    }

    /// Sign in with email and password
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> ClientResult<Session> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ClientError::Validation(
                "Email and password are required.".into(),
            ));
        }

        let req = SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp: SessionResponse = self
            .rest
            .auth_post("token", &[("grant_type", "password")], &req, None)
            .await?;

        let session = Session::from_response(resp, self.clock.now_utc())?;
        tracing::info!(user_id = %session.user_id(), "Signed in");
        self.store().set(Some(session.clone()));
        Ok(session)
    }

    /// Create an account
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> ClientResult<SignUpOutcome> {
        let email = email.trim();
        validate_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ClientError::Validation(format!(
                "Password must be at least {} characters.",
                MIN_PASSWORD_LEN
            )));
        }

        let req = SignUpRequest {
            email: email.to_string(),
            password: password.to_string(),
            data: SignUpMetadata {
                full_name: full_name
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(str::to_string),
            },
        };
        let resp: SignUpResponse = self.rest.auth_post("signup", &[], &req, None).await?;

        match resp {
            SignUpResponse::Session(resp) => {
                let session = Session::from_response(resp, self.clock.now_utc())?;
                tracing::info!(user_id = %session.user_id(), "Signed up and signed in");
                self.store().set(Some(session.clone()));
                Ok(SignUpOutcome::SignedIn(session))
            }
            SignUpResponse::PendingConfirmation(user) => {
                tracing::info!(user_id = %user.id, "Signed up, awaiting email confirmation");
                Ok(SignUpOutcome::ConfirmationRequired(user))
            }
        }
    }

    /// Exchange the refresh token for a new session
    pub async fn refresh(&self) -> ClientResult<Session> {
        let current = self.store().current().ok_or(ClientError::NotAuthenticated)?;
        let req = RefreshRequest {
            refresh_token: current.refresh_token,
        };
        let result: ClientResult<SessionResponse> = self
            .rest
            .auth_post("token", &[("grant_type", "refresh_token")], &req, None)
            .await;

        match result {
            Ok(resp) => {
                let session = Session::from_response(resp, self.clock.now_utc())?;
                tracing::debug!(user_id = %session.user_id(), "Session refreshed");
                self.store().set(Some(session.clone()));
                Ok(session)
            }
            Err(ClientError::Unauthorized(msg)) => {
                tracing::warn!("Session refresh rejected: {}", msg);
                self.store().set(None);
                Err(ClientError::Unauthorized(msg))
            }
            Err(ClientError::Api {
                status, message, ..
            }) if status.is_client_error() => {
                tracing::warn!("Session refresh rejected: {}", message);
                self.store().set(None);
                Err(ClientError::Unauthorized(message))
            }
            Err(e) => Err(e),
        }
    }

    /// Current session, refreshed first when it is about to expire
    pub async fn session(&self) -> ClientResult<Option<Session>> {
        match self.store().current() {
            Some(session) if session.needs_refresh(self.clock.now_utc()) => {
                self.refresh().await.map(Some)
            }
            other => Ok(other),
        }
    }

    /// Refresh the session if it is about to expire
    ///
    /// Failures are logged and otherwise ignored: a rejected refresh has
    /// already cleared the session, and a network failure leaves the current
    /// token in place.
    pub async fn renew(&self) {
        if let Err(e) = self.session().await {
            tracing::warn!(error = %e, "Session refresh failed");
        }
    }

    /// Sign out
    ///
    /// The local session is cleared even when the service cannot be reached.
    pub async fn sign_out(&self) -> ClientResult<()> {
        let Some(session) = self.store().current() else {
            return Ok(());
        };
        if let Err(e) = self
            .rest
            .auth_post_empty("logout", Some(&session.access_token))
            .await
        {
            tracing::warn!("Remote sign-out failed, clearing local session anyway: {}", e);
        }
        self.store().set(None);
        tracing::info!(user_id = %session.user_id(), "Signed out");
        Ok(())
    }
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("base_url", &self.rest.base_url())
            .finish()
    }
}

fn validate_email(email: &str) -> ClientResult<()> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.'));
    if !valid {
        return Err(ClientError::Validation(
            "Please enter a valid email address.".into(),
        ));
    }
    Ok(())
}
