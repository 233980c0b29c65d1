//! Booking submitter
//!
//! One create call per attempt, guarded so that a second trigger while the
//! first is still in flight is refused instead of sent.
//!
//! ```text
//! Idle ──complete──▶ Submittable ──submit──▶ Submitting ──▶ Success
//!                         ▲                      │
//!                         └──────── Failed ◀─────┘
//! ```

use std::future::Future;

use parking_lot::Mutex;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;
use uuid::Uuid;

use crate::error::{ClientError, ClientResult};

/// Submission state of one booking flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitState {
    /// Required selections missing
    Idle,
    /// Ready to submit
    Submittable,
    /// Create call in flight under this idempotency key
    Submitting { idempotency_key: Uuid },
    /// Accepted by the backend; the flow is done
    Success,
    /// Rejected; the form is kept and may be submitted again
    Failed { message: String },
}

impl SubmitState {
    pub fn can_submit(&self) -> bool {
        matches!(self, Self::Submittable | Self::Failed { .. })
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting { .. })
    }
}

/// Why a submission did not go through
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Another attempt is still in flight
    #[error("A booking is already being submitted")]
    InFlight,

    /// The flow already succeeded
    #[error("This booking has already been made")]
    AlreadySubmitted,

    /// Rejected locally, no request was sent
    #[error("{0}")]
    Invalid(AppError),

    /// No member is signed in
    #[error("Please sign in to make a booking")]
    NotSignedIn,

    /// The backend rejected the create call
    #[error("{}", .0.user_message())]
    Backend(ClientError),
}

impl SubmitError {
    /// Whether any request reached the backend
    pub fn was_sent(&self) -> bool {
        matches!(self, Self::Backend(_))
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::InFlight | Self::AlreadySubmitted => ErrorCode::InvalidRequest,
            Self::Invalid(e) => e.code,
            Self::NotSignedIn => ErrorCode::NotAuthenticated,
            Self::Backend(e) => e.error_code(),
        }
    }
}

impl From<AppError> for SubmitError {
    fn from(err: AppError) -> Self {
        Self::Invalid(err)
    }
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Invalid(e) => e,
            SubmitError::Backend(e) => e.into(),
            other => AppError::with_message(other.error_code(), other.to_string()),
        }
    }
}

/// Drives the submission state machine of one booking flow
#[derive(Debug)]
pub struct Submitter {
    state: Mutex<SubmitState>,
}

impl Default for Submitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Submitter {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SubmitState::Idle),
        }
    }

    pub fn state(&self) -> SubmitState {
        self.state.lock().clone()
    }

    /// Track whether the required selections are made
    ///
    /// Moves between `Idle` and `Submittable`; a failed attempt is forgotten
    /// once the form changes. No effect while submitting or after success.
    pub fn set_complete(&self, complete: bool) {
        let mut state = self.state.lock();
        match *state {
            SubmitState::Submitting { .. } | SubmitState::Success => {}
            _ => {
                *state = if complete {
                    SubmitState::Submittable
                } else {
                    SubmitState::Idle
                };
            }
        }
    }

    /// Enter `Submitting` and hand out a fresh idempotency key
    fn begin(&self) -> Result<Uuid, SubmitError> {
        let mut state = self.state.lock();
        match *state {
            SubmitState::Submitting { .. } => Err(SubmitError::InFlight),
            SubmitState::Success => Err(SubmitError::AlreadySubmitted),
            _ => {
                let idempotency_key = Uuid::new_v4();
                *state = SubmitState::Submitting { idempotency_key };
                Ok(idempotency_key)
            }
        }
    }

    /// Run one create attempt
    ///
    /// `create` receives the attempt's idempotency key and is called at most
    /// once. If the returned future is dropped before completing, the flow
    /// goes back to `Submittable`.
    pub async fn submit<F, Fut>(&self, create: F) -> Result<(), SubmitError>
    where
        F: FnOnce(Uuid) -> Fut,
        Fut: Future<Output = ClientResult<()>>,
    {
        let key = self.begin()?;
        let mut guard = AttemptGuard {
            submitter: self,
            finished: false,
        };

        let result = create(key).await;
        guard.finished = true;

        let mut state = self.state.lock();
        match result {
            Ok(()) => {
                tracing::info!(idempotency_key = %key, "Booking accepted");
                *state = SubmitState::Success;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(idempotency_key = %key, error = %e, "Booking rejected");
                *state = SubmitState::Failed {
                    message: e.user_message(),
                };
                Err(SubmitError::Backend(e))
            }
        }
    }
}

struct AttemptGuard<'a> {
    submitter: &'a Submitter,
    finished: bool,
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let mut state = self.submitter.state.lock();
            if state.is_submitting() {
                *state = SubmitState::Submittable;
            }
        }
    }
}
