//! Client error types

use http::StatusCode;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connection, timeout, TLS, body decode)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend rejected the request; `message` is the backend's own text
    #[error("{message}")]
    Api {
        status: StatusCode,
        code: Option<String>,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Backend answered 401
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    /// Operation needs a signed-in member and there is none
    #[error("Not signed in")]
    NotAuthenticated,

    /// Input rejected locally, before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Request superseded by a newer one, or its screen was closed
    #[error("Request cancelled")]
    Cancelled,
}

impl ClientError {
    /// Text to show the member
    ///
    /// Backend failures are surfaced verbatim so the member sees exactly what
    /// the service said.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } | Self::Unauthorized(message) => message.clone(),
            Self::Validation(message) => message.clone(),
            Self::NotAuthenticated => "Please sign in to continue.".to_string(),
            Self::Http(e) if e.is_timeout() => "The request timed out. Please try again.".to_string(),
            Self::Http(_) => "Could not reach the club service. Please try again.".to_string(),
            other => other.to_string(),
        }
    }

    /// Map onto the unified error code space
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Http(e) if e.is_timeout() => ErrorCode::TimeoutError,
            Self::Http(_) => ErrorCode::NetworkError,
            Self::Api { status, .. } => ErrorCode::from_http_status(*status),
            Self::Unauthorized(_) | Self::NotAuthenticated => ErrorCode::NotAuthenticated,
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::InvalidResponse(_) | Self::Serialization(_) => ErrorCode::InvalidFormat,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Cancelled => ErrorCode::RequestCancelled,
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        let code = err.error_code();
        let app = AppError::with_message(code, err.user_message());
        match err {
            ClientError::Api {
                code: Some(backend_code),
                ..
            } => app.with_detail("backend_code", backend_code),
            _ => app,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
