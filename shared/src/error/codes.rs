//! Unified error codes for the club client
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Member / permission errors
//! - 4xxx: Tee time errors
//! - 5xxx: Dining errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so they serialize compactly
/// and can be matched on by any front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Session has expired
    SessionExpired = 1005,
    /// Email address not yet confirmed
    EmailNotConfirmed = 1006,
    /// Password too short
    PasswordTooShort = 1007,
    /// Email address malformed
    EmailInvalid = 1008,
    /// Email already registered
    EmailAlreadyRegistered = 1009,

    // ==================== 2xxx: Member ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Member profile not found
    ProfileNotFound = 2002,
    /// Membership is not active
    MemberInactive = 2003,

    // ==================== 4xxx: Tee Time ====================
    /// Tee time slot already taken
    TeeTimeUnavailable = 4001,
    /// Tee time slot already started
    TeeTimeInPast = 4002,
    /// Tee time outside the course operating window
    TeeTimeOutsideWindow = 4003,
    /// Tee time not found
    TeeTimeNotFound = 4004,

    // ==================== 5xxx: Dining ====================
    /// Dining venue not found
    VenueNotFound = 5001,
    /// Table not found
    TableNotFound = 5002,
    /// Table already reserved for the requested interval
    TableUnavailable = 5003,
    /// Table seats fewer people than the party
    TableTooSmall = 5004,
    /// Dining slot already started or fully booked
    DiningSlotUnavailable = 5005,
    /// Reservation not found
    ReservationNotFound = 5006,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Backend service unavailable
    BackendUnavailable = 9006,
    /// Request was cancelled or superseded
    RequestCancelled = 9007,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::SessionExpired => "Session has expired",
            ErrorCode::EmailNotConfirmed => "Email address has not been confirmed",
            ErrorCode::PasswordTooShort => "Password must be at least 6 characters",
            ErrorCode::EmailInvalid => "Email address is invalid",
            ErrorCode::EmailAlreadyRegistered => "Email address is already registered",

            // Member
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::ProfileNotFound => "Member profile not found",
            ErrorCode::MemberInactive => "Membership is not active",

            // Tee time
            ErrorCode::TeeTimeUnavailable => "Tee time is no longer available",
            ErrorCode::TeeTimeInPast => "Tee time has already passed",
            ErrorCode::TeeTimeOutsideWindow => "Tee time is outside course hours",
            ErrorCode::TeeTimeNotFound => "Tee time not found",

            // Dining
            ErrorCode::VenueNotFound => "Dining venue not found",
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableUnavailable => "Table is already reserved",
            ErrorCode::TableTooSmall => "Table is too small for the party",
            ErrorCode::DiningSlotUnavailable => "Dining time is no longer available",
            ErrorCode::ReservationNotFound => "Reservation not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::BackendUnavailable => "Backend service unavailable",
            ErrorCode::RequestCancelled => "Request was cancelled",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::SessionExpired),
            1006 => Ok(ErrorCode::EmailNotConfirmed),
            1007 => Ok(ErrorCode::PasswordTooShort),
            1008 => Ok(ErrorCode::EmailInvalid),
            1009 => Ok(ErrorCode::EmailAlreadyRegistered),

            // Member
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::ProfileNotFound),
            2003 => Ok(ErrorCode::MemberInactive),

            // Tee time
            4001 => Ok(ErrorCode::TeeTimeUnavailable),
            4002 => Ok(ErrorCode::TeeTimeInPast),
            4003 => Ok(ErrorCode::TeeTimeOutsideWindow),
            4004 => Ok(ErrorCode::TeeTimeNotFound),

            // Dining
            5001 => Ok(ErrorCode::VenueNotFound),
            5002 => Ok(ErrorCode::TableNotFound),
            5003 => Ok(ErrorCode::TableUnavailable),
            5004 => Ok(ErrorCode::TableTooSmall),
            5005 => Ok(ErrorCode::DiningSlotUnavailable),
            5006 => Ok(ErrorCode::ReservationNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::BackendUnavailable),
            9007 => Ok(ErrorCode::RequestCancelled),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}
