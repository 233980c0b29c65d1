//! Shared types for the club client
//!
//! Domain models mirrored from the hosted backend, auth DTOs, the unified
//! error system, and time/format helpers used across crates.

pub mod client;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCode};
pub use serde::{Deserialize, Serialize};
