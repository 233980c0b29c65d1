//! Club Client - member-facing client for the club's hosted backend
//!
//! Provides tee time and dining availability, booking flows and member
//! sign-in over the backend's REST and auth APIs.

pub mod auth;
pub mod availability;
pub mod backend;
pub mod booking;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod flow;
pub mod generation;
pub mod http;
pub mod logger;

pub use auth::{AuthClient, Session, SessionStore, SignUpOutcome};
pub use availability::{Availability, AvailabilityEngine, AvailabilitySource, ResourceKind};
pub use backend::{ClubBackend, SupabaseBackend};
pub use booking::{BookingForm, SubmitError, SubmitState};
pub use client::{ClubClient, ClubClientBuilder};
pub use clock::{Clock, ClubTime, FixedClock, SystemClock};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use flow::{DiningFlow, TeeTimeFlow};
pub use http::RestClient;

// Re-export shared types for convenience
pub use shared::models::{DiningTable, DiningVenue, TimeSlot};
