//! Booking input validation and submission

pub mod request;
pub mod submitter;

pub use request::{
    BookingForm, DiningRequest, MAX_NOTE_LEN, TeeTimeRequest, parse_guest_count, parse_party_size,
};
pub use submitter::{SubmitError, SubmitState, Submitter};
