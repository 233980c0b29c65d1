//! Availability
//!
//! - [`window`]: operating windows and slot generation
//! - [`filter`]: past/booked/overlap filters
//! - [`engine`]: backend reads with local fallbacks

pub mod engine;
pub mod filter;
pub mod window;

pub use engine::{Availability, AvailabilityEngine, AvailabilitySource};
pub use filter::{apply_slot_counts, filter_dining, filter_tee_times, free_tables, mark_past};
pub use window::{OperatingWindow, ResourceKind, generate_slots};
