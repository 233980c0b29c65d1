//! Booking flows
//!
//! One flow per booking screen. A flow owns the screen's selections, the
//! latest availability it fetched and the submission state; it holds no
//! state beyond the screen's lifetime. Closing a flow cancels whatever it
//! still has in flight.

mod dining;
mod tee_time;

pub use dining::DiningFlow;
pub use tee_time::TeeTimeFlow;

use std::future::Future;

use chrono::{Days, NaiveDate};
use shared::error::{AppError, AppResult};
use tokio_util::sync::CancellationToken;

use crate::clock::ClubTime;
use crate::error::{ClientError, ClientResult};
use crate::generation::{RequestGeneration, Ticket};

/// Dates a member can pick: today and tomorrow, club-local
pub fn date_choices(time: &ClubTime) -> [NaiveDate; 2] {
    let today = time.today();
    [today, today.checked_add_days(Days::new(1)).unwrap_or(today)]
}

/// Reject dates before today
pub fn check_date(time: &ClubTime, date: NaiveDate) -> AppResult<()> {
    if date < time.today() {
        return Err(AppError::validation(format!(
            "{} is in the past",
            date
        )));
    }
    Ok(())
}

/// Await `fetch` unless the flow is closed first
async fn until_closed<T>(cancel: &CancellationToken, fetch: impl Future<Output = T>) -> ClientResult<T> {
    tokio::select! {
        _ = cancel.cancelled() => Err(ClientError::Cancelled),
        value = fetch => Ok(value),
    }
}

/// Reject a response whose ticket has been superseded
///
/// Call with the flow's state lock held: selections invalidate tickets under
/// the same lock, so a response that passes here cannot be stale.
fn ensure_current(generation: &RequestGeneration, ticket: Ticket) -> ClientResult<()> {
    if generation.is_current(ticket) {
        Ok(())
    } else {
        tracing::debug!(ticket = ticket.value(), "Discarding superseded response");
        Err(ClientError::Cancelled)
    }
}
