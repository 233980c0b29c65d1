//! clubctl - command-line front end for the club client

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use club_client::{Availability, ClientConfig, ClubClient, TimeSlot, logger};
use shared::util::{format_12h, parse_date};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "clubctl", version, about = "Check club availability from the terminal")]
struct Cli {
    /// Member email; signs in before running the command
    #[arg(long, env = "CLUB_EMAIL")]
    email: Option<String>,

    /// Member password
    #[arg(long, env = "CLUB_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Tee times for a date (YYYY-MM-DD, default today)
    Tee { date: Option<String> },
    /// Dining slots for a venue, date and party size
    Dining {
        venue_id: Uuid,
        date: String,
        #[arg(default_value_t = 2)]
        party: u32,
    },
    /// Dining venues
    Venues,
    /// Club announcements
    Announcements,
}

fn date_arg(raw: &str) -> anyhow::Result<NaiveDate> {
    parse_date(raw).with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", raw))
}

fn print_slots(title: &str, slots: &Availability<TimeSlot>) {
    println!("{}", title);
    if let Some(reason) = slots.degraded_reason() {
        println!("  ! availability could not be checked ({}); times shown may be taken", reason);
    }
    let open: Vec<String> = slots.open_times().map(format_12h).collect();
    if open.is_empty() {
        println!("  no times available");
        return;
    }
    for time in open {
        println!("  {}", time);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ClientConfig::from_env();
    logger::init_from_config(&config);
    let client = ClubClient::builder()
        .config(config)
        .build()
        .context("failed to create club client")?;

    if let (Some(email), Some(password)) = (cli.email.as_deref(), cli.password.as_deref()) {
        client
            .auth()
            .sign_in_with_password(email, password)
            .await
            .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    }

    match cli.command {
        Command::Tee { date } => {
            let date = match date {
                Some(raw) => date_arg(&raw)?,
                None => client.engine().time().today(),
            };
            let slots = client.engine().tee_time_slots(date).await;
            print_slots(&format!("Tee times on {}", date), &slots);
        }
        Command::Dining {
            venue_id,
            date,
            party,
        } => {
            let date = date_arg(&date)?;
            anyhow::ensure!(party >= 1, "party size must be at least 1");
            let slots = client.engine().dining_slots(venue_id, date, party).await;
            print_slots(&format!("Dining on {} for {}", date, party), &slots);
        }
        Command::Venues => {
            let venues = client
                .dining_venues()
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            for venue in venues {
                println!("{}  {}", venue.id, venue.name);
            }
        }
        Command::Announcements => {
            let announcements = client
                .announcements()
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            for a in announcements {
                println!("{}  {}", a.created_at.format("%Y-%m-%d"), a.title);
            }
        }
    }

    if client.session().is_signed_in()
        && let Err(e) = client.auth().sign_out().await
    {
        tracing::warn!("Sign-out failed: {}", e);
    }

    Ok(())
}
