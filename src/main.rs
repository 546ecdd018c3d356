//! CommunityHub admin console.
//!
//! Usage:
//!   communityhub pending
//!   communityhub approve <APPLICATION_ID>
//!   communityhub reject <APPLICATION_ID> --reason "duplicate business"
//!   communityhub attendance <MEETING_ID>
//!   communityhub check --venue 18.5204,73.8567 --start 2026-03-14T07:00:00Z --at 18.5205,73.8567

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use ch_app::ReviewApplication;
use ch_core::attendance::{
    AttendanceGeofenceRule, GeofenceAttendanceEvaluator, MeetingLocation, UserLocationReading,
};
use ch_core::ids::{ApplicationId, MeetingId};
use ch_core::ports::{AttendanceRepositoryPort, ClockPort};
use ch_infra::fs::app_data_dir::resolve_data_dir;
use ch_infra::{FileApplicationRepository, FileAttendanceRepository, SystemClock};
use communityhub_lib::bootstrap::{
    default_config_path, init_tracing_subscriber, load_config_or_default, ConfigSource,
};

#[derive(Parser, Debug)]
#[command(name = "communityhub")]
#[command(about = "CommunityHub admin console - membership review and attendance")]
struct Args {
    /// Config file (defaults to <data dir>/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List applications awaiting review, oldest first
    Pending,
    /// Admit an applicant
    Approve { id: String },
    /// Turn an applicant down
    Reject {
        id: String,
        #[arg(long)]
        reason: String,
    },
    /// List confirmed attendance for a meeting
    Attendance { meeting_id: String },
    /// Evaluate a location fix against a venue with the configured policy
    Check {
        /// Venue as "lat,lon"
        #[arg(long, value_parser = parse_point)]
        venue: (f64, f64),
        /// Meeting start (RFC 3339)
        #[arg(long)]
        start: DateTime<Utc>,
        /// Member position as "lat,lon"
        #[arg(long, value_parser = parse_point)]
        at: (f64, f64),
        /// When the fix was taken (RFC 3339, defaults to now)
        #[arg(long)]
        captured_at: Option<DateTime<Utc>>,
    },
}

fn parse_point(raw: &str) -> Result<(f64, f64), String> {
    let (lat, lon) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lon\", got {raw:?}"))?;
    let lat = lat.trim().parse().map_err(|e| format!("latitude: {e}"))?;
    let lon = lon.trim().parse().map_err(|e| format!("longitude: {e}"))?;
    Ok((lat, lon))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let (config, config_source) = load_config_or_default(&config_path)?;
    let data_dir = resolve_data_dir(&config.data_dir)?;

    init_tracing_subscriber(&data_dir.join("logs"))?;
    if config_source == ConfigSource::Defaults {
        tracing::info!(path = %config_path.display(), "config file not found, using defaults");
    }
    tracing::debug!(config = %config_path.display(), data_dir = %data_dir.display(), "admin console starting");

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);
    match args.command {
        Command::Pending => {
            let review = review_application(&data_dir, clock);
            let pending = review.list_pending().await?;
            println!("{}", serde_json::to_string_pretty(&pending)?);
        }
        Command::Approve { id } => {
            let review = review_application(&data_dir, clock);
            let member_id = review.approve(&ApplicationId::from(id)).await?;
            println!("approved, member id {member_id}");
        }
        Command::Reject { id, reason } => {
            let review = review_application(&data_dir, clock);
            review.reject(&ApplicationId::from(id), &reason).await?;
            println!("rejected");
        }
        Command::Attendance { meeting_id } => {
            let records = FileAttendanceRepository::with_defaults(data_dir)
                .list_for_meeting(&MeetingId::from(meeting_id))
                .await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Check {
            venue,
            start,
            at,
            captured_at,
        } => {
            let rule = AttendanceGeofenceRule::try_from(&config.attendance)
                .context("Invalid [attendance] section")?;
            let now = clock.now();
            let meeting = MeetingLocation {
                latitude: venue.0,
                longitude: venue.1,
                start_time: start,
            };
            let reading = UserLocationReading {
                latitude: at.0,
                longitude: at.1,
                captured_at: captured_at.unwrap_or(now),
            };
            let decision = GeofenceAttendanceEvaluator::evaluate(&meeting, &reading, &rule, now)?;
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }
    }

    Ok(())
}

fn review_application(data_dir: &std::path::Path, clock: Arc<dyn ClockPort>) -> ReviewApplication {
    ReviewApplication::new(
        Arc::new(FileApplicationRepository::with_defaults(data_dir.to_path_buf())),
        clock,
    )
}
