//! `slots` CLI — compute free appointment slots from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Busy intervals already in minutes-of-day (stdin → stdout)
//! echo '{"events":[{"startMinute":420,"endMinute":465}],"timeZone":"Asia/Jerusalem"}' | slots find
//!
//! # Fill window and zone from flags or CLINIC_* environment variables
//! slots --time-zone Asia/Jerusalem --window-start 08:00 --window-end 16:00 find -i busy.json
//!
//! # Raw Google Calendar events.list response for one day
//! slots --time-zone Asia/Jerusalem calendar --date 2026-07-15 --patient-id p-17 -i events.json
//! ```
//!
//! Output is always a JSON array of `HH:MM` strings. Diagnostics go to stderr,
//! filtered by `RUST_LOG`.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use slot_engine::request::WindowParams;
use slot_engine::{
    busy_intervals_for_day, find_available_slots, parse_hhmm, parse_timezone, CalendarEventList,
    PatientMarker, SlotRequest,
};
use std::io::{self, Read};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Free appointment slot finder for clinic calendars"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Clinic IANA time zone
    #[arg(long, global = true, env = "CLINIC_TIME_ZONE")]
    time_zone: Option<String>,

    /// Start of working hours (HH:MM)
    #[arg(long, global = true, env = "CLINIC_WINDOW_START")]
    window_start: Option<String>,

    /// End of working hours (HH:MM, 24:00 allowed)
    #[arg(long, global = true, env = "CLINIC_WINDOW_END")]
    window_end: Option<String>,

    /// Appointment length in minutes
    #[arg(long, global = true, env = "CLINIC_SLOT_DURATION")]
    slot_duration: Option<u32>,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Find slots for a request of minute-of-day busy intervals
    Find {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Reference date (YYYY-MM-DD) when the request has none; defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Find slots from a Google Calendar events.list response
    Calendar {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// The clinic day being booked (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Selected patient; their existing bookings are always listed
        #[arg(long)]
        patient_id: Option<String>,
        /// Private extended property holding the patient id
        #[arg(long, default_value = slot_engine::calendar::DEFAULT_MARKER_KEY)]
        marker_key: String,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let flags = window_flags(&cli)?;
    tracing::debug!(
        tz = cli.time_zone.as_deref().unwrap_or("-"),
        ?flags,
        "configuration from flags and environment"
    );

    match &cli.command {
        Commands::Find {
            input,
            output,
            date,
        } => {
            let json = read_input(input.as_deref())?;
            let mut request: SlotRequest =
                serde_json::from_str(&json).context("Failed to parse slot request")?;
            request.window = request.window.or(flags);
            if let Some(tz) = &cli.time_zone {
                if request.time_zone.is_empty() {
                    request.time_zone = tz.clone();
                }
            }

            let today = date.unwrap_or_else(|| Utc::now().date_naive());
            tracing::debug!(
                input = input.as_deref().unwrap_or("<stdin>"),
                events = request.events.len(),
                tz = %request.time_zone,
                date = %request.date.unwrap_or(today),
                "resolved slot request"
            );
            let slots = request
                .find_slots(today)
                .context("Failed to compute slots")?;
            write_output(output.as_deref(), &render(&slots, cli.pretty)?)?;
        }
        Commands::Calendar {
            input,
            output,
            date,
            patient_id,
            marker_key,
        } => {
            let tz_name = cli
                .time_zone
                .as_deref()
                .context("--time-zone (or CLINIC_TIME_ZONE) is required for calendar input")?;
            let tz = parse_timezone(tz_name)?;
            let window = flags.resolve().context("Invalid working window")?;
            tracing::debug!(
                input = input.as_deref().unwrap_or("<stdin>"),
                tz = %tz,
                window_start = window.start_minute,
                window_end = window.end_minute,
                duration = window.slot_duration_minutes,
                patient = patient_id.as_deref().unwrap_or("-"),
                %date,
                "resolved calendar request"
            );

            let json = read_input(input.as_deref())?;
            let list: CalendarEventList =
                serde_json::from_str(&json).context("Failed to parse calendar events")?;
            let marker = patient_id
                .as_ref()
                .map(|id| PatientMarker::new(id.clone()).with_key(marker_key.clone()));

            let busy = busy_intervals_for_day(&list.items, *date, tz, marker.as_ref())
                .context("Failed to convert calendar events")?;
            let slots = find_available_slots(&busy, &window, tz, *date);
            write_output(output.as_deref(), &render(&slots, cli.pretty)?)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default = if verbose { "slots=debug,slot_engine=debug" } else { "slots=warn" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
    Ok(())
}

/// Window parameters from the global flags, with `HH:MM` parsed to minutes.
fn window_flags(cli: &Cli) -> Result<WindowParams> {
    let parse = |flag: &str, value: Option<&str>| -> Result<Option<u32>> {
        value
            .map(|v| parse_hhmm(v).with_context(|| format!("Invalid --{}", flag)))
            .transpose()
    };
    Ok(WindowParams {
        window_start: parse("window-start", cli.window_start.as_deref())?,
        window_end: parse("window-end", cli.window_end.as_deref())?,
        slot_duration: cli.slot_duration,
    })
}

fn render(slots: &[String], pretty: bool) -> Result<String> {
    let mut out = if pretty {
        serde_json::to_string_pretty(slots)?
    } else {
        serde_json::to_string(slots)?
    };
    out.push('\n');
    Ok(out)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
