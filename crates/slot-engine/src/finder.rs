//! The free-slot finder.
//!
//! Two independent phases feed one ordered set:
//!
//! 1. System-scheduled intervals contribute their start time, read as a UTC
//!    wall-clock time on the interval's own UTC date (or the reference date)
//!    and converted into the target zone. They bypass the overlap filter and the window entirely.
//! 2. Regular candidates are scanned from the window start in
//!    [`SCAN_STEP_MINUTES`](crate::model::SCAN_STEP_MINUTES) steps; a
//!    candidate survives if no non-system interval overlaps it.
//!
//! The set deduplicates and sorts. Zero-padded `HH:MM` strings sort
//! chronologically within a day.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::minutes::{format_hhmm, MINUTES_PER_DAY};
use crate::model::{BusyInterval, WorkingWindow};

/// Compute the ordered, unique list of bookable `HH:MM` start times.
///
/// # Arguments
///
/// * `events` — busy intervals for the day, regular and system-scheduled.
/// * `window` — working hours and slot duration for regular candidates.
/// * `target_tz` — zone used to format system-scheduled start times.
/// * `reference_date` — the UTC date on which system-scheduled minutes are read,
///   unless an interval carries its own `utc_date`. Matters only across DST
///   transitions.
///
/// Never fails. A window too short for one slot yields only system-scheduled
/// entries; an empty `events` yields every stepped candidate in the window.
pub fn find_available_slots(
    events: &[BusyInterval],
    window: &WorkingWindow,
    target_tz: Tz,
    reference_date: NaiveDate,
) -> Vec<String> {
    let booked = system_scheduled_times(events, target_tz, reference_date);
    let free = regular_free_times(events, window);

    let slots: Vec<String> = booked
        .into_iter()
        .chain(free)
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect();

    tracing::debug!(
        events = events.len(),
        window_start = %format_hhmm(window.start_minute),
        window_end = %format_hhmm(window.end_minute),
        duration = window.slot_duration_minutes,
        tz = %target_tz,
        slots = slots.len(),
        "computed available slots"
    );

    slots
}

/// [`find_available_slots`] with today's UTC date as the reference date.
pub fn find_available_slots_today(
    events: &[BusyInterval],
    window: &WorkingWindow,
    target_tz: Tz,
) -> Vec<String> {
    find_available_slots(events, window, target_tz, Utc::now().date_naive())
}

/// Start times of system-scheduled intervals, converted from UTC to `target_tz`.
///
/// Intervals whose start is not a minute of the day are skipped.
fn system_scheduled_times(
    events: &[BusyInterval],
    target_tz: Tz,
    reference_date: NaiveDate,
) -> Vec<String> {
    events
        .iter()
        .filter(|e| e.is_system_scheduled)
        .filter_map(|e| {
            if e.start_minute >= MINUTES_PER_DAY {
                return None;
            }
            let time = NaiveTime::from_num_seconds_from_midnight_opt(e.start_minute * 60, 0)?;
            let local = e
                .utc_date
                .unwrap_or(reference_date)
                .and_time(time)
                .and_utc()
                .with_timezone(&target_tz);
            Some(local.format("%H:%M").to_string())
        })
        .collect()
}

/// Candidate starts in the window that no regular interval overlaps.
fn regular_free_times(events: &[BusyInterval], window: &WorkingWindow) -> Vec<String> {
    let busy: Vec<&BusyInterval> = events.iter().filter(|e| !e.is_system_scheduled).collect();
    let duration = window.slot_duration_minutes;

    window
        .candidate_starts()
        .filter(|&start| {
            let end = start + duration;
            !busy.iter().any(|b| b.overlaps(start, end))
        })
        .map(format_hhmm)
        .collect()
}
