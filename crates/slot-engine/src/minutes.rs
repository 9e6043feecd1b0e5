//! Minute-of-day arithmetic.
//!
//! A minute-of-day is an offset from local midnight in `[0, 1440)`. Window
//! ends may be exactly 1440, meaning midnight at the end of the day.

use chrono::Timelike;

use crate::error::{Result, SlotError};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Format a minute-of-day as zero-padded 24-hour `HH:MM`.
///
/// Values of a full day or more wrap, so 1440 formats as `"00:00"`.
pub fn format_hhmm(minute: u32) -> String {
    let minute = minute % MINUTES_PER_DAY;
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

/// Parse `HH:MM` (or `H:MM`) into a minute-of-day.
///
/// `"24:00"` is accepted and yields 1440 so that a window can close at
/// midnight.
///
/// # Errors
/// Returns `SlotError::InvalidTime` for anything that is not a valid time of day.
pub fn parse_hhmm(s: &str) -> Result<u32> {
    let invalid = || SlotError::InvalidTime(s.to_string());

    let (hours, minutes) = s.trim().split_once(':').ok_or_else(invalid)?;
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return Err(invalid());
    }
    if !all_digits(hours) || !all_digits(minutes) {
        return Err(invalid());
    }
    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;

    match (hours, minutes) {
        (24, 0) => Ok(MINUTES_PER_DAY),
        (h, m) if h < 24 && m < 60 => Ok(h * 60 + m),
        _ => Err(invalid()),
    }
}

/// Minute-of-day of any time-bearing chrono value. Seconds are truncated.
pub fn minute_of_day<T: Timelike>(time: &T) -> u32 {
    time.hour() * 60 + time.minute()
}
