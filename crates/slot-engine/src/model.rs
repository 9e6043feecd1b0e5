//! Busy intervals and the working window.
//!
//! Both are built per request from calendar query results and dropped once the
//! slot list is produced; nothing here is persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::minutes::{format_hhmm, MINUTES_PER_DAY};

/// Distance between consecutive candidate start times, in minutes.
///
/// Fixed regardless of slot duration, so 45-minute slots are offered at
/// 07:00, 07:15, 07:30 and so on rather than back-to-back.
pub const SCAN_STEP_MINUTES: u32 = 15;

/// A busy period on the calendar, as minutes from local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusyInterval {
    pub start_minute: u32,
    pub end_minute: u32,
    /// Set for events this system booked for the currently selected patient.
    /// For those, `start_minute` is a UTC wall-clock minute.
    #[serde(default)]
    pub is_system_scheduled: bool,
    /// UTC date `start_minute` belongs to, for system-scheduled intervals.
    /// When absent the finder's reference date is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_date: Option<NaiveDate>,
}

impl BusyInterval {
    /// A regular (non-system) busy interval.
    pub fn busy(start_minute: u32, end_minute: u32) -> Self {
        Self {
            start_minute,
            end_minute,
            is_system_scheduled: false,
            utc_date: None,
        }
    }

    /// A system-scheduled interval whose minutes are UTC wall-clock minutes.
    pub fn system_scheduled(start_minute: u32, end_minute: u32) -> Self {
        Self {
            start_minute,
            end_minute,
            is_system_scheduled: true,
            utc_date: None,
        }
    }

    /// Pin a system-scheduled interval to the UTC date its minutes belong to.
    pub fn on_utc_date(mut self, date: NaiveDate) -> Self {
        self.utc_date = Some(date);
        self
    }

    /// Half-open overlap test against `[start, end)`.
    ///
    /// Touching intervals (one ends exactly when the other starts) do not overlap.
    pub fn overlaps(&self, start: u32, end: u32) -> bool {
        self.start_minute < end && self.end_minute > start
    }

    /// Check `start < end <= 1440`.
    pub fn validate(&self) -> Result<()> {
        if self.start_minute >= self.end_minute || self.end_minute > MINUTES_PER_DAY {
            return Err(SlotError::InvalidInterval(format!(
                "{}-{} (start {} / end {})",
                format_hhmm(self.start_minute),
                format_hhmm(self.end_minute),
                self.start_minute,
                self.end_minute
            )));
        }
        Ok(())
    }
}

/// The daily range searched for regular slots, and the slot length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingWindow {
    pub start_minute: u32,
    pub end_minute: u32,
    pub slot_duration_minutes: u32,
}

impl Default for WorkingWindow {
    /// 07:00–20:00 with 45-minute slots.
    fn default() -> Self {
        Self {
            start_minute: 7 * 60,
            end_minute: 20 * 60,
            slot_duration_minutes: 45,
        }
    }
}

impl WorkingWindow {
    pub fn new(start_minute: u32, end_minute: u32, slot_duration_minutes: u32) -> Self {
        Self {
            start_minute,
            end_minute,
            slot_duration_minutes,
        }
    }

    /// Check `start < end <= 1440` and a positive slot duration.
    ///
    /// A window too short for a single slot is still valid; it simply has no
    /// regular candidates.
    pub fn validate(&self) -> Result<()> {
        if self.start_minute >= self.end_minute {
            return Err(SlotError::InvalidWindow(format!(
                "start {} is not before end {}",
                self.start_minute, self.end_minute
            )));
        }
        if self.end_minute > MINUTES_PER_DAY {
            return Err(SlotError::InvalidWindow(format!(
                "end {} is past midnight",
                self.end_minute
            )));
        }
        if self.slot_duration_minutes == 0 {
            return Err(SlotError::InvalidWindow(
                "slot duration must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Start minutes of every candidate slot that fits inside the window,
    /// stepped by [`SCAN_STEP_MINUTES`].
    ///
    /// An end past midnight is treated as midnight.
    pub fn candidate_starts(&self) -> impl Iterator<Item = u32> {
        let Self {
            start_minute,
            end_minute,
            slot_duration_minutes,
        } = *self;
        let end_minute = end_minute.min(MINUTES_PER_DAY);
        (start_minute..=end_minute)
            .step_by(SCAN_STEP_MINUTES as usize)
            .take_while(move |start| start.saturating_add(slot_duration_minutes) <= end_minute)
    }
}
