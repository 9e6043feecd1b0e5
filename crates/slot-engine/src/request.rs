//! JSON request boundary.
//!
//! Validates what a request handler receives before the finder runs, and
//! serializes the slot list as a JSON array of strings. Two request shapes are
//! accepted: pre-computed busy intervals ([`SlotRequest`]) and raw calendar
//! events for a day ([`CalendarSlotRequest`]).

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::calendar::{busy_intervals_for_day, CalendarEvent, PatientMarker};
use crate::error::{Result, SlotError};
use crate::finder::find_available_slots;
use crate::model::{BusyInterval, WorkingWindow};

/// Parse an IANA time zone identifier.
///
/// # Errors
/// Returns `SlotError::InvalidTimezone` if the identifier is unknown.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| SlotError::InvalidTimezone(name.to_string()))
}

/// Window fields shared by both request shapes. Missing fields fall back to
/// [`WorkingWindow::default`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_start: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_end: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_duration: Option<u32>,
}

impl WindowParams {
    /// Fill fields missing here from `fallback`.
    pub fn or(self, fallback: WindowParams) -> WindowParams {
        WindowParams {
            window_start: self.window_start.or(fallback.window_start),
            window_end: self.window_end.or(fallback.window_end),
            slot_duration: self.slot_duration.or(fallback.slot_duration),
        }
    }

    /// Resolve against the defaults and validate.
    pub fn resolve(self) -> Result<WorkingWindow> {
        let defaults = WorkingWindow::default();
        let window = WorkingWindow::new(
            self.window_start.unwrap_or(defaults.start_minute),
            self.window_end.unwrap_or(defaults.end_minute),
            self.slot_duration.unwrap_or(defaults.slot_duration_minutes),
        );
        window.validate()?;
        Ok(window)
    }
}

/// A slot query over busy intervals already reduced to minutes-of-day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRequest {
    #[serde(default)]
    pub events: Vec<BusyInterval>,
    #[serde(flatten)]
    pub window: WindowParams,
    /// IANA zone of the clinic. Left empty, the request fails validation
    /// unless the caller fills it in first.
    #[serde(default)]
    pub time_zone: String,
    /// Reference date for system-scheduled conversions. Defaults to today (UTC).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl SlotRequest {
    /// Validate the request and run the finder.
    ///
    /// # Errors
    /// Returns a `SlotError` for an unknown zone, a malformed window, or a
    /// malformed interval.
    pub fn find_slots(&self, today: NaiveDate) -> Result<Vec<String>> {
        let tz = parse_timezone(&self.time_zone)?;
        let window = self.window.resolve()?;
        for event in &self.events {
            event.validate()?;
        }
        let date = self.date.unwrap_or(today);
        Ok(find_available_slots(&self.events, &window, tz, date))
    }
}

/// A slot query over raw calendar events for one clinic day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSlotRequest {
    #[serde(default)]
    pub items: Vec<CalendarEvent>,
    /// The currently selected patient. Without it nothing is system-scheduled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_key: Option<String>,
    #[serde(flatten)]
    pub window: WindowParams,
    pub time_zone: String,
    pub date: NaiveDate,
}

impl CalendarSlotRequest {
    pub fn marker(&self) -> Option<PatientMarker> {
        self.patient_id.as_ref().map(|id| {
            let marker = PatientMarker::new(id.clone());
            match &self.marker_key {
                Some(key) => marker.with_key(key.clone()),
                None => marker,
            }
        })
    }

    /// Convert the events for `date`, validate, and run the finder.
    ///
    /// # Errors
    /// Returns a `SlotError` for an unknown zone, a malformed window, or a
    /// malformed event.
    pub fn find_slots(&self) -> Result<Vec<String>> {
        let tz = parse_timezone(&self.time_zone)?;
        let window = self.window.resolve()?;
        let marker = self.marker();
        let busy = busy_intervals_for_day(&self.items, self.date, tz, marker.as_ref())?;
        Ok(find_available_slots(&busy, &window, tz, self.date))
    }
}

/// Handle a JSON [`SlotRequest`] and return the slots as a JSON array.
///
/// `today` is used when the request carries no `date`.
///
/// # Errors
/// Returns `SlotError::InvalidRequest` for malformed JSON and the validation
/// errors of [`SlotRequest::find_slots`].
pub fn handle_slot_request(json: &str, today: NaiveDate) -> Result<String> {
    let request: SlotRequest = serde_json::from_str(json)?;
    let slots = request.find_slots(today)?;
    Ok(serde_json::to_string(&slots)?)
}

/// Handle a JSON [`CalendarSlotRequest`] and return the slots as a JSON array.
///
/// # Errors
/// Returns `SlotError::InvalidRequest` for malformed JSON and the validation
/// errors of [`CalendarSlotRequest::find_slots`].
pub fn handle_calendar_request(json: &str) -> Result<String> {
    let request: CalendarSlotRequest = serde_json::from_str(json)?;
    let slots = request.find_slots()?;
    Ok(serde_json::to_string(&slots)?)
}

/// [`handle_slot_request`] with today's UTC date.
pub fn handle_slot_request_now(json: &str) -> Result<String> {
    handle_slot_request(json, Utc::now().date_naive())
}
