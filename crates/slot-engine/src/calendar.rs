//! Google Calendar events → minute-of-day busy intervals.
//!
//! Accepts the JSON items of a Calendar API `events.list` response and reduces
//! each one to a [`BusyInterval`] on a single clinic day.
//!
//! Regular events are expressed in the clinic's local minute-of-day and clipped
//! to the day. Events booked by this system for the selected patient (found
//! through a private extended property) keep their **UTC** wall-clock minutes
//! and UTC date; the finder converts those back into the clinic zone when
//! formatting.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::minutes::{minute_of_day, MINUTES_PER_DAY};
use crate::model::BusyInterval;

/// Extended-property key the booking flow writes the patient id under.
pub const DEFAULT_MARKER_KEY: &str = "patientId";

/// The body of an `events.list` response. Only `items` is read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarEventList {
    #[serde(default)]
    pub items: Vec<CalendarEvent>,
}

/// A calendar event as returned by the Google Calendar API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    /// `confirmed`, `tentative` or `cancelled`.
    #[serde(default)]
    pub status: Option<String>,
    /// `opaque` (blocks time) or `transparent` (shows as free).
    #[serde(default)]
    pub transparency: Option<String>,
    /// Cancelled instances may omit start and end entirely.
    #[serde(default)]
    pub start: EventTime,
    #[serde(default)]
    pub end: EventTime,
    #[serde(default)]
    pub extended_properties: Option<ExtendedProperties>,
}

/// Start or end of an event: `dateTime` for timed events, `date` for all-day ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtendedProperties {
    #[serde(default)]
    pub private: HashMap<String, String>,
    #[serde(default)]
    pub shared: HashMap<String, String>,
}

/// Identifies events booked by this system for the currently selected patient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientMarker {
    pub key: String,
    pub patient_id: String,
}

impl PatientMarker {
    pub fn new(patient_id: impl Into<String>) -> Self {
        Self {
            key: DEFAULT_MARKER_KEY.to_string(),
            patient_id: patient_id.into(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// True when the event's private extended property `key` equals the patient id.
    pub fn matches(&self, event: &CalendarEvent) -> bool {
        event
            .extended_properties
            .as_ref()
            .and_then(|props| props.private.get(&self.key))
            .is_some_and(|value| *value == self.patient_id)
    }
}

enum Span {
    Timed {
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },
    AllDay {
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl CalendarEvent {
    fn label(&self) -> String {
        match (&self.id, &self.summary) {
            (Some(id), _) => id.clone(),
            (None, Some(summary)) => summary.clone(),
            (None, None) => "<unnamed event>".to_string(),
        }
    }

    /// Cancelled and show-as-free events do not block time.
    pub fn blocks_time(&self) -> bool {
        self.status.as_deref() != Some("cancelled")
            && self.transparency.as_deref() != Some("transparent")
    }

    fn span(&self) -> Result<Span> {
        let span = match (
            self.start.date_time,
            self.end.date_time,
            self.start.date,
            self.end.date,
        ) {
            (Some(start), Some(end), _, _) => {
                if end < start {
                    return Err(SlotError::InvalidEvent(format!(
                        "{}: ends before it starts",
                        self.label()
                    )));
                }
                Span::Timed { start, end }
            }
            (None, None, Some(start), Some(end)) => {
                if end < start {
                    return Err(SlotError::InvalidEvent(format!(
                        "{}: ends before it starts",
                        self.label()
                    )));
                }
                Span::AllDay { start, end }
            }
            _ => {
                return Err(SlotError::InvalidEvent(format!(
                    "{}: start and end need both dateTime or both date",
                    self.label()
                )))
            }
        };
        Ok(span)
    }

    /// Reduce this event to a busy interval on `day` in `clinic_tz`.
    ///
    /// Returns `Ok(None)` when the event does not block any time on that day:
    /// it is cancelled, transparent, falls on another day, or is a zero-length
    /// event not booked for the selected patient.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidEvent` if start/end are missing, mixed, or reversed.
    pub fn to_busy_interval(
        &self,
        day: NaiveDate,
        clinic_tz: Tz,
        marker: Option<&PatientMarker>,
    ) -> Result<Option<BusyInterval>> {
        if !self.blocks_time() {
            return Ok(None);
        }
        let span = self.span()?;

        let system = marker.is_some_and(|m| m.matches(self));
        let day_start = day.and_time(NaiveTime::MIN);
        let day_end = day
            .succ_opt()
            .map(|next| next.and_time(NaiveTime::MIN))
            .ok_or_else(|| SlotError::InvalidEvent(format!("no day after {day}")))?;

        let interval = match span {
            Span::AllDay { start, end } => {
                (start <= day && day < end).then_some(BusyInterval {
                    start_minute: 0,
                    end_minute: MINUTES_PER_DAY,
                    is_system_scheduled: system,
                    utc_date: None,
                })
            }
            Span::Timed { start, end } => {
                let local_start = start.with_timezone(&clinic_tz).naive_local();
                let local_end = end.with_timezone(&clinic_tz).naive_local();
                let touches_day = if system && local_start == local_end {
                    day_start <= local_start && local_start < day_end
                } else {
                    local_end > day_start && local_start < day_end
                };
                if !touches_day {
                    None
                } else if system {
                    Some(utc_interval(start.with_timezone(&Utc), end.with_timezone(&Utc)))
                } else {
                    clipped_interval(local_start, local_end, day_start, day_end)
                }
            }
        };

        Ok(interval)
    }
}

/// Local interval clipped to `[day_start, day_end)`, as regular busy minutes.
fn clipped_interval(
    start: NaiveDateTime,
    end: NaiveDateTime,
    day_start: NaiveDateTime,
    day_end: NaiveDateTime,
) -> Option<BusyInterval> {
    let start_minute = if start <= day_start {
        0
    } else {
        minute_of_day(&start)
    };
    let end_minute = if end >= day_end {
        MINUTES_PER_DAY
    } else {
        minute_of_day(&end)
    };
    (start_minute < end_minute).then(|| BusyInterval::busy(start_minute, end_minute))
}

/// UTC wall-clock minutes for a system-scheduled event, pinned to the UTC
/// date of its start.
///
/// An end on a later UTC day is pinned to midnight. Zero-length bookings still
/// surface: the end is kept at least one minute past the start, since only the
/// start of a system-scheduled interval is ever read.
fn utc_interval(start: DateTime<Utc>, end: DateTime<Utc>) -> BusyInterval {
    let start_minute = minute_of_day(&start);
    let end_minute = if end.date_naive() > start.date_naive() {
        MINUTES_PER_DAY
    } else {
        minute_of_day(&end)
    };
    let end_minute = end_minute.max(start_minute + 1).min(MINUTES_PER_DAY);
    BusyInterval::system_scheduled(start_minute, end_minute).on_utc_date(start.date_naive())
}

/// Convert every event into a busy interval on `day`, dropping the ones that
/// block nothing.
///
/// # Errors
/// Fails on the first malformed event.
pub fn busy_intervals_for_day(
    events: &[CalendarEvent],
    day: NaiveDate,
    clinic_tz: Tz,
    marker: Option<&PatientMarker>,
) -> Result<Vec<BusyInterval>> {
    let mut intervals = Vec::with_capacity(events.len());
    for event in events {
        match event.to_busy_interval(day, clinic_tz, marker)? {
            Some(interval) => intervals.push(interval),
            None => tracing::trace!(event = %event.label(), %day, "event blocks no time"),
        }
    }

    tracing::debug!(
        events = events.len(),
        busy = intervals.len(),
        system = intervals.iter().filter(|i| i.is_system_scheduled).count(),
        %day,
        "converted calendar events"
    );

    Ok(intervals)
}
