//! # slot-engine
//!
//! Free appointment slot computation for clinic scheduling.
//!
//! Given a day's busy calendar intervals and a working-hours window, the engine
//! lists the `HH:MM` start times at which a fixed-length appointment can be
//! booked. Appointments this system already booked for the selected patient
//! are always surfaced, converted into the clinic's time zone via `chrono-tz`.
//!
//! ## Modules
//!
//! - [`minutes`] — minute-of-day arithmetic and `HH:MM` formatting
//! - [`model`] — busy intervals and the working window
//! - [`finder`] — the free-slot finder
//! - [`calendar`] — Google Calendar events → minute-of-day busy intervals
//! - [`request`] — JSON request validation and handling
//! - [`error`] — Error types

pub mod calendar;
pub mod error;
pub mod finder;
pub mod minutes;
pub mod model;
pub mod request;

pub use calendar::{busy_intervals_for_day, CalendarEvent, CalendarEventList, PatientMarker};
pub use error::SlotError;
pub use finder::{find_available_slots, find_available_slots_today};
pub use minutes::{format_hhmm, minute_of_day, parse_hhmm, MINUTES_PER_DAY};
pub use model::{BusyInterval, WorkingWindow, SCAN_STEP_MINUTES};
pub use request::{
    handle_calendar_request, handle_slot_request, handle_slot_request_now, parse_timezone,
    CalendarSlotRequest, SlotRequest, WindowParams,
};
