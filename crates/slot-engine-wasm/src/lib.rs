//! WASM bindings for slot-engine.
//!
//! Exposes free-slot computation to the JavaScript serverless backend via
//! `wasm-bindgen`. Requests and responses cross the boundary as JSON strings;
//! errors surface as JS string exceptions carrying the `SlotError` message.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir functions/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use chrono::{NaiveDate, Utc};
use slot_engine::{BusyInterval, SlotError, WorkingWindow};
use wasm_bindgen::prelude::*;

fn to_js(e: SlotError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_date(s: &str) -> Result<NaiveDate, JsValue> {
    s.parse()
        .map_err(|e| JsValue::from_str(&format!("Invalid date '{}': {}", s, e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Compute free slots for a JSON slot request.
///
/// `request_json` is an object with `events` (array of
/// `{startMinute, endMinute, isSystemScheduled}`), optional `windowStart`,
/// `windowEnd`, `slotDuration`, a required `timeZone`, and an optional
/// `date`. Returns a JSON array of `HH:MM` strings.
#[wasm_bindgen(js_name = "findAvailableSlots")]
pub fn find_available_slots(request_json: &str) -> Result<String, JsValue> {
    slot_engine::handle_slot_request(request_json, Utc::now().date_naive()).map_err(to_js)
}

/// Compute free slots straight from a day's Google Calendar events.
///
/// `request_json` carries `items` (the `events.list` items), optional
/// `patientId` and `markerKey`, the window fields, `timeZone`, and the `date`
/// being booked. Returns a JSON array of `HH:MM` strings.
#[wasm_bindgen(js_name = "findSlotsFromCalendar")]
pub fn find_slots_from_calendar(request_json: &str) -> Result<String, JsValue> {
    slot_engine::handle_calendar_request(request_json).map_err(to_js)
}

/// Compute free slots from positional arguments.
///
/// `events_json` must be a JSON array of busy intervals. Window bounds are
/// minutes from midnight. `date` (`YYYY-MM-DD`) is the reference day for
/// converting system-scheduled times.
#[wasm_bindgen(js_name = "findFreeSlotsForDay")]
pub fn find_free_slots_for_day(
    events_json: &str,
    window_start: u32,
    window_end: u32,
    slot_duration: u32,
    time_zone: &str,
    date: &str,
) -> Result<String, JsValue> {
    let events: Vec<BusyInterval> = serde_json::from_str(events_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid events JSON: {}", e)))?;
    for event in &events {
        event.validate().map_err(to_js)?;
    }
    let window = WorkingWindow::new(window_start, window_end, slot_duration);
    window.validate().map_err(to_js)?;
    let tz = slot_engine::parse_timezone(time_zone).map_err(to_js)?;
    let date = parse_date(date)?;

    let slots = slot_engine::find_available_slots(&events, &window, tz, date);

    serde_json::to_string(&slots)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
