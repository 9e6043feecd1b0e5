//! Tests for the free-slot finder.

use chrono::NaiveDate;
use chrono_tz::Tz;
use slot_engine::{find_available_slots, BusyInterval, WorkingWindow};

const JERUSALEM: Tz = chrono_tz::Asia::Jerusalem;

fn summer() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 7, 15).unwrap()
}

fn winter() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
}

fn hm(hour: u32, minute: u32) -> u32 {
    hour * 60 + minute
}

/// Every stepped candidate from `start` while `candidate + duration <= end`.
fn stepped(start: u32, end: u32, duration: u32) -> Vec<String> {
    (start..)
        .step_by(15)
        .take_while(|m| m + duration <= end)
        .map(|m| format!("{:02}:{:02}", m / 60, m % 60))
        .collect()
}

#[test]
fn one_hour_window_offers_two_overlapping_starts() {
    // 07:00+45=07:45 fits, 07:15+45=08:00 fits, 07:30+45=08:15 does not.
    let window = WorkingWindow::new(420, 480, 45);

    let slots = find_available_slots(&[], &window, chrono_tz::UTC, summer());

    assert_eq!(slots, vec!["07:00", "07:15"]);
}

#[test]
fn busy_interval_blocks_every_overlapping_candidate() {
    // 07:00-07:45 overlaps the 07:00 candidate and the 07:15 one (465 > 435).
    let window = WorkingWindow::new(420, 480, 45);
    let events = vec![BusyInterval::busy(420, 465)];

    let slots = find_available_slots(&events, &window, chrono_tz::UTC, summer());

    assert!(slots.is_empty(), "got {:?}", slots);
}

#[test]
fn system_scheduled_start_converted_to_target_zone() {
    // 09:00 UTC is 12:00 in Jerusalem during summer time (UTC+3).
    let window = WorkingWindow::new(420, 480, 45);
    let events = vec![BusyInterval::system_scheduled(540, 585)];

    let slots = find_available_slots(&events, &window, JERUSALEM, summer());

    assert_eq!(slots, vec!["07:00", "07:15", "12:00"]);
}

#[test]
fn system_scheduled_conversion_follows_dst() {
    // Same UTC minute in winter (UTC+2) lands an hour earlier.
    let window = WorkingWindow::new(420, 480, 45);
    let events = vec![BusyInterval::system_scheduled(540, 585)];

    let slots = find_available_slots(&events, &window, JERUSALEM, winter());

    assert!(slots.contains(&"11:00".to_string()));
    assert!(!slots.contains(&"12:00".to_string()));
}

#[test]
fn system_scheduled_bypasses_overlap_with_busy_interval() {
    // A regular event covers the whole day; the patient's booking still shows.
    let window = WorkingWindow::default();
    let events = vec![
        BusyInterval::busy(0, 1440),
        BusyInterval::system_scheduled(hm(10, 0), hm(10, 45)),
    ];

    let slots = find_available_slots(&events, &window, chrono_tz::UTC, summer());

    assert_eq!(slots, vec!["10:00"]);
}

#[test]
fn system_scheduled_does_not_block_regular_slots() {
    let window = WorkingWindow::new(hm(9, 0), hm(10, 0), 30);
    let events = vec![BusyInterval::system_scheduled(hm(9, 0), hm(9, 30))];

    let slots = find_available_slots(&events, &window, chrono_tz::UTC, summer());

    assert_eq!(slots, vec!["09:00", "09:15", "09:30"]);
}

#[test]
fn coinciding_system_and_regular_slot_deduplicated() {
    let window = WorkingWindow::new(hm(9, 0), hm(10, 0), 45);
    let events = vec![BusyInterval::system_scheduled(hm(9, 15), hm(10, 0))];

    let slots = find_available_slots(&events, &window, chrono_tz::UTC, summer());

    assert_eq!(slots, vec!["09:00", "09:15"]);
}

#[test]
fn system_scheduled_outside_window_still_listed() {
    let window = WorkingWindow::new(hm(9, 0), hm(10, 0), 60);
    let events = vec![BusyInterval::system_scheduled(hm(21, 30), hm(22, 15))];

    let slots = find_available_slots(&events, &window, chrono_tz::UTC, summer());

    assert_eq!(slots, vec!["09:00", "21:30"]);
}

#[test]
fn system_scheduled_crossing_midnight_in_target_zone() {
    // 22:30 UTC is 01:30 the next day in Jerusalem summer time.
    let window = WorkingWindow::new(hm(9, 0), hm(10, 0), 60);
    let events = vec![BusyInterval::system_scheduled(hm(22, 30), hm(23, 15))];

    let slots = find_available_slots(&events, &window, JERUSALEM, summer());

    assert_eq!(slots, vec!["01:30", "09:00"]);
}

#[test]
fn system_scheduled_start_past_midnight_skipped() {
    let window = WorkingWindow::new(hm(9, 0), hm(10, 0), 60);
    let events = vec![BusyInterval {
        start_minute: 1440,
        end_minute: 1500,
        is_system_scheduled: true,
        utc_date: None,
    }];

    let slots = find_available_slots(&events, &window, chrono_tz::UTC, summer());

    assert_eq!(slots, vec!["09:00"]);
}

#[test]
fn empty_events_yield_full_stepped_sequence() {
    let window = WorkingWindow::default();

    let slots = find_available_slots(&[], &window, JERUSALEM, summer());

    assert_eq!(slots, stepped(420, 1200, 45));
    assert_eq!(slots.first().map(String::as_str), Some("07:00"));
    assert_eq!(slots.last().map(String::as_str), Some("19:15"));
    assert_eq!(slots.len(), 50);
}

#[test]
fn window_shorter_than_slot_yields_nothing() {
    let window = WorkingWindow::new(hm(9, 0), hm(9, 30), 45);

    let slots = find_available_slots(&[], &window, chrono_tz::UTC, summer());

    assert!(slots.is_empty());
}

#[test]
fn inverted_window_yields_nothing_instead_of_failing() {
    let window = WorkingWindow::new(hm(12, 0), hm(9, 0), 45);

    let slots = find_available_slots(&[], &window, chrono_tz::UTC, summer());

    assert!(slots.is_empty());
}

#[test]
fn window_fully_covered_by_disjoint_intervals_has_no_regular_slots() {
    let window = WorkingWindow::new(hm(8, 0), hm(12, 0), 30);
    let events = vec![
        BusyInterval::busy(hm(8, 0), hm(9, 0)),
        BusyInterval::busy(hm(9, 0), hm(10, 30)),
        BusyInterval::busy(hm(10, 30), hm(12, 0)),
        BusyInterval::system_scheduled(hm(6, 0), hm(6, 45)),
    ];

    let slots = find_available_slots(&events, &window, chrono_tz::UTC, summer());

    assert_eq!(slots, vec!["06:00"]);
}

#[test]
fn adjacent_busy_interval_does_not_block() {
    // Busy 09:00-09:45; the 09:45 candidate starts exactly when it ends.
    let window = WorkingWindow::new(hm(9, 0), hm(11, 0), 45);
    let events = vec![BusyInterval::busy(hm(9, 0), hm(9, 45))];

    let slots = find_available_slots(&events, &window, chrono_tz::UTC, summer());

    assert_eq!(slots, vec!["09:45", "10:00", "10:15"]);
}

#[test]
fn candidate_ending_when_busy_starts_is_free() {
    let window = WorkingWindow::new(hm(9, 0), hm(11, 0), 45);
    let events = vec![BusyInterval::busy(hm(10, 0), hm(11, 0))];

    let slots = find_available_slots(&events, &window, chrono_tz::UTC, summer());

    assert_eq!(slots, vec!["09:00", "09:15"]);
}

#[test]
fn regular_intervals_are_not_timezone_converted() {
    // The same busy minutes block the same slots whatever the target zone.
    let window = WorkingWindow::new(hm(9, 0), hm(11, 0), 60);
    let events = vec![BusyInterval::busy(hm(9, 30), hm(10, 0))];

    let utc = find_available_slots(&events, &window, chrono_tz::UTC, summer());
    let local = find_available_slots(&events, &window, JERUSALEM, summer());

    assert_eq!(utc, vec!["10:00"]);
    assert_eq!(utc, local);
}

#[test]
fn window_may_close_at_midnight() {
    let window = WorkingWindow::new(hm(22, 30), 1440, 45);

    let slots = find_available_slots(&[], &window, chrono_tz::UTC, summer());

    assert_eq!(slots, vec!["22:30", "22:45", "23:00", "23:15"]);
}

#[test]
fn repeated_calls_return_identical_order() {
    let window = WorkingWindow::default();
    let events = vec![
        BusyInterval::busy(hm(12, 0), hm(13, 0)),
        BusyInterval::system_scheduled(hm(5, 0), hm(5, 45)),
        BusyInterval::system_scheduled(hm(16, 15), hm(17, 0)),
    ];

    let first = find_available_slots(&events, &window, JERUSALEM, summer());
    let second = find_available_slots(&events, &window, JERUSALEM, summer());

    assert_eq!(first, second);
}

#[test]
fn system_scheduled_uses_its_own_utc_date() {
    // 00:15 UTC on Nov 3 is 19:15 EST; read on Nov 2 it would be 20:15 EDT.
    let window = WorkingWindow::new(hm(7, 0), hm(8, 0), 45);
    let fall_back = NaiveDate::from_ymd_opt(2025, 11, 2).unwrap();
    let next_utc_day = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
    let events = vec![BusyInterval::system_scheduled(15, 60).on_utc_date(next_utc_day)];

    let slots = find_available_slots(&events, &window, chrono_tz::America::New_York, fall_back);

    assert_eq!(slots, vec!["07:00", "07:15", "19:15"]);
}

#[test]
fn window_end_past_midnight_treated_as_midnight() {
    let window = WorkingWindow::new(hm(23, 0), 1530, 30);

    let slots = find_available_slots(&[], &window, chrono_tz::UTC, summer());

    assert_eq!(slots, vec!["23:00", "23:15", "23:30"]);
}
