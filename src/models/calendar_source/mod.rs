use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::color::RgbaColor;
use crate::utils::date::{end_of_day, start_of_day};

/// One event occurrence as a closed interval of local naive timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl EventInterval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// True when the interval touches `[start, end]`, both ends inclusive.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start <= end && self.end >= start
    }

    /// True when the interval touches `[00:00:00, 23:59:59]` of `date`.
    pub fn overlaps_day(&self, date: NaiveDate) -> bool {
        self.overlaps(start_of_day(date), end_of_day(date))
    }
}

/// A calendar as reported by the event provider, before any events are fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarInfo {
    pub id: String,
    pub title: String,
    pub color: RgbaColor,
}

/// A selected calendar and its events, in the order the provider returned them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSource {
    pub name: String,
    pub color: RgbaColor,
    pub events: Vec<EventInterval>,
}

impl CalendarSource {
    /// First event overlapping `date`, scanning in stored order.
    pub fn first_event_on(&self, date: NaiveDate) -> Option<&EventInterval> {
        self.events.iter().find(|event| event.overlaps_day(date))
    }

    pub fn count_events_on(&self, date: NaiveDate) -> usize {
        self.events.iter().filter(|event| event.overlaps_day(date)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_event_inside_day_overlaps() {
        let event = EventInterval::new(at(2024, 3, 15, 9, 0), at(2024, 3, 15, 10, 0));
        assert!(event.overlaps_day(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()));
        assert!(!event.overlaps_day(NaiveDate::from_ymd_opt(2024, 3, 16).unwrap()));
    }

    #[test]
    fn test_multi_day_event_overlaps_each_day() {
        let event = EventInterval::new(at(2024, 3, 14, 22, 0), at(2024, 3, 16, 1, 0));
        for day in 14..=16 {
            assert!(event.overlaps_day(NaiveDate::from_ymd_opt(2024, 3, day).unwrap()));
        }
    }

    #[test]
    fn test_event_ending_at_midnight_touches_next_day() {
        let event = EventInterval::new(at(2024, 3, 14, 22, 0), at(2024, 3, 15, 0, 0));
        assert!(event.overlaps_day(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()));
    }

    #[test]
    fn test_first_event_on_uses_stored_order() {
        let source = CalendarSource {
            name: "Work".to_string(),
            color: RgbaColor::rgb(1, 2, 3),
            events: vec![
                EventInterval::new(at(2024, 3, 15, 12, 0), at(2024, 3, 15, 13, 0)),
                EventInterval::new(at(2024, 3, 15, 8, 0), at(2024, 3, 15, 9, 0)),
            ],
        };
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(source.first_event_on(date).unwrap().start, at(2024, 3, 15, 12, 0));
        assert_eq!(source.count_events_on(date), 2);
    }
}
