use chrono::{Duration, NaiveDate, NaiveDateTime};

use super::utils::{unescape_text, unfold_lines, IcsTime};
use super::IcsError;
use crate::models::color::RgbaColor;
use crate::utils::date::{end_of_day, start_of_day};

/// One `VEVENT`, with all-day ends already converted to an inclusive bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcsEvent {
    pub summary: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub all_day: bool,
    pub recurrence_rule: Option<String>,
    pub exception_dates: Vec<NaiveDate>,
}

/// Calendar-level properties plus every event in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IcsCalendar {
    pub title: Option<String>,
    pub color: Option<RgbaColor>,
    pub events: Vec<IcsEvent>,
}

#[derive(Default)]
struct EventBuilder {
    summary: String,
    start: Option<IcsTime>,
    end: Option<IcsTime>,
    recurrence_rule: Option<String>,
    exception_dates: Vec<NaiveDate>,
    /// First malformed property; the event is dropped when set.
    invalid: Option<IcsError>,
}

impl EventBuilder {
    fn build(self) -> Option<IcsEvent> {
        let start = self.start?;
        let (start, end, all_day) = match start {
            IcsTime::Date(date) => {
                // DTEND of an all-day event is exclusive
                let end = match self.end {
                    Some(end) if end.date() > date => end_of_day(end.date() - Duration::days(1)),
                    _ => end_of_day(date),
                };
                (start_of_day(date), end, true)
            }
            IcsTime::DateTime(start) => {
                let end = match self.end {
                    Some(IcsTime::DateTime(end)) if end >= start => end,
                    Some(IcsTime::Date(date)) if start_of_day(date) >= start => start_of_day(date),
                    _ => start,
                };
                (start, end, false)
            }
        };

        Some(IcsEvent {
            summary: self.summary,
            start,
            end,
            all_day,
            recurrence_rule: self.recurrence_rule,
            exception_dates: self.exception_dates,
        })
    }
}

/// Parse a calendar file. Events with malformed dates are logged and skipped;
/// the rest of the file is kept.
pub fn from_str(ics_content: &str) -> IcsCalendar {
    let mut calendar = IcsCalendar::default();
    let mut current_event: Option<EventBuilder> = None;
    // Nested components inside an event (VALARM) are skipped.
    let mut nested_depth = 0usize;

    for line in unfold_lines(ics_content) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(component) = line.strip_prefix("BEGIN:") {
            if component == "VEVENT" && current_event.is_none() {
                current_event = Some(EventBuilder::default());
            } else if current_event.is_some() {
                nested_depth += 1;
            }
            continue;
        }

        if let Some(component) = line.strip_prefix("END:") {
            if nested_depth > 0 {
                nested_depth -= 1;
            } else if component == "VEVENT" {
                if let Some(mut builder) = current_event.take() {
                    if let Some(err) = builder.invalid.take() {
                        log::warn!("Skipping VEVENT '{}': {}", builder.summary, err);
                        continue;
                    }
                    match builder.build() {
                        Some(event) => calendar.events.push(event),
                        None => log::debug!("Skipping VEVENT without DTSTART"),
                    }
                }
            }
            continue;
        }

        if nested_depth > 0 {
            continue;
        }

        let Some((key_part, value)) = line.split_once(':') else {
            continue;
        };
        let key = key_part.split(';').next().unwrap_or(key_part);

        match current_event.as_mut() {
            Some(event) => {
                if let Err(err) = parse_event_property(key, key_part, value, event) {
                    if event.invalid.is_none() {
                        event.invalid = Some(err);
                    }
                }
            }
            None => parse_calendar_property(key, value, &mut calendar),
        }
    }

    calendar
}

fn parse_calendar_property(key: &str, value: &str, calendar: &mut IcsCalendar) {
    match key {
        "X-WR-CALNAME" => calendar.title = Some(unescape_text(value)),
        "X-APPLE-CALENDAR-COLOR" => {
            calendar.color = RgbaColor::from_hex_str(value);
            if calendar.color.is_none() {
                log::debug!("Ignoring unparseable calendar colour '{}'", value);
            }
        }
        _ => {}
    }
}

fn parse_event_property(
    key: &str,
    key_part: &str,
    value: &str,
    event: &mut EventBuilder,
) -> Result<(), IcsError> {
    match key {
        "SUMMARY" => event.summary = unescape_text(value),
        "DTSTART" => event.start = Some(IcsTime::parse(key_part, value)?),
        "DTEND" => event.end = Some(IcsTime::parse(key_part, value)?),
        "RRULE" => event.recurrence_rule = Some(value.to_string()),
        "EXDATE" => {
            for item in value.split(',') {
                event.exception_dates.push(IcsTime::parse(key_part, item)?.date());
            }
        }
        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "BEGIN:VCALENDAR\r
VERSION:2.0\r
X-WR-CALNAME:*Family\r
X-APPLE-CALENDAR-COLOR:#34C759\r
BEGIN:VEVENT\r
SUMMARY:Picnic\r
DTSTART;VALUE=DATE:20240601\r
DTEND;VALUE=DATE:20240603\r
END:VEVENT\r
BEGIN:VEVENT\r
SUMMARY:Dentist\r
DTSTART:20240605T090000\r
DTEND:20240605T100000\r
BEGIN:VALARM\r
TRIGGER:-PT15M\r
DTSTART:19990101T000000\r
END:VALARM\r
END:VEVENT\r
END:VCALENDAR\r
";

    #[test]
    fn test_calendar_properties() {
        let calendar = from_str(SAMPLE);
        assert_eq!(calendar.title.as_deref(), Some("*Family"));
        assert_eq!(calendar.color, Some(RgbaColor::rgb(0x34, 0xC7, 0x59)));
        assert_eq!(calendar.events.len(), 2);
    }

    #[test]
    fn test_all_day_end_is_exclusive() {
        let calendar = from_str(SAMPLE);
        let picnic = &calendar.events[0];
        assert!(picnic.all_day);
        assert_eq!(picnic.start.to_string(), "2024-06-01 00:00:00");
        assert_eq!(picnic.end.to_string(), "2024-06-02 23:59:59");
    }

    #[test]
    fn test_alarm_does_not_override_event_start() {
        let calendar = from_str(SAMPLE);
        let dentist = &calendar.events[1];
        assert_eq!(dentist.summary, "Dentist");
        assert_eq!(dentist.start.to_string(), "2024-06-05 09:00:00");
        assert_eq!(dentist.end.to_string(), "2024-06-05 10:00:00");
    }

    #[test]
    fn test_single_all_day_without_end() {
        let calendar = from_str(
            "BEGIN:VEVENT\nDTSTART;VALUE=DATE:20241225\nSUMMARY:Xmas\nEND:VEVENT\n",
        );
        assert_eq!(calendar.events[0].end.to_string(), "2024-12-25 23:59:59");
    }

    #[test]
    fn test_event_without_start_is_skipped() {
        let calendar = from_str("BEGIN:VEVENT\nSUMMARY:Nothing\nEND:VEVENT\n");
        assert!(calendar.events.is_empty());
    }

    #[test]
    fn test_rrule_and_exdate_are_captured() {
        let calendar = from_str(
            "BEGIN:VEVENT\nDTSTART:20240101T080000\nRRULE:FREQ=WEEKLY;COUNT=4\nEXDATE:20240108T080000,20240115T080000\nEND:VEVENT\n",
        );
        let event = &calendar.events[0];
        assert_eq!(event.recurrence_rule.as_deref(), Some("FREQ=WEEKLY;COUNT=4"));
        assert_eq!(event.exception_dates.len(), 2);
    }

    #[test]
    fn test_bad_dates_skip_only_their_event() {
        let calendar = from_str(
            "BEGIN:VCALENDAR\n\
             BEGIN:VEVENT\nSUMMARY:Before\nDTSTART;VALUE=DATE:20240301\nEND:VEVENT\n\
             BEGIN:VEVENT\nSUMMARY:Broken\nDTSTART:2024XX01T000000\nEND:VEVENT\n\
             BEGIN:VEVENT\nSUMMARY:Short\nDTSTART:2024031\nEND:VEVENT\n\
             BEGIN:VEVENT\nSUMMARY:Bad exdate\nDTSTART:20240301T090000\nEXDATE:nope\nEND:VEVENT\n\
             BEGIN:VEVENT\nSUMMARY:After\nDTSTART;VALUE=DATE:20240302\nEND:VEVENT\n\
             END:VCALENDAR\n",
        );

        let summaries: Vec<&str> = calendar.events.iter().map(|e| e.summary.as_str()).collect();
        assert_eq!(summaries, vec!["Before", "After"]);
    }
}
