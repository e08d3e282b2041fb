//! Expansion of recurring events into the occurrences inside a time range.
//!
//! Supports `FREQ=DAILY|WEEKLY|MONTHLY|YEARLY` with `INTERVAL`, `COUNT`,
//! `UNTIL` and weekly `BYDAY`. Monthly and yearly rules repeat on the start
//! date's day of month; months without that day are skipped.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Weekday};

use super::import::IcsEvent;
use crate::models::calendar_source::EventInterval;

/// Upper bound on recurrence periods walked for one event.
const MAX_PERIODS: i64 = 100_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RecurrenceFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

fn rule_part<'a>(rrule: &'a str, name: &str) -> Option<&'a str> {
    rrule.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim().eq_ignore_ascii_case(name).then_some(value.trim())
    })
}

fn detect_frequency(rrule: &str) -> Option<RecurrenceFrequency> {
    match rule_part(rrule, "FREQ")? {
        "DAILY" => Some(RecurrenceFrequency::Daily),
        "WEEKLY" => Some(RecurrenceFrequency::Weekly),
        "MONTHLY" => Some(RecurrenceFrequency::Monthly),
        "YEARLY" => Some(RecurrenceFrequency::Yearly),
        _ => None,
    }
}

fn parse_count(rrule: &str) -> Option<usize> {
    rule_part(rrule, "COUNT")?.parse().ok()
}

fn parse_interval(rrule: &str) -> i64 {
    rule_part(rrule, "INTERVAL")
        .and_then(|value| value.parse::<i64>().ok())
        .filter(|interval| *interval > 0)
        .unwrap_or(1)
}

fn parse_until(rrule: &str) -> Option<NaiveDate> {
    let value = rule_part(rrule, "UNTIL")?;
    if value.len() < 8 || !value.is_ascii() {
        return None;
    }
    NaiveDate::parse_from_str(&value[..8], "%Y%m%d").ok()
}

fn weekday_from_code(code: &str) -> Option<Weekday> {
    // Ordinal prefixes such as "2MO" are not supported; the weekday is kept.
    let code = code.trim_start_matches(|c: char| c == '+' || c == '-' || c.is_ascii_digit());
    match code {
        "MO" => Some(Weekday::Mon),
        "TU" => Some(Weekday::Tue),
        "WE" => Some(Weekday::Wed),
        "TH" => Some(Weekday::Thu),
        "FR" => Some(Weekday::Fri),
        "SA" => Some(Weekday::Sat),
        "SU" => Some(Weekday::Sun),
        _ => None,
    }
}

fn parse_weekly_byday(rrule: &str, fallback: Weekday) -> Vec<Weekday> {
    let mut days: Vec<Weekday> = rule_part(rrule, "BYDAY")
        .map(|values| values.split(',').filter_map(weekday_from_code).collect())
        .unwrap_or_default();
    if days.is_empty() {
        days.push(fallback);
    }
    days.sort_by_key(|day| day.num_days_from_monday());
    days.dedup();
    days
}

/// `date` moved by `months`. The inner `None` means that month lacks the
/// day; the outer `None` means the month is outside the supported calendar.
fn add_months(date: NaiveDate, months: i64) -> Option<Option<NaiveDate>> {
    let total = i64::from(date.year())
        .checked_mul(12)?
        .checked_add(i64::from(date.month0()))?
        .checked_add(months)?;
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = total.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(NaiveDate::from_ymd_opt(year, month, date.day()))
}

fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(u64::try_from(days).ok()?))
}

/// Candidate occurrence dates of period `period`, in ascending order, or
/// `None` once the period lies past the supported calendar.
fn period_dates(
    frequency: RecurrenceFrequency,
    start: NaiveDate,
    period: i64,
    interval: i64,
    byday: &[Weekday],
) -> Option<Vec<NaiveDate>> {
    let step = period.checked_mul(interval)?;
    match frequency {
        RecurrenceFrequency::Daily => Some(vec![add_days(start, step)?]),
        RecurrenceFrequency::Weekly => {
            let monday = start.checked_sub_days(Days::new(u64::from(
                start.weekday().num_days_from_monday(),
            )))?;
            let week_start = add_days(monday, step.checked_mul(7)?)?;
            byday
                .iter()
                .map(|day| add_days(week_start, i64::from(day.num_days_from_monday())))
                .collect()
        }
        RecurrenceFrequency::Monthly => Some(add_months(start, step)?.into_iter().collect()),
        RecurrenceFrequency::Yearly => {
            Some(add_months(start, step.checked_mul(12)?)?.into_iter().collect())
        }
    }
}

/// Occurrences of `event` that overlap `[range_start, range_end]`.
pub fn expand(
    event: &IcsEvent,
    range_start: NaiveDateTime,
    range_end: NaiveDateTime,
) -> Vec<EventInterval> {
    let single = EventInterval::new(event.start, event.end);
    let Some(rrule) = event.recurrence_rule.as_deref() else {
        return if single.overlaps(range_start, range_end) {
            vec![single]
        } else {
            Vec::new()
        };
    };

    let Some(frequency) = detect_frequency(rrule) else {
        log::debug!("Unsupported RRULE '{}', using first occurrence only", rrule);
        return if single.overlaps(range_start, range_end) {
            vec![single]
        } else {
            Vec::new()
        };
    };

    let duration = event.end - event.start;
    let interval = parse_interval(rrule);
    let max_count = parse_count(rrule);
    let until = parse_until(rrule);
    let start_date = event.start.date();
    let start_time = event.start.time();
    let byday = parse_weekly_byday(rrule, start_date.weekday());

    let mut occurrences = Vec::new();
    let mut emitted = 0usize;

    'periods: for period in 0..MAX_PERIODS {
        let Some(dates) = period_dates(frequency, start_date, period, interval, &byday) else {
            log::debug!("RRULE '{}' left the supported date range", rrule);
            break;
        };
        for date in dates {
            if date < start_date {
                continue;
            }
            if until.is_some_and(|until| date > until) {
                break 'periods;
            }
            if max_count.is_some_and(|max| emitted >= max) {
                break 'periods;
            }
            emitted += 1;

            let occurrence_start = date.and_time(start_time);
            if occurrence_start > range_end {
                break 'periods;
            }
            if event.exception_dates.contains(&date) {
                continue;
            }

            let Some(occurrence_end) = occurrence_start.checked_add_signed(duration) else {
                break 'periods;
            };
            let occurrence = EventInterval::new(occurrence_start, occurrence_end);
            if occurrence.overlaps(range_start, range_end) {
                occurrences.push(occurrence);
            }
        }
    }

    occurrences
}
