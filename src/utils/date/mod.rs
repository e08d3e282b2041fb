// Date utility functions
// All calendar arithmetic works on local naive dates.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Source of "now" for every date-dependent computation.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Reads the local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant. Used by tests and the `--now` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Noon on the given date.
    pub fn on(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN)))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN))
}

/// Days in `month` (1-12) of `year`; 0 for an out-of-range month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.map(|next| (next - first).num_days() as u32).unwrap_or(31)
}

/// Blank cells before day 1 in a week row starting on `first_day_of_week`
/// (0 = Sunday, 1 = Monday).
pub fn leading_blank_days(year: i32, month: u32, first_day_of_week: u8) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };
    let weekday = first.weekday().num_days_from_sunday();
    (weekday + 7 - u32::from(first_day_of_week % 7)) % 7
}

/// Number of week rows a month occupies in the dot grid.
pub fn week_rows(year: i32, month: u32, first_day_of_week: u8) -> u32 {
    (days_in_month(year, month) + leading_blank_days(year, month, first_day_of_week)).div_ceil(7)
}

pub fn first_of_year(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN)
}

pub fn last_of_year(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Month index counted from year 0, January = 0.
pub fn month_count(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(2024, 2, 29; "leap february")]
    #[test_case(2023, 2, 28; "common february")]
    #[test_case(2100, 2, 28; "century non leap")]
    #[test_case(2000, 2, 29; "quad century leap")]
    #[test_case(2024, 12, 31; "december")]
    #[test_case(2024, 4, 30; "april")]
    fn test_days_in_month(year: i32, month: u32, expected: u32) {
        assert_eq!(days_in_month(year, month), expected);
    }

    #[test]
    fn test_days_in_invalid_month() {
        assert_eq!(days_in_month(2024, 13), 0);
    }

    #[test]
    fn test_leading_blank_days() {
        // 2024-09-01 is a Sunday
        assert_eq!(leading_blank_days(2024, 9, 0), 0);
        assert_eq!(leading_blank_days(2024, 9, 1), 6);
        // 2024-04-01 is a Monday
        assert_eq!(leading_blank_days(2024, 4, 0), 1);
        assert_eq!(leading_blank_days(2024, 4, 1), 0);
    }

    #[test]
    fn test_week_rows() {
        // September 2024 starting Monday spans six rows
        assert_eq!(week_rows(2024, 9, 1), 6);
        // February 2015 starts on a Sunday and fills exactly four rows
        assert_eq!(week_rows(2015, 2, 0), 4);
    }

    #[test]
    fn test_day_bounds() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(start_of_day(date).to_string(), "2024-03-15 00:00:00");
        assert_eq!(end_of_day(date).to_string(), "2024-03-15 23:59:59");
    }

    #[test]
    fn test_fixed_clock() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let clock = FixedClock::on(date);
        assert_eq!(clock.today(), date);
    }
}
