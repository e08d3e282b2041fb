// Test fixtures - reusable test data
// Provides calendar files and fixed clocks shared by the integration tests

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use yearglance::utils::date::FixedClock;

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Friday, March 15 2024
    pub fn mid_march_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    /// Boxing Day 2024, the day after a significant date
    pub fn boxing_day_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 26).unwrap()
    }

    pub fn clock_on(date: NaiveDate) -> FixedClock {
        FixedClock::on(date)
    }
}

/// Builders for .ics calendar files
pub mod ics {
    use super::*;

    /// A calendar file with a name, a colour and all-day events on `days` (YYYYMMDD).
    pub fn calendar(name: &str, color: &str, days: &[&str]) -> String {
        let mut content = format!(
            "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nX-WR-CALNAME:{}\r\nX-APPLE-CALENDAR-COLOR:{}\r\n",
            name, color
        );
        for day in days {
            content.push_str(&format!(
                "BEGIN:VEVENT\r\nSUMMARY:Event\r\nDTSTART;VALUE=DATE:{}\r\nEND:VEVENT\r\n",
                day
            ));
        }
        content.push_str("END:VCALENDAR\r\n");
        content
    }

    pub fn write(dir: &Path, file_name: &str, content: &str) {
        fs::write(dir.join(file_name), content).expect("Failed to write calendar fixture");
    }
}
