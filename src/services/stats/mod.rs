//! Summary line shown below the calendar.

use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;

use crate::models::config::StatsMode;
use crate::services::event_index::EventIndex;
use crate::utils::date::{first_of_year, start_of_day};

const SECONDS_PER_DAY: i64 = 86_400;

/// How far through the current year `now` is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearProgress {
    pub total_days: i64,
    /// Started days, so any time after midnight counts the day as passed.
    pub days_passed: i64,
    pub days_left: i64,
    pub percent: i64,
}

impl YearProgress {
    pub fn at(now: NaiveDateTime) -> Self {
        let year = now.year();
        let start = start_of_day(first_of_year(year));
        let next = start_of_day(first_of_year(year + 1));

        let total_days = (next - start).num_days();
        let elapsed = (now - start).num_seconds().abs();
        let days_passed = (elapsed + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY;
        let days_left = total_days - days_passed;
        let percent = if total_days > 0 {
            days_passed * 100 / total_days
        } else {
            0
        };

        Self {
            total_days,
            days_passed,
            days_left,
            percent,
        }
    }

    pub fn label(&self) -> String {
        format!("{} days left  •  {}%", self.days_left, self.percent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum Stats {
    Events { count: usize },
    Progress(YearProgress),
}

impl Stats {
    pub fn label(&self) -> String {
        match self {
            Stats::Events { count: 1 } => "1 event today".to_string(),
            Stats::Events { count } => format!("{} events today", count),
            Stats::Progress(progress) => progress.label(),
        }
    }
}

pub struct StatsComputer<'a> {
    index: &'a EventIndex,
}

impl<'a> StatsComputer<'a> {
    pub fn new(index: &'a EventIndex) -> Self {
        Self { index }
    }

    pub fn compute(&self, mode: StatsMode, now: NaiveDateTime) -> Stats {
        match mode {
            StatsMode::Events => Stats::Events {
                count: self.index.count_events_on(now.date()),
            },
            StatsMode::Progress => Stats::Progress(YearProgress::at(now)),
        }
    }
}
