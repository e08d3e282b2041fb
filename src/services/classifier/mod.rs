//! Per-day status resolution.
//!
//! A day's status comes from an ordered list of rules; the first rule that
//! returns a status wins. The default chain is: today, manual significant
//! dates, calendar events, weekends, and finally the past/future baseline.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::models::color::Appearance;
use crate::models::config::{Palette, WallpaperConfig};
use crate::models::day_status::DayStatus;
use crate::services::event_index::EventIndex;

/// The day being classified, relative to "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayContext {
    pub date: NaiveDate,
    pub today: NaiveDate,
}

impl DayContext {
    pub fn new(date: NaiveDate, today: NaiveDate) -> Self {
        Self { date, today }
    }

    pub fn is_today(&self) -> bool {
        self.date == self.today
    }

    pub fn is_past(&self) -> bool {
        self.date < self.today
    }

    /// Zero-padded `MM-DD` key used by the significant-date set.
    pub fn month_day_key(&self) -> String {
        format!("{:02}-{:02}", self.date.month(), self.date.day())
    }
}

pub trait DayRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn classify(&self, day: &DayContext) -> Option<DayStatus>;
}

pub struct TodayRule;

impl DayRule for TodayRule {
    fn name(&self) -> &'static str {
        "today"
    }

    fn classify(&self, day: &DayContext) -> Option<DayStatus> {
        day.is_today().then_some(DayStatus::Today)
    }
}

pub struct SignificantDateRule<'a> {
    dates: &'a BTreeSet<String>,
}

impl<'a> SignificantDateRule<'a> {
    pub fn new(dates: &'a BTreeSet<String>) -> Self {
        Self { dates }
    }
}

impl DayRule for SignificantDateRule<'_> {
    fn name(&self) -> &'static str {
        "significant"
    }

    fn classify(&self, day: &DayContext) -> Option<DayStatus> {
        if self.dates.is_empty() {
            return None;
        }
        self.dates
            .contains(&day.month_day_key())
            .then(|| DayStatus::Significant {
                past: day.is_past(),
            })
    }
}

pub struct EventOverlapRule<'a> {
    index: &'a EventIndex,
}

impl<'a> EventOverlapRule<'a> {
    pub fn new(index: &'a EventIndex) -> Self {
        Self { index }
    }
}

impl DayRule for EventOverlapRule<'_> {
    fn name(&self) -> &'static str {
        "events"
    }

    fn classify(&self, day: &DayContext) -> Option<DayStatus> {
        self.index
            .first_calendar_on(day.date)
            .map(|calendar| DayStatus::EventOverlap {
                color: calendar.color,
                past: day.is_past(),
            })
    }
}

pub struct WeekendRule;

impl DayRule for WeekendRule {
    fn name(&self) -> &'static str {
        "weekend"
    }

    fn classify(&self, day: &DayContext) -> Option<DayStatus> {
        matches!(day.date.weekday(), Weekday::Sat | Weekday::Sun).then(|| DayStatus::Weekend {
            past: day.is_past(),
        })
    }
}

/// Always matches; keep it last.
pub struct BaselineRule;

impl DayRule for BaselineRule {
    fn name(&self) -> &'static str {
        "baseline"
    }

    fn classify(&self, day: &DayContext) -> Option<DayStatus> {
        Some(if day.is_past() {
            DayStatus::PastNoEvent
        } else {
            DayStatus::FutureNoEvent
        })
    }
}

pub struct DayClassifier<'a> {
    rules: Vec<Box<dyn DayRule + 'a>>,
    palette: &'a Palette,
    dim_past: bool,
    today: NaiveDate,
}

impl<'a> DayClassifier<'a> {
    /// Standard rule chain for `config`.
    pub fn new(config: &'a WallpaperConfig, index: &'a EventIndex, today: NaiveDate) -> Self {
        let mut rules: Vec<Box<dyn DayRule + 'a>> = vec![
            Box::new(TodayRule),
            Box::new(SignificantDateRule::new(&config.manual_significant_dates)),
            Box::new(EventOverlapRule::new(index)),
        ];
        if config.highlight_weekends {
            rules.push(Box::new(WeekendRule));
        }
        rules.push(Box::new(BaselineRule));

        Self::with_rules(rules, &config.colors, config.dim_past_days, today)
    }

    pub fn with_rules(
        rules: Vec<Box<dyn DayRule + 'a>>,
        palette: &'a Palette,
        dim_past: bool,
        today: NaiveDate,
    ) -> Self {
        Self {
            rules,
            palette,
            dim_past,
            today,
        }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn classify(&self, date: NaiveDate) -> DayStatus {
        let day = DayContext::new(date, self.today);
        self.rules
            .iter()
            .find_map(|rule| rule.classify(&day))
            .unwrap_or_else(|| {
                BaselineRule
                    .classify(&day)
                    .unwrap_or(DayStatus::FutureNoEvent)
            })
    }

    pub fn appearance(&self, date: NaiveDate) -> Appearance {
        self.classify(date).appearance(self.palette, self.dim_past)
    }
}
