//! Calendar selection and the read-only event index.
//!
//! The index is built once per run from an [`EventProvider`]. Provider failures
//! never abort the run: a failed listing yields an empty index, and a calendar
//! whose events cannot be fetched is skipped.

use std::cmp::Ordering;

use anyhow::Result;
use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::models::calendar_source::{CalendarInfo, CalendarSource, EventInterval};
use crate::models::config::WallpaperConfig;
use crate::services::month_index::MonthIndexResolver;
use crate::utils::date::{end_of_day, first_of_year, last_of_year, start_of_day};

/// External source of calendars and their events.
#[allow(async_fn_in_trait)]
pub trait EventProvider {
    async fn list_calendars(&self) -> Result<Vec<CalendarInfo>>;

    async fn events_between(
        &self,
        calendar: &CalendarInfo,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<EventInterval>>;
}

/// Provider with no calendars at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCalendars;

impl EventProvider for NoCalendars {
    async fn list_calendars(&self) -> Result<Vec<CalendarInfo>> {
        Ok(Vec::new())
    }

    async fn events_between(
        &self,
        _calendar: &CalendarInfo,
        _start: NaiveDateTime,
        _end: NaiveDateTime,
    ) -> Result<Vec<EventInterval>> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventIndex {
    calendars: Vec<CalendarSource>,
}

impl EventIndex {
    /// Index over `calendars`, kept in the given priority order.
    pub fn new(calendars: Vec<CalendarSource>) -> Self {
        Self { calendars }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn calendars(&self) -> &[CalendarSource] {
        &self.calendars
    }

    pub fn is_empty(&self) -> bool {
        self.calendars.is_empty()
    }

    /// First calendar, in priority order, with an event overlapping `date`.
    pub fn first_calendar_on(&self, date: NaiveDate) -> Option<&CalendarSource> {
        self.calendars
            .iter()
            .find(|calendar| calendar.first_event_on(date).is_some())
    }

    /// Events overlapping `date` across every calendar.
    pub fn count_events_on(&self, date: NaiveDate) -> usize {
        self.calendars
            .iter()
            .map(|calendar| calendar.count_events_on(date))
            .sum()
    }

    /// Fetch the selected calendars from `provider`.
    pub async fn build<P: EventProvider>(
        provider: &P,
        config: &WallpaperConfig,
        today: NaiveDate,
    ) -> Self {
        let all = match provider.list_calendars().await {
            Ok(calendars) => calendars,
            Err(err) => {
                log::error!("Failed to list calendars, continuing without events: {:#}", err);
                return Self::empty();
            }
        };

        let available = all.len();
        let selected = select_calendars(all, config);
        if selected.is_empty() {
            if available > 0 {
                log::warn!(
                    "None of {} calendars matched the configured selection (prefix '{}', names {:?})",
                    available,
                    config.calendar_prefix,
                    config.specific_calendar_names
                );
            }
            return Self::empty();
        }

        let (start, end) = fetch_window(config, today);
        log::info!(
            "Fetching events for {} calendars between {} and {}",
            selected.len(),
            start,
            end
        );

        let mut calendars = Vec::with_capacity(selected.len());
        for info in selected {
            match provider.events_between(&info, start, end).await {
                Ok(events) => {
                    log::debug!("Calendar '{}': {} events", info.title, events.len());
                    calendars.push(CalendarSource {
                        name: info.title,
                        color: info.color,
                        events,
                    });
                }
                Err(err) => {
                    log::warn!("Skipping calendar '{}': {:#}", info.title, err);
                }
            }
        }

        Self::new(calendars)
    }
}

/// Apply the configured filter and priority order.
///
/// An explicit name list wins: calendars are kept in list order. Otherwise
/// titles must start with the prefix and are sorted by name when requested,
/// or left in provider order.
pub fn select_calendars(all: Vec<CalendarInfo>, config: &WallpaperConfig) -> Vec<CalendarInfo> {
    let names = &config.specific_calendar_names;
    if !names.is_empty() {
        let mut selected: Vec<(usize, CalendarInfo)> = all
            .into_iter()
            .filter_map(|calendar| {
                names
                    .iter()
                    .position(|name| *name == calendar.title)
                    .map(|position| (position, calendar))
            })
            .collect();
        selected.sort_by_key(|(position, _)| *position);
        return selected.into_iter().map(|(_, calendar)| calendar).collect();
    }

    let mut selected: Vec<CalendarInfo> = all
        .into_iter()
        .filter(|calendar| calendar.title.starts_with(&config.calendar_prefix))
        .collect();
    if config.sort_by_name {
        selected.sort_by(|a, b| compare_titles(&a.title, &b.title));
    }
    selected
}

fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Time range to request from the provider.
///
/// Starts on Jan 1 of the current year and ends on Dec 31 of the year
/// `ceil(monthsToShow / 12)` years later, widened to include every visible
/// month when the window reaches outside that range.
pub fn fetch_window(config: &WallpaperConfig, today: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let year = today.year();
    let future_years = config.months_to_show.div_ceil(12) as i32;

    let mut start = first_of_year(year);
    let mut end = last_of_year(year + future_years);

    if let Some((first_visible, last_visible)) =
        MonthIndexResolver::new(config, today).visible_range()
    {
        start = start.min(first_visible);
        end = end.max(last_visible);
    }

    (start_of_day(start), end_of_day(end))
}
