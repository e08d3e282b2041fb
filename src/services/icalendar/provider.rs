use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use walkdir::WalkDir;

use super::{import, recurrence, IcsError};
use crate::models::calendar_source::{CalendarInfo, EventInterval};
use crate::models::color::RgbaColor;
use crate::services::event_index::EventProvider;

/// Colour for calendars that do not declare `X-APPLE-CALENDAR-COLOR`.
pub const DEFAULT_CALENDAR_COLOR: RgbaColor = RgbaColor::rgb(0x0A, 0x84, 0xFF);

/// Treats every `.ics` file below a directory as one calendar.
///
/// The calendar title is `X-WR-CALNAME`, or the file stem when absent. Files
/// are listed in path order; the file path doubles as the calendar id.
#[derive(Debug, Clone)]
pub struct IcsDirectoryProvider {
    root: PathBuf,
}

impl IcsDirectoryProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn read_calendar(path: &Path) -> Result<import::IcsCalendar> {
    let content = fs::read_to_string(path).map_err(|source| IcsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Parsing {}", path.display());
    Ok(import::from_str(&content))
}

fn scan_directory(root: &Path) -> Result<Vec<CalendarInfo>> {
    if !root.is_dir() {
        return Err(anyhow!("calendar directory {} does not exist", root.display()));
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("Skipping unreadable entry under {}: {}", root.display(), err);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("ics"))
        })
        .collect();
    paths.sort();

    let mut calendars = Vec::with_capacity(paths.len());
    for path in paths {
        let calendar = match read_calendar(&path) {
            Ok(calendar) => calendar,
            Err(err) => {
                log::warn!("Ignoring calendar file: {:#}", err);
                continue;
            }
        };

        let title = calendar.title.unwrap_or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        calendars.push(CalendarInfo {
            id: path.to_string_lossy().into_owned(),
            title,
            color: calendar.color.unwrap_or(DEFAULT_CALENDAR_COLOR),
        });
    }

    log::debug!("Found {} calendars under {}", calendars.len(), root.display());
    Ok(calendars)
}

fn load_events(
    path: &Path,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Vec<EventInterval>> {
    let calendar = read_calendar(path)?;
    let mut events: Vec<EventInterval> = calendar
        .events
        .iter()
        .flat_map(|event| recurrence::expand(event, start, end))
        .collect();
    events.sort_by_key(|event| (event.start, event.end));
    Ok(events)
}

impl EventProvider for IcsDirectoryProvider {
    async fn list_calendars(&self) -> Result<Vec<CalendarInfo>> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || scan_directory(&root)).await?
    }

    async fn events_between(
        &self,
        calendar: &CalendarInfo,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<EventInterval>> {
        let path = PathBuf::from(&calendar.id);
        tokio::task::spawn_blocking(move || load_events(&path, start, end)).await?
    }
}
