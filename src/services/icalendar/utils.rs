use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

use super::IcsError;

pub(super) fn unescape_text(text: &str) -> String {
    text.replace("\\n", "\n")
        .replace("\\N", "\n")
        .replace("\\,", ",")
        .replace("\\;", ";")
        .replace("\\\\", "\\")
}

/// Join RFC 5545 folded lines (continuations start with a space or tab).
pub(super) fn unfold_lines(content: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in content.lines() {
        let raw = raw.trim_end_matches('\r');
        if let Some(continuation) = raw.strip_prefix(' ').or_else(|| raw.strip_prefix('\t')) {
            if let Some(last) = lines.last_mut() {
                last.push_str(continuation);
                continue;
            }
        }
        lines.push(raw.to_string());
    }
    lines
}

/// Value of a `;KEY=value` parameter in a property's key part.
pub(super) fn param<'a>(key_part: &'a str, name: &str) -> Option<&'a str> {
    key_part.split(';').skip(1).find_map(|segment| {
        let (key, value) = segment.split_once('=')?;
        key.eq_ignore_ascii_case(name)
            .then(|| value.trim_matches('"'))
    })
}

pub(super) fn parse_date(s: &str) -> Result<NaiveDate, IcsError> {
    let s = s.trim();
    if s.len() < 8 || !s.is_ascii() {
        return Err(IcsError::InvalidDate(s.to_string()));
    }

    let year: i32 = s[0..4].parse().map_err(|_| IcsError::InvalidDate(s.to_string()))?;
    let month: u32 = s[4..6].parse().map_err(|_| IcsError::InvalidDate(s.to_string()))?;
    let day: u32 = s[6..8].parse().map_err(|_| IcsError::InvalidDate(s.to_string()))?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| IcsError::InvalidDate(s.to_string()))
}

/// Parse `YYYYMMDDTHHMMSS[Z]` into local naive time.
///
/// UTC values and values with a known `TZID` are converted to the local zone;
/// anything else is taken as already local.
pub(super) fn parse_datetime(s: &str, tzid: Option<&str>) -> Result<NaiveDateTime, IcsError> {
    let s = s.trim();
    let has_utc_suffix = s.ends_with('Z');
    let normalized = s.trim_end_matches('Z');

    if normalized.len() < 15 || !normalized.is_ascii() || &normalized[8..9] != "T" {
        return Err(IcsError::InvalidDateTime(s.to_string()));
    }

    let date = parse_date(&normalized[0..8])?;
    let field = |range: std::ops::Range<usize>| -> Result<u32, IcsError> {
        normalized[range]
            .parse()
            .map_err(|_| IcsError::InvalidDateTime(s.to_string()))
    };
    let time = NaiveTime::from_hms_opt(field(9..11)?, field(11..13)?, field(13..15)?)
        .ok_or_else(|| IcsError::InvalidDateTime(s.to_string()))?;
    let naive = NaiveDateTime::new(date, time);

    if has_utc_suffix {
        return Ok(Utc.from_utc_datetime(&naive).with_timezone(&Local).naive_local());
    }

    if let Some(tz_name) = tzid {
        match Tz::from_str(tz_name) {
            Ok(timezone) => {
                if let Some(dt) = timezone.from_local_datetime(&naive).earliest() {
                    return Ok(dt.with_timezone(&Local).naive_local());
                }
            }
            Err(_) => log::debug!("Unknown TZID '{}', treating {} as local", tz_name, s),
        }
    }

    Ok(naive)
}

/// A `DTSTART`/`DTEND`/`EXDATE` value, honouring `VALUE=DATE` and `TZID`.
pub(super) enum IcsTime {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl IcsTime {
    pub(super) fn parse(key_part: &str, value: &str) -> Result<Self, IcsError> {
        let is_date = param(key_part, "VALUE").is_some_and(|v| v.eq_ignore_ascii_case("DATE"))
            || (value.trim().len() == 8);
        if is_date {
            parse_date(value).map(IcsTime::Date)
        } else {
            parse_datetime(value, param(key_part, "TZID")).map(IcsTime::DateTime)
        }
    }

    pub(super) fn date(&self) -> NaiveDate {
        match self {
            IcsTime::Date(date) => *date,
            IcsTime::DateTime(dt) => dt.date(),
        }
    }
}
