//! Date and time labels.
//!
//! The backend returns ISO dates, times and timestamps as text. Anything that
//! does not parse is shown as it came.

use jiff::Timestamp;
use jiff::civil::{Date, DateTime, Time};
use jiff::tz::TimeZone;

use super::EMPTY;

const MONTHS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
];

fn blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date_time(raw: &str) -> Option<DateTime> {
    if let Ok(dt) = raw.parse::<DateTime>() {
        return Some(dt);
    }
    raw.parse::<Timestamp>()
        .ok()
        .map(|ts| ts.to_zoned(TimeZone::UTC).datetime())
}

fn parse_date(raw: &str) -> Option<Date> {
    raw.parse::<Date>()
        .ok()
        .or_else(|| parse_date_time(raw).map(|dt| dt.date()))
}

/// `2024-10-12` (or a timestamp on that day) as `12 oct`.
pub fn format_short_date(raw: Option<&str>) -> String {
    let Some(raw) = blank(raw) else {
        return EMPTY.to_string();
    };
    match parse_date(raw) {
        Some(date) => format!("{} {}", date.day(), MONTHS[(date.month() - 1) as usize]),
        None => raw.to_string(),
    }
}

/// `15:00:00` as `15:00`.
pub fn format_time(raw: Option<&str>) -> String {
    let Some(raw) = blank(raw) else {
        return EMPTY.to_string();
    };
    match raw.parse::<Time>() {
        Ok(time) => time.strftime("%H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// A timestamp as `2024-10-12 08:30`.
pub fn format_date_time(raw: Option<&str>) -> String {
    let Some(raw) = blank(raw) else {
        return EMPTY.to_string();
    };
    match parse_date_time(raw) {
        Some(dt) => dt.strftime("%Y-%m-%d %H:%M").to_string(),
        None => raw.to_string(),
    }
}

/// Seconds from `raw` to `now`. Timestamps without an offset are read as UTC.
fn elapsed_seconds(raw: &str, now: Timestamp) -> Option<i64> {
    let start = match raw.parse::<Timestamp>() {
        Ok(ts) => ts,
        Err(_) => raw.parse::<DateTime>().ok()?.to_zoned(TimeZone::UTC).ok()?.timestamp(),
    };
    Some(now.as_second() - start.as_second())
}

/// Time since an order was placed as `mm:ss min`. Future timestamps count as zero.
pub fn format_elapsed(raw: Option<&str>, now: Timestamp) -> String {
    let Some(secs) = blank(raw).and_then(|raw| elapsed_seconds(raw, now)) else {
        return EMPTY.to_string();
    };
    let secs = secs.max(0);
    format!("{:02}:{:02} min", secs / 60, secs % 60)
}
