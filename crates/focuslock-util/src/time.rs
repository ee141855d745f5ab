//! Time utilities for focuslock
//!
//! Wall-clock access for allowance expiry plus the display formats the
//! terminal driver renders (context dates, clocks, countdowns).
//!
//! Debug builds read `FOCUSLOCK_MOCK_TIME` (`2025-12-25 14:30:00`) as the
//! clock's starting point; the mocked clock then runs at normal speed.

use chrono::{DateTime, Datelike, Local, NaiveDateTime, TimeZone, Weekday};
use std::sync::OnceLock;
use std::time::Duration;

/// Ignored in release builds
pub const MOCK_TIME_ENV_VAR: &str = "FOCUSLOCK_MOCK_TIME";

/// Countdown text once the allowance has run out
pub const COUNTDOWN_ELAPSED: &str = "已到时";

const MOCK_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Mock start time minus real time, resolved once per process
static MOCK_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

/// Parse a mock start time in `MOCK_TIME_FORMAT`, local timezone
#[cfg_attr(not(debug_assertions), allow(dead_code))]
fn parse_mock_time(text: &str) -> Option<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(text.trim(), MOCK_TIME_FORMAT).ok()?;
    Local.from_local_datetime(&naive).single()
}

#[cfg(debug_assertions)]
fn resolve_mock_offset() -> Option<chrono::Duration> {
    let raw = std::env::var(MOCK_TIME_ENV_VAR).ok()?;

    let Some(start) = parse_mock_time(&raw) else {
        tracing::warn!(
            value = %raw,
            format = MOCK_TIME_FORMAT,
            "Ignoring unparseable mock time"
        );
        return None;
    };

    let offset = start.signed_duration_since(Local::now());
    tracing::info!(start = %start, offset_secs = offset.num_seconds(), "Using mock time");
    Some(offset)
}

#[cfg(not(debug_assertions))]
fn resolve_mock_offset() -> Option<chrono::Duration> {
    None
}

pub fn is_mock_time_active() -> bool {
    MOCK_OFFSET.get_or_init(resolve_mock_offset).is_some()
}

/// Current local time, shifted by the mock offset when one is set
pub fn now() -> DateTime<Local> {
    match *MOCK_OFFSET.get_or_init(resolve_mock_offset) {
        Some(offset) => Local::now() + offset,
        None => Local::now(),
    }
}

fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "周日",
        Weekday::Mon => "周一",
        Weekday::Tue => "周二",
        Weekday::Wed => "周三",
        Weekday::Thu => "周四",
        Weekday::Fri => "周五",
        Weekday::Sat => "周六",
    }
}

/// Format a DateTime as the context time text, e.g. `2024年05月01日（周三）14:05`.
pub fn format_context_time(dt: &DateTime<Local>) -> String {
    format!(
        "{}（{}）{}",
        dt.format("%Y年%m月%d日"),
        weekday_label(dt.weekday()),
        dt.format("%H:%M")
    )
}

/// Format a DateTime for the status clock (`HH:MM:SS`).
pub fn format_clock_time(dt: &DateTime<Local>) -> String {
    dt.format("%H:%M:%S").to_string()
}

/// Format a message timestamp (`HH:MM`).
pub fn format_message_time(dt: &DateTime<Local>) -> String {
    dt.format("%H:%M").to_string()
}

/// Format remaining allowance time as `mm:ss`, or [`COUNTDOWN_ELAPSED`] once zero.
pub fn format_countdown(remaining: Duration) -> String {
    if remaining.is_zero() {
        return COUNTDOWN_ELAPSED.to_string();
    }

    let total_secs = remaining.as_secs();
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_context_time() {
        // 2024-05-01 was a Wednesday
        let dt = Local.with_ymd_and_hms(2024, 5, 1, 14, 5, 0).unwrap();
        assert_eq!(format_context_time(&dt), "2024年05月01日（周三）14:05");
    }

    #[test]
    fn test_format_context_time_sunday() {
        let dt = Local.with_ymd_and_hms(2025, 12, 28, 9, 0, 0).unwrap();
        assert_eq!(format_context_time(&dt), "2025年12月28日（周日）09:00");
    }

    #[test]
    fn test_format_clock_time() {
        let dt = Local.with_ymd_and_hms(2025, 12, 25, 14, 30, 45).unwrap();
        assert_eq!(format_clock_time(&dt), "14:30:45");
        assert_eq!(format_message_time(&dt), "14:30");
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(Duration::from_secs(90)), "01:30");
        assert_eq!(format_countdown(Duration::from_secs(59)), "00:59");
        assert_eq!(format_countdown(Duration::from_secs(125 * 60)), "125:00");
        assert_eq!(format_countdown(Duration::ZERO), COUNTDOWN_ELAPSED);
    }

    #[test]
    fn test_parse_mock_time() {
        let parsed = parse_mock_time(" 2025-12-25 14:30:00 ").unwrap();
        assert_eq!(format_clock_time(&parsed), "14:30:00");
        assert_eq!(parsed.weekday(), Weekday::Thu);

        assert!(parse_mock_time("2025-12-25").is_none());
        assert!(parse_mock_time("tomorrow").is_none());
    }

    #[test]
    fn test_now_is_plausible() {
        let year = now().year();
        assert!((2020..=2100).contains(&year));
    }
}
