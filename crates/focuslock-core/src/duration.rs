//! Duration extraction from free text

use regex::Regex;
use std::sync::LazyLock;

/// A number followed by a minute or hour unit, e.g. `15分钟`, `1.5h`, `30 min`.
/// ASCII digits only: full-width digits are skipped, not parsed.
static NUMERIC_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+(?:\.[0-9]+)?)\s*(分钟|分|小时|h|hr|min|m)").expect("hardcoded regex")
});

static HOUR_UNIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)小时|h|hr").expect("hardcoded regex"));

/// A run of Chinese numerals followed by a minute or hour unit, e.g. `十分钟`, `半小时`
static CHINESE_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([零一二两三四五六七八九十半]+)\s*(分钟|分|小时)").expect("hardcoded regex")
});

/// Extract a requested duration in minutes.
///
/// The numeric form wins over the Chinese-numeral form. Numeric durations are
/// rounded to whole minutes; Chinese numerals are summed digit by digit, so
/// `半` on its own with a minute unit yields half a minute.
pub fn parse_duration(text: &str) -> Option<f64> {
    parse_numeric(text).or_else(|| parse_chinese(text))
}

fn parse_numeric(text: &str) -> Option<f64> {
    let caps = NUMERIC_DURATION.captures(text)?;
    let value: f64 = caps[1].parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    if HOUR_UNIT.is_match(&caps[2]) {
        Some((value * 60.0).round())
    } else {
        Some(value.round())
    }
}

fn parse_chinese(text: &str) -> Option<f64> {
    let caps = CHINESE_DURATION.captures(text)?;
    let numerals = &caps[1];
    let hours = &caps[2] == "小时";

    if numerals == "半" {
        return Some(if hours { 30.0 } else { 0.5 });
    }

    let total: f64 = numerals.chars().filter_map(numeral_value).sum();
    Some(if hours { total * 60.0 } else { total })
}

fn numeral_value(c: char) -> Option<f64> {
    let value = match c {
        '零' => 0.0,
        '一' => 1.0,
        '二' | '两' => 2.0,
        '三' => 3.0,
        '四' => 4.0,
        '五' => 5.0,
        '六' => 6.0,
        '七' => 7.0,
        '八' => 8.0,
        '九' => 9.0,
        '十' => 10.0,
        '半' => 0.5,
        _ => return None,
    };
    Some(value)
}
