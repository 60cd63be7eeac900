//! Duration strings used by `span` tags and `Duration` parameters.
//!
//! The encoding is `[+-]?(DDDT)?HH:MM:SS(.mmm)?`, e.g. `22:13:57.634` or
//! `001T02:00:00`.

use std::fmt::Write as _;
use std::sync::OnceLock;

use regex::Regex;
use time::Duration;

const MS_PER_SECOND: u128 = 1_000;
const MS_PER_MINUTE: u128 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u128 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u128 = 24 * MS_PER_HOUR;

fn duration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([+-]?)(?:(\d{1,6})T)?(\d{2}):(\d{2}):(\d{2})(?:\.(\d{3}))?$")
            .expect("duration pattern is a valid regex")
    })
}

/// Parse a duration string. Returns `None` when the text does not match
/// the encoding or minutes/seconds are out of range.
pub fn parse_duration(input: &str) -> Option<Duration> {
    let caps = duration_pattern().captures(input.trim())?;

    let number = |idx: usize| -> Option<i64> {
        caps.get(idx)
            .map(|m| m.as_str().parse::<i64>().ok())
            .unwrap_or(Some(0))
    };

    let days = number(2)?;
    let hours = number(3)?;
    let minutes = number(4)?;
    let seconds = number(5)?;
    let millis = number(6)?;

    if minutes > 59 || seconds > 59 {
        return None;
    }

    let total = Duration::days(days)
        + Duration::hours(hours)
        + Duration::minutes(minutes)
        + Duration::seconds(seconds)
        + Duration::milliseconds(millis);

    if &caps[1] == "-" {
        Some(-total)
    } else {
        Some(total)
    }
}

/// Render a duration as `HH:MM:SS[.mmm]`, with a `DDDT` prefix once it
/// reaches a full day. Sub-millisecond precision is truncated.
pub fn format_duration(duration: Duration, millis: bool) -> String {
    let total_ms = duration.whole_milliseconds().unsigned_abs();
    let days = total_ms / MS_PER_DAY;
    let hours = (total_ms % MS_PER_DAY) / MS_PER_HOUR;
    let minutes = (total_ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (total_ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let ms = total_ms % MS_PER_SECOND;

    let mut out = String::new();
    if duration.is_negative() {
        out.push('-');
    }
    if days > 0 {
        let _ = write!(out, "{:03}T", days);
    }
    let _ = write!(out, "{:02}:{:02}:{:02}", hours, minutes, seconds);
    if millis {
        let _ = write!(out, ".{:03}", ms);
    }
    out
}

/// Compact days/hours/minutes/seconds form, e.g. `22h13m57s634ms`.
pub fn dhms(duration: Duration) -> String {
    if duration.is_zero() {
        return "0m".to_string();
    }

    let total_ms = duration.whole_milliseconds().unsigned_abs();
    let parts = [
        (total_ms / MS_PER_DAY, "d"),
        ((total_ms % MS_PER_DAY) / MS_PER_HOUR, "h"),
        ((total_ms % MS_PER_HOUR) / MS_PER_MINUTE, "m"),
        ((total_ms % MS_PER_MINUTE) / MS_PER_SECOND, "s"),
    ];

    let mut out = String::new();
    if duration.is_negative() {
        out.push('-');
    }
    for (value, unit) in parts {
        if value != 0 {
            let _ = write!(out, "{}{}", value, unit);
        }
    }
    let _ = write!(out, "{}ms", total_ms % MS_PER_SECOND);
    out
}
