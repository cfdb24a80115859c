//! Text formatting helpers for chat reports.

use chrono::{DateTime, FixedOffset, Utc};

/// Repository size as shown in reports.
///
/// GitHub reports `size` in kilobytes, so a single division by 1024 yields MB.
pub fn format_size_mb(size_kb: u64) -> String {
    format!("{:.2} MB", size_kb as f64 / 1024.0)
}

/// `DD/MM/YY - HH:mm:ss` in the given offset.
pub fn format_timestamp(ts: DateTime<Utc>, offset: FixedOffset) -> String {
    ts.with_timezone(&offset)
        .format("%d/%m/%y - %H:%M:%S")
        .to_string()
}

/// Human relative age such as "5 minutes ago" or "in 2 days".
///
/// Thresholds follow the common "from now" conventions: under 45s is "a few
/// seconds", under 90s "a minute", under 45m counts minutes, under 90m "an
/// hour", under 22h counts hours, under 36h "a day", under 26d counts days,
/// under 45d "a month", under 320d counts months, under 548d "a year".
pub fn relative_time(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(ts);
    let future = diff.num_seconds() < 0;
    let secs = diff.num_seconds().unsigned_abs() as f64;

    let minutes = secs / 60.0;
    let hours = minutes / 60.0;
    let days = hours / 24.0;

    let phrase = if secs < 45.0 {
        "a few seconds".to_string()
    } else if secs < 90.0 {
        "a minute".to_string()
    } else if minutes < 45.0 {
        format!("{} minutes", minutes.round())
    } else if minutes < 90.0 {
        "an hour".to_string()
    } else if hours < 22.0 {
        format!("{} hours", hours.round())
    } else if hours < 36.0 {
        "a day".to_string()
    } else if days < 26.0 {
        format!("{} days", days.round())
    } else if days < 45.0 {
        "a month".to_string()
    } else if days < 320.0 {
        format!("{} months", (days / 30.4).round().max(2.0))
    } else if days < 548.0 {
        "a year".to_string()
    } else {
        format!("{} years", (days / 365.25).round().max(2.0))
    };

    if future {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}
