/// Utilities for date and time formatting
///
/// The API sends timestamps as milliseconds since the epoch, in UTC
use chrono::{DateTime, Utc};

const MS_PER_MINUTE: i64 = 60_000;

/// Format a millisecond timestamp to DD.MM.YYYY HH:MM:SS
/// Example: 1565314200000 -> "09.08.2019 01:30:00"
pub fn format_timestamp(timestamp_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(timestamp_ms) {
        Some(datetime) => datetime.format("%d.%m.%Y %H:%M:%S").to_string(),
        None => timestamp_ms.to_string(),
    }
}

/// Format an optional timestamp, "-" when absent
pub fn format_optional_timestamp(timestamp_ms: Option<i64>) -> String {
    timestamp_ms
        .map(format_timestamp)
        .unwrap_or_else(|| "-".to_string())
}

/// Format a duration in milliseconds to HH:MM:SS
/// Example: 5_400_000 -> "01:30:00"
pub fn format_duration(duration_ms: i64) -> String {
    let total_seconds = duration_ms.max(0) / 1000;
    format!(
        "{:02}:{:02}:{:02}",
        total_seconds / 3600,
        (total_seconds % 3600) / 60,
        total_seconds % 60
    )
}

/// Whole minutes of a duration in milliseconds
pub fn duration_minutes(duration_ms: i64) -> i64 {
    duration_ms / MS_PER_MINUTE
}

pub fn minutes_to_ms(minutes: i64) -> i64 {
    minutes.saturating_mul(MS_PER_MINUTE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(1_565_314_200_000), "09.08.2019 01:30:00");
        assert_eq!(format_timestamp(0), "01.01.1970 00:00:00");
    }

    #[test]
    fn test_format_optional_timestamp() {
        assert_eq!(format_optional_timestamp(None), "-");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(5_400_000), "01:30:00");
        assert_eq!(format_duration(61_000), "00:01:01");
        assert_eq!(format_duration(-5), "00:00:00");
    }

    #[test]
    fn test_minutes() {
        assert_eq!(duration_minutes(5_400_000), 90);
        assert_eq!(minutes_to_ms(2), 120_000);
    }
}
