use crate::types::{Cost, RemainingTime};
use chrono::{DateTime, Utc};

const FILLED: &str = "█";
const EMPTY: &str = "░";

// Render a percentage as a bar of `width` cells
pub fn progress_bar(percent: f64, width: usize) -> String {
    let percent = if percent.is_nan() { 0.0 } else { percent.clamp(0.0, 100.0) };
    let filled = ((percent / 100.0 * width as f64).round() as usize).min(width);
    format!("{}{}", FILLED.repeat(filled), EMPTY.repeat(width - filled))
}

// Format an elapsed time given in milliseconds
pub fn format_duration(ms: i64) -> String {
    let minutes = ms / 60_000;
    if minutes < 1 {
        return "<1 min".to_string();
    }
    if minutes < 60 {
        return format!("{} min", minutes);
    }

    let hours = minutes / 60;
    let mins = minutes % 60;
    if mins > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}h", hours)
    }
}

// Format the time until an RFC 3339 reset timestamp
pub fn format_time_remaining(resets_at: Option<&str>) -> String {
    format_time_remaining_at(resets_at, Utc::now())
}

pub fn format_time_remaining_at(resets_at: Option<&str>, now: DateTime<Utc>) -> String {
    resets_at
        .and_then(|ts| RemainingTime::from_timestamp(ts, now))
        .map(|remaining| remaining.to_formatted_string())
        .unwrap_or_else(|| "unknown".to_string())
}

// Compact token counts: 1.5M, 12K, 999
pub fn format_token_count(n: u64) -> String {
    if n >= 1_000_000 {
        // Round half up to one decimal; `{:.1}` alone would round half to even
        let tenths = (n as f64 / 100_000.0).round();
        format!("{:.1}M", tenths / 10.0)
    } else if n >= 1_000 {
        format!("{}K", (n as f64 / 1_000.0).round() as u64)
    } else {
        n.to_string()
    }
}

// Format currency
pub fn format_cost(value: f64) -> String {
    Cost::new(value).to_formatted_string()
}

// Whole-number percentage, rounding half up
pub fn format_percent(value: f64) -> String {
    format!("{}%", value.round() as i64)
}

// Format number with thousands separator
pub fn format_number_with_commas(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let mut count = 0;

    for c in s.chars().rev() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(c);
        count += 1;
    }

    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_bounds() {
        assert_eq!(progress_bar(0.0, 20), "░".repeat(20));
        assert_eq!(progress_bar(100.0, 20), "█".repeat(20));
        assert_eq!(progress_bar(150.0, 10), progress_bar(100.0, 10));
        assert_eq!(progress_bar(-20.0, 10), progress_bar(0.0, 10));
        assert_eq!(progress_bar(f64::NAN, 4), "░░░░");
        assert_eq!(progress_bar(50.0, 0), "");
    }

    #[test]
    fn test_progress_bar_rounding() {
        assert_eq!(progress_bar(50.0, 10), "█████░░░░░");
        // 8% of 20 cells = 1.6 -> 2
        assert_eq!(progress_bar(8.0, 20), format!("{}{}", "█".repeat(2), "░".repeat(18)));
        assert_eq!(progress_bar(28.0, 20).chars().count(), 20);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "<1 min");
        assert_eq!(format_duration(59_999), "<1 min");
        assert_eq!(format_duration(60_000), "1 min");
        assert_eq!(format_duration(59 * 60_000), "59 min");
        assert_eq!(format_duration(60 * 60_000), "1h");
        assert_eq!(format_duration(90 * 60_000), "1h 30m");
        assert_eq!(format_duration(120 * 60_000), "2h");
        assert_eq!(format_duration(-5_000), "<1 min");
    }

    #[test]
    fn test_format_time_remaining() {
        let now = "2025-01-15T10:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(format_time_remaining_at(None, now), "unknown");
        assert_eq!(format_time_remaining_at(Some("garbage"), now), "unknown");
        assert_eq!(
            format_time_remaining_at(Some("2025-01-15T10:00:00Z"), now),
            "resetting..."
        );
        assert_eq!(
            format_time_remaining_at(Some("2025-01-15T10:45:00Z"), now),
            "45m"
        );
        assert_eq!(
            format_time_remaining_at(Some("2025-01-15T13:20:00Z"), now),
            "3h 20m"
        );
        assert_eq!(
            format_time_remaining_at(Some("2025-01-17T15:00:00Z"), now),
            "2d 5h"
        );
        assert_eq!(format_time_remaining(None), "unknown");
    }

    #[test]
    fn test_format_token_count() {
        assert_eq!(format_token_count(0), "0");
        assert_eq!(format_token_count(999), "999");
        assert_eq!(format_token_count(1_000), "1K");
        assert_eq!(format_token_count(1_499), "1K");
        assert_eq!(format_token_count(1_500), "2K");
        assert_eq!(format_token_count(12_345), "12K");
        assert_eq!(format_token_count(1_000_000), "1.0M");
        assert_eq!(format_token_count(1_250_000), "1.3M");
        assert_eq!(format_token_count(1_500_000), "1.5M");
    }

    #[test]
    fn test_format_cost() {
        assert_eq!(format_cost(0.0), "$0.0000");
        assert_eq!(format_cost(0.0099), "$0.0099");
        assert_eq!(format_cost(0.5), "$0.500");
        assert_eq!(format_cost(3.14159), "$3.14");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(8.0), "8%");
        assert_eq!(format_percent(27.5), "28%");
        assert_eq!(format_percent(71.6), "72%");
    }

    #[test]
    fn test_format_number_with_commas() {
        assert_eq!(format_number_with_commas(0), "0");
        assert_eq!(format_number_with_commas(999), "999");
        assert_eq!(format_number_with_commas(1_000), "1,000");
        assert_eq!(format_number_with_commas(1_234_567), "1,234,567");
    }
}
