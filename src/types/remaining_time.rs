use chrono::{DateTime, Utc};
use std::fmt;

/// Time left until a quota window resets
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct RemainingTime(i64); // milliseconds

impl RemainingTime {
    /// Create from seconds
    pub fn new(seconds: i64) -> Self {
        RemainingTime(seconds.saturating_mul(1000))
    }

    pub fn from_millis(millis: i64) -> Self {
        RemainingTime(millis)
    }

    /// Remaining time from `now` until `resets_at`
    pub fn until(resets_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        RemainingTime(resets_at.signed_duration_since(now).num_milliseconds())
    }

    /// Parse an RFC 3339 reset timestamp. Unparseable input yields `None`.
    pub fn from_timestamp(resets_at: &str, now: DateTime<Utc>) -> Option<Self> {
        let resets_at = DateTime::parse_from_rfc3339(resets_at).ok()?;
        Some(Self::until(resets_at.with_timezone(&Utc), now))
    }

    /// Check if there's time remaining
    pub fn has_remaining(&self) -> bool {
        self.0 > 0
    }

    /// Format as a readable string (e.g., "2d 3h", "4h 15m", "12m")
    pub fn to_formatted_string(&self) -> String {
        if !self.has_remaining() {
            return "resetting...".to_string();
        }

        let total_minutes = self.0 / 60_000;
        let total_hours = total_minutes / 60;
        let days = total_hours / 24;

        if days > 0 {
            format!("{}d {}h", days, total_hours % 24)
        } else if total_hours > 0 {
            format!("{}h {}m", total_hours, total_minutes % 60)
        } else {
            format!("{}m", total_minutes)
        }
    }
}

impl fmt::Display for RemainingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_formatted_string())
    }
}
