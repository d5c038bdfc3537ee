use super::cost::Cost;
use super::usage::TokenDelta;
use chrono::{DateTime, Duration, Utc};

/// Token and cost counters accumulated since the last reset
#[derive(Debug, Clone, PartialEq)]
pub struct LocalUsageState {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_read_tokens: u64,
    pub cache_write_tokens: u64,
    pub reasoning_tokens: u64,
    pub cost: Cost,
    pub request_count: u64,
    pub session_started_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
}

impl LocalUsageState {
    /// Fresh, zeroed state for a session starting at `now`
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            input_tokens: 0,
            output_tokens: 0,
            cache_read_tokens: 0,
            cache_write_tokens: 0,
            reasoning_tokens: 0,
            cost: Cost::default(),
            request_count: 0,
            session_started_at: now,
            last_updated_at: now,
        }
    }

    /// Add one response worth of tokens and cost
    pub fn record(&mut self, tokens: &TokenDelta, cost: f64, now: DateTime<Utc>) {
        self.input_tokens = self.input_tokens.saturating_add(tokens.input);
        self.output_tokens = self.output_tokens.saturating_add(tokens.output);
        self.reasoning_tokens = self.reasoning_tokens.saturating_add(tokens.reasoning);
        self.cache_read_tokens = self.cache_read_tokens.saturating_add(tokens.cache_read);
        self.cache_write_tokens = self.cache_write_tokens.saturating_add(tokens.cache_write);
        if cost.is_finite() && cost > 0.0 {
            self.cost += cost;
        }
        self.request_count += 1;
        self.last_updated_at = now;
    }

    pub fn total_tokens(&self) -> u64 {
        self.input_tokens
            .saturating_add(self.output_tokens)
            .saturating_add(self.reasoning_tokens)
            .saturating_add(self.cache_read_tokens)
            .saturating_add(self.cache_write_tokens)
    }

    /// Immutable copy with derived totals as of `now`
    pub fn snapshot_at(&self, now: DateTime<Utc>) -> LocalUsageSnapshot {
        let session_duration = now
            .signed_duration_since(self.session_started_at)
            .max(Duration::zero());
        LocalUsageSnapshot {
            total_tokens: self.total_tokens(),
            session_duration,
            state: self.clone(),
        }
    }
}

/// Point-in-time copy of the local counters
#[derive(Debug, Clone, PartialEq)]
pub struct LocalUsageSnapshot {
    pub state: LocalUsageState,
    pub total_tokens: u64,
    pub session_duration: Duration,
}

impl LocalUsageSnapshot {
    pub fn is_empty(&self) -> bool {
        self.state.request_count == 0
    }

    /// Percentage of `limit` consumed; zero when no limit is configured
    pub fn percent_of(&self, limit: u64) -> f64 {
        if limit == 0 {
            return 0.0;
        }
        self.total_tokens as f64 / limit as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ts: &str) -> DateTime<Utc> {
        ts.parse::<DateTime<Utc>>().unwrap()
    }

    #[test]
    fn test_record_adds_every_field() {
        let start = at("2025-01-15T10:00:00Z");
        let mut state = LocalUsageState::new(start);
        let delta = TokenDelta {
            input: 10,
            output: 20,
            reasoning: 3,
            cache_read: 40,
            cache_write: 5,
        };

        state.record(&delta, 0.5, at("2025-01-15T10:01:00Z"));
        state.record(&delta, 0.25, at("2025-01-15T10:02:00Z"));

        assert_eq!(state.input_tokens, 20);
        assert_eq!(state.output_tokens, 40);
        assert_eq!(state.reasoning_tokens, 6);
        assert_eq!(state.cache_read_tokens, 80);
        assert_eq!(state.cache_write_tokens, 10);
        assert_eq!(state.total_tokens(), 156);
        assert_eq!(state.cost.value(), 0.75);
        assert_eq!(state.request_count, 2);
        assert_eq!(state.last_updated_at, at("2025-01-15T10:02:00Z"));
        assert_eq!(state.session_started_at, start);
    }

    #[test]
    fn test_invalid_cost_is_ignored() {
        let mut state = LocalUsageState::new(at("2025-01-15T10:00:00Z"));
        state.record(&TokenDelta::default(), f64::NAN, at("2025-01-15T10:00:00Z"));
        state.record(&TokenDelta::default(), -1.0, at("2025-01-15T10:00:00Z"));
        assert_eq!(state.cost.value(), 0.0);
        assert_eq!(state.request_count, 2);
    }

    #[test]
    fn test_snapshot_derives_totals() {
        let mut state = LocalUsageState::new(at("2025-01-15T10:00:00Z"));
        state.record(
            &TokenDelta {
                input: 1_000,
                output: 500,
                ..Default::default()
            },
            0.0,
            at("2025-01-15T10:05:00Z"),
        );

        let snapshot = state.snapshot_at(at("2025-01-15T11:30:00Z"));
        assert_eq!(snapshot.total_tokens, 1_500);
        assert_eq!(snapshot.session_duration, Duration::minutes(90));
        assert!(!snapshot.is_empty());
        assert_eq!(snapshot.percent_of(3_000), 50.0);
        assert_eq!(snapshot.percent_of(0), 0.0);
    }

    #[test]
    fn test_snapshot_duration_never_negative() {
        let state = LocalUsageState::new(at("2025-01-15T10:00:00Z"));
        let snapshot = state.snapshot_at(at("2025-01-15T09:00:00Z"));
        assert_eq!(snapshot.session_duration, Duration::zero());
        assert!(snapshot.is_empty());
    }
}
