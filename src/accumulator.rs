use crate::types::{LocalUsageSnapshot, LocalUsageState, TokenDelta};
use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Process-lifetime token/cost counters.
///
/// Every operation takes the lock once and never awaits while holding it, so
/// a report interleaved with an event handler sees either the state before
/// or after a whole `record_response`, never a partial update.
#[derive(Debug)]
pub struct UsageAccumulator {
    state: Mutex<LocalUsageState>,
}

impl Default for UsageAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageAccumulator {
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            state: Mutex::new(LocalUsageState::new(now)),
        }
    }

    pub fn record_response(&self, tokens: &TokenDelta, cost: f64) {
        self.record_response_at(tokens, cost, Utc::now());
    }

    pub fn record_response_at(&self, tokens: &TokenDelta, cost: f64, now: DateTime<Utc>) {
        self.lock().record(tokens, cost, now);
    }

    /// Zero every counter and start a new session. Returns the totals that
    /// were discarded.
    pub fn reset(&self) -> LocalUsageSnapshot {
        self.reset_at(Utc::now())
    }

    pub fn reset_at(&self, now: DateTime<Utc>) -> LocalUsageSnapshot {
        let previous = std::mem::replace(&mut *self.lock(), LocalUsageState::new(now));
        tracing::debug!(
            requests = previous.request_count,
            tokens = previous.total_tokens(),
            "local usage reset"
        );
        previous.snapshot_at(now)
    }

    pub fn snapshot(&self) -> LocalUsageSnapshot {
        self.snapshot_at(Utc::now())
    }

    pub fn snapshot_at(&self, now: DateTime<Utc>) -> LocalUsageSnapshot {
        self.lock().snapshot_at(now)
    }

    // A panic elsewhere cannot leave the counters half-written: every
    // mutation is a single assignment, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, LocalUsageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
