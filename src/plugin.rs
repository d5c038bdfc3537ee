//! Host-facing entry points: lifecycle event hooks and callable tools.
//!
//! The host constructs one [`QuotaPlugin`] per process and routes its events
//! and tool invocations to it. Hooks never fail; tools always return text.

use crate::accumulator::UsageAccumulator;
use crate::config::QuotaConfig;
use crate::credentials::CredentialLocator;
use crate::fetcher::QuotaFetcher;
use crate::report::{render_idle_toast, render_quota_report, render_reset_summary};
use crate::types::ResponseMessage;
use chrono::Utc;
use serde_json::Value;
use std::future::{self, Future};
use std::sync::Arc;
use std::time::Duration;

/// Notification shown by the host
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub title: String,
    pub message: String,
    pub duration: Duration,
}

/// Implemented by the host to display notifications
#[cfg_attr(test, mockall::automock)]
pub trait ToastSink: Send + Sync {
    fn show(&self, toast: Toast);
}

pub struct QuotaPlugin {
    accumulator: Arc<UsageAccumulator>,
    fetcher: QuotaFetcher,
    locator: CredentialLocator,
    config: QuotaConfig,
    toasts: Option<Box<dyn ToastSink>>,
}

impl QuotaPlugin {
    pub fn new(config: QuotaConfig, fetcher: QuotaFetcher, locator: CredentialLocator) -> Self {
        Self {
            accumulator: Arc::new(UsageAccumulator::new()),
            fetcher,
            locator,
            config,
            toasts: None,
        }
    }

    pub fn with_toast_sink(mut self, sink: impl ToastSink + 'static) -> Self {
        self.toasts = Some(Box::new(sink));
        self
    }

    /// Share counters with another owner (e.g. a second plugin instance)
    pub fn with_accumulator(mut self, accumulator: Arc<UsageAccumulator>) -> Self {
        self.accumulator = accumulator;
        self
    }

    pub fn accumulator(&self) -> &Arc<UsageAccumulator> {
        &self.accumulator
    }

    pub fn config(&self) -> &QuotaConfig {
        &self.config
    }

    // -- event hooks --

    /// Count an assistant message's tokens and cost. Other messages are ignored.
    pub fn on_response_updated(&self, message: &ResponseMessage) {
        if let Some((tokens, cost)) = message.usage() {
            self.accumulator.record_response(&tokens, cost);
        }
    }

    /// Same as [`Self::on_response_updated`] for an undecoded host payload
    pub fn on_response_value(&self, payload: Value) {
        match ResponseMessage::from_value(payload) {
            Some(message) => self.on_response_updated(&message),
            None => tracing::debug!("ignoring unrecognized response payload"),
        }
    }

    /// Summarize local usage when the session goes idle. Returns the toast
    /// that was shown, if any.
    pub fn on_session_idle(&self) -> Option<Toast> {
        if !self.config.show_toast_on_idle {
            return None;
        }

        let snapshot = self.accumulator.snapshot();
        if snapshot.is_empty() {
            return None;
        }

        let toast = Toast {
            title: "Claude usage".to_string(),
            message: render_idle_toast(&snapshot, &self.config),
            duration: self.config.toast_duration,
        };
        if let Some(sink) = &self.toasts {
            sink.show(toast.clone());
        }
        Some(toast)
    }

    pub fn on_session_created(&self) {
        self.accumulator.reset();
    }

    // -- tools --

    /// Combined Markdown report of the subscription quota and local usage
    pub async fn quota(&self) -> String {
        self.quota_until(future::pending::<()>()).await
    }

    /// [`Self::quota`], abandoning the remote fetch once `cancel` completes
    pub async fn quota_until<F>(&self, cancel: F) -> String
    where
        F: Future,
    {
        let outcome = self.fetcher.fetch_quota_until(&self.locator, cancel).await;
        let now = Utc::now();
        let local = self.accumulator.snapshot_at(now);
        render_quota_report(&outcome, &local, &self.config, now)
    }

    pub fn quota_reset(&self) -> String {
        render_reset_summary(&self.accumulator.reset())
    }
}
