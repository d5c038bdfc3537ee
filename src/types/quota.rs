use serde_json::{Map, Value};
use std::collections::BTreeMap;

const SESSION_KEY: &str = "five_hour";
const WEEKLY_KEY: &str = "seven_day";
const MODEL_KEY_PREFIX: &str = "seven_day_";
const EXTRA_USAGE_KEY: &str = "extra_usage";

/// One rate-limit window.
///
/// `utilization` is a percentage in 0-100 exactly as the usage API reports it.
/// It is never rescaled from a 0-1 fraction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuotaWindow {
    pub utilization: f64,
    /// RFC 3339 timestamp of the next reset, as sent by the API
    pub resets_at: Option<String>,
}

impl QuotaWindow {
    fn from_value(value: &Value) -> Self {
        Self {
            utilization: value
                .get("utilization")
                .and_then(Value::as_f64)
                .unwrap_or(0.0),
            resets_at: value
                .get("resets_at")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    /// Utilization clamped to the displayable range
    pub fn used_percent(&self) -> f64 {
        self.utilization.clamp(0.0, 100.0)
    }

    /// Complement of the rounded used percentage, so the two displayed
    /// whole numbers always add up to 100
    pub fn remaining_percent(&self) -> f64 {
        100.0 - self.used_percent().round()
    }
}

/// Pay-as-you-go credits beyond the subscription quota
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtraUsage {
    pub is_enabled: bool,
    /// Monthly cap in cents
    pub monthly_limit: Option<f64>,
    /// Credits spent this month in cents
    pub used_credits: Option<f64>,
}

impl ExtraUsage {
    fn from_value(value: &Value) -> Self {
        Self {
            is_enabled: value
                .get("is_enabled")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            monthly_limit: value.get("monthly_limit").and_then(Value::as_f64),
            used_credits: value.get("used_credits").and_then(Value::as_f64),
        }
    }

    pub fn monthly_limit_usd(&self) -> Option<f64> {
        self.monthly_limit.map(|cents| cents / 100.0)
    }

    pub fn used_usd(&self) -> Option<f64> {
        self.used_credits.map(|cents| cents / 100.0)
    }
}

/// Normalized result of one usage API call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuotaSnapshot {
    pub session: QuotaWindow,
    pub weekly: QuotaWindow,
    /// Weekly utilization per model, keyed by the `seven_day_<model>` suffix
    pub per_model_weekly: BTreeMap<String, f64>,
    pub extra_usage: Option<ExtraUsage>,
}

impl QuotaSnapshot {
    /// Normalize a usage API body. Absent windows read as 0% with no reset time.
    pub fn from_json(body: &Value) -> Self {
        let empty = Map::new();
        let fields = body.as_object().unwrap_or(&empty);

        let window = |key: &str| {
            fields
                .get(key)
                .filter(|v| v.is_object())
                .map(QuotaWindow::from_value)
                .unwrap_or_default()
        };

        let per_model_weekly = fields
            .iter()
            .filter_map(|(key, value)| {
                let model = key.strip_prefix(MODEL_KEY_PREFIX)?;
                if model.is_empty() || !value.is_object() {
                    return None;
                }
                Some((model.to_string(), QuotaWindow::from_value(value).utilization))
            })
            .collect();

        Self {
            session: window(SESSION_KEY),
            weekly: window(WEEKLY_KEY),
            per_model_weekly,
            extra_usage: fields
                .get(EXTRA_USAGE_KEY)
                .filter(|v| v.is_object())
                .map(ExtraUsage::from_value),
        }
    }
}
