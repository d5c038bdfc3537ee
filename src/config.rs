use crate::constants::{
    DEFAULT_DAILY_TOKEN_LIMIT, DEFAULT_PROGRESS_BAR_WIDTH, DEFAULT_TOAST_DURATION,
};
use crate::error::{QuotaError, Result};
use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::time::Duration;

/// Host-supplied settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuotaConfig {
    /// Token budget the idle toast compares local usage against
    pub daily_token_limit: u64,
    pub show_toast_on_idle: bool,
    #[serde(deserialize_with = "duration_from_millis")]
    pub toast_duration: Duration,
    #[serde(deserialize_with = "bar_width")]
    pub progress_bar_width: usize,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            daily_token_limit: DEFAULT_DAILY_TOKEN_LIMIT,
            show_toast_on_idle: true,
            toast_duration: DEFAULT_TOAST_DURATION,
            progress_bar_width: DEFAULT_PROGRESS_BAR_WIDTH,
        }
    }
}

impl QuotaConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| QuotaError::ConfigParse {
            context: "quota config".to_string(),
            source,
        })
    }

    /// Load a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| QuotaError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| QuotaError::ConfigParse {
            context: path.display().to_string(),
            source,
        })
    }
}

fn duration_from_millis<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Duration::from_millis(u64::deserialize(deserializer)?))
}

// A zero-width bar renders nothing, fall back to the default
fn bar_width<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let width = usize::deserialize(deserializer)?;
    Ok(if width == 0 {
        DEFAULT_PROGRESS_BAR_WIDTH
    } else {
        width
    })
}
