use serde::{Deserialize, Deserializer};
use serde_json::Value;

// Message payload delivered by the host on every response update
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ResponseMessage {
    Assistant(AssistantMessage),
    User,
    System,
    #[serde(other)]
    Other,
}

impl ResponseMessage {
    /// Decode a loosely-typed host payload. Anything unrecognizable is `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }

    /// The token delta and cost carried by an assistant message, if any
    pub fn usage(&self) -> Option<(TokenDelta, f64)> {
        match self {
            ResponseMessage::Assistant(message) => message.usage(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub tokens: Option<TokenUsage>,
    #[serde(default, deserialize_with = "lenient_cost")]
    pub cost: Option<f64>,
}

impl AssistantMessage {
    pub fn usage(&self) -> Option<(TokenDelta, f64)> {
        let tokens = self.tokens.as_ref()?;
        Some((TokenDelta::from(tokens), self.cost.unwrap_or(0.0)))
    }
}

// Raw token counts; every field may be missing or malformed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenUsage {
    #[serde(default, deserialize_with = "lenient_count")]
    pub input: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub output: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub reasoning: Option<u64>,
    #[serde(default)]
    pub cache: Option<CacheUsage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheUsage {
    #[serde(default, deserialize_with = "lenient_count")]
    pub read: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub write: Option<u64>,
}

/// Token counts with every absent field coerced to zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenDelta {
    pub input: u64,
    pub output: u64,
    pub reasoning: u64,
    pub cache_read: u64,
    pub cache_write: u64,
}

impl TokenDelta {
    pub fn total(&self) -> u64 {
        self.input
            .saturating_add(self.output)
            .saturating_add(self.reasoning)
            .saturating_add(self.cache_read)
            .saturating_add(self.cache_write)
    }
}

impl From<&TokenUsage> for TokenDelta {
    fn from(usage: &TokenUsage) -> Self {
        let cache = usage.cache.as_ref();
        Self {
            input: usage.input.unwrap_or(0),
            output: usage.output.unwrap_or(0),
            reasoning: usage.reasoning.unwrap_or(0),
            cache_read: cache.and_then(|c| c.read).unwrap_or(0),
            cache_write: cache.and_then(|c| c.write).unwrap_or(0),
        }
    }
}

// Accepts any JSON value; only finite non-negative numbers survive
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(non_negative).map(|n| n as u64))
}

fn lenient_cost<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(non_negative))
}

fn non_negative(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .filter(|n| n.is_finite() && *n >= 0.0)
}
