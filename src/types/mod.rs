pub mod cost;
pub mod credential;
pub mod local_usage;
pub mod quota;
pub mod remaining_time;
pub mod usage;

pub use cost::Cost;
pub use credential::{OAuthCredential, TokenRefreshResponse};
pub use local_usage::{LocalUsageSnapshot, LocalUsageState};
pub use quota::{ExtraUsage, QuotaSnapshot, QuotaWindow};
pub use remaining_time::RemainingTime;
pub use usage::{AssistantMessage, CacheUsage, ResponseMessage, TokenDelta, TokenUsage};
