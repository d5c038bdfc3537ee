// Module declarations
pub mod accumulator;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod fetcher;
pub mod formatting;
pub mod plugin;
pub mod report;
pub mod types;

// Re-export commonly used items
pub use accumulator::UsageAccumulator;
pub use config::QuotaConfig;
pub use credentials::{CredentialLocator, CredentialPath};
pub use error::{FailureKind, QuotaError, Result};
pub use fetcher::{Endpoints, QuotaFetcher, QuotaOutcome};
pub use plugin::{QuotaPlugin, Toast, ToastSink};
pub use types::{
    Cost, LocalUsageSnapshot, LocalUsageState, OAuthCredential, QuotaSnapshot, QuotaWindow,
    RemainingTime, ResponseMessage, TokenDelta,
};
