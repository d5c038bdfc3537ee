use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuotaError {
    // Credential errors
    #[error("No credentials file found (looked first at {path})")]
    CredentialsNotFound { path: PathBuf },

    #[error("Failed to read credentials file: {path}")]
    CredentialRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse credentials file: {path}")]
    CredentialParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No '{provider}' entry in credentials file")]
    ProviderMissing { provider: String },

    #[error("Credentials for '{provider}' are of type '{kind}', expected 'oauth'")]
    NotOAuth { provider: String, kind: String },

    // Remote errors
    #[error("Token refresh failed with status {status}")]
    TokenRefresh { status: u16 },

    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    #[error("Usage API returned status {status}")]
    UsageStatus { status: u16 },

    #[error("Failed to parse usage response")]
    UsageParse(#[source] reqwest::Error),

    #[error("Quota fetch was cancelled")]
    Cancelled,

    // Configuration errors
    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {context}")]
    ConfigParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Coarse failure categories surfaced to the end user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    CredentialUnavailable,
    RemoteCallFailed,
    Configuration,
}

impl QuotaError {
    pub fn kind(&self) -> FailureKind {
        match self {
            QuotaError::CredentialsNotFound { .. }
            | QuotaError::CredentialRead { .. }
            | QuotaError::CredentialParse { .. }
            | QuotaError::ProviderMissing { .. }
            | QuotaError::NotOAuth { .. } => FailureKind::CredentialUnavailable,
            QuotaError::TokenRefresh { .. }
            | QuotaError::Http(_)
            | QuotaError::UsageStatus { .. }
            | QuotaError::UsageParse(_)
            | QuotaError::Cancelled => FailureKind::RemoteCallFailed,
            QuotaError::ConfigRead { .. } | QuotaError::ConfigParse { .. } => {
                FailureKind::Configuration
            }
        }
    }

    /// True when the usage endpoint rejected the bearer token
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, QuotaError::UsageStatus { status: 401 | 403 })
    }
}

pub type Result<T> = std::result::Result<T, QuotaError>;
