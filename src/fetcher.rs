use crate::constants::{
    ANTHROPIC_BETA_HEADER, ANTHROPIC_BETA_VALUE, ANTHROPIC_VERSION_HEADER,
    ANTHROPIC_VERSION_VALUE, OAUTH_CLIENT_ID, REQUEST_TIMEOUT, TOKEN_URL, USAGE_URL,
    USER_AGENT_VALUE,
};
use crate::credentials::CredentialLocator;
use crate::error::{QuotaError, Result};
use crate::types::{OAuthCredential, QuotaSnapshot, TokenRefreshResponse};
use chrono::Utc;
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

/// Remote endpoints used by the fetcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub token_url: String,
    pub usage_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            token_url: TOKEN_URL.to_string(),
            usage_url: USAGE_URL.to_string(),
        }
    }
}

/// Result of a quota fetch. Every failure collapses into `Unavailable`.
#[derive(Debug)]
pub enum QuotaOutcome {
    Available(QuotaSnapshot),
    Unavailable(QuotaError),
}

impl QuotaOutcome {
    pub fn snapshot(&self) -> Option<&QuotaSnapshot> {
        match self {
            QuotaOutcome::Available(snapshot) => Some(snapshot),
            QuotaOutcome::Unavailable(_) => None,
        }
    }

    pub fn into_result(self) -> Result<QuotaSnapshot> {
        match self {
            QuotaOutcome::Available(snapshot) => Ok(snapshot),
            QuotaOutcome::Unavailable(err) => Err(err),
        }
    }
}

impl From<Result<QuotaSnapshot>> for QuotaOutcome {
    fn from(result: Result<QuotaSnapshot>) -> Self {
        match result {
            Ok(snapshot) => QuotaOutcome::Available(snapshot),
            Err(err) => QuotaOutcome::Unavailable(err),
        }
    }
}

/// Reads OAuth credentials, refreshes them once if expired, and queries the
/// usage endpoint.
#[derive(Debug, Clone)]
pub struct QuotaFetcher {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl QuotaFetcher {
    pub fn new() -> Result<Self> {
        Self::with_endpoints(Endpoints::default())
    }

    pub fn with_endpoints(endpoints: Endpoints) -> Result<Self> {
        Self::with_timeout(endpoints, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(endpoints: Endpoints, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT_VALUE)
            .build()?;
        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub async fn fetch_quota(&self, locator: &CredentialLocator) -> QuotaOutcome {
        let result = self.try_fetch(locator).await;
        if let Err(err) = &result {
            tracing::debug!(error = %err, "quota unavailable");
        }
        result.into()
    }

    /// Like `fetch_quota`, but gives up as soon as `cancel` completes
    pub async fn fetch_quota_until<F>(&self, locator: &CredentialLocator, cancel: F) -> QuotaOutcome
    where
        F: Future,
    {
        tokio::select! {
            outcome = self.fetch_quota(locator) => outcome,
            _ = cancel => {
                tracing::debug!("quota fetch cancelled");
                QuotaOutcome::Unavailable(QuotaError::Cancelled)
            }
        }
    }

    async fn try_fetch(&self, locator: &CredentialLocator) -> Result<QuotaSnapshot> {
        let credential = locator.load().await?;
        let access_token = self
            .usable_access_token(&credential, Utc::now().timestamp_millis())
            .await;
        self.fetch_usage(&access_token).await
    }

    /// The stored access token, or a refreshed one when it has expired.
    /// A failed refresh falls back to the stale token; the usage call then
    /// fails on its own.
    async fn usable_access_token(&self, credential: &OAuthCredential, now_millis: i64) -> String {
        if !credential.is_expired_at(now_millis) {
            return credential.access.clone();
        }

        tracing::debug!(expires = credential.expires, "access token expired, refreshing");
        match self.refresh_token(&credential.refresh).await {
            Ok(refreshed) => {
                tracing::debug!(expires_in = ?refreshed.expires_in, "access token refreshed");
                refreshed.access_token
            }
            Err(err) => {
                tracing::warn!(error = %err, "token refresh failed, using stored token");
                credential.access.clone()
            }
        }
    }

    /// Exchange a refresh token for a new access token (in memory only)
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenRefreshResponse> {
        let body = serde_json::json!({
            "grant_type": "refresh_token",
            "refresh_token": refresh_token,
            "client_id": OAUTH_CLIENT_ID,
        });

        let response = self
            .client
            .post(&self.endpoints.token_url)
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(QuotaError::TokenRefresh {
                status: response.status().as_u16(),
            });
        }

        Ok(response.json::<TokenRefreshResponse>().await?)
    }

    /// Query the usage endpoint and normalize its body
    pub async fn fetch_usage(&self, access_token: &str) -> Result<QuotaSnapshot> {
        let response = self
            .client
            .get(&self.endpoints.usage_url)
            .bearer_auth(access_token)
            .header(ACCEPT, "application/json")
            .header(ANTHROPIC_BETA_HEADER, ANTHROPIC_BETA_VALUE)
            .header(ANTHROPIC_VERSION_HEADER, ANTHROPIC_VERSION_VALUE)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(QuotaError::UsageStatus {
                status: response.status().as_u16(),
            });
        }

        let body: Value = response.json().await.map_err(QuotaError::UsageParse)?;
        Ok(QuotaSnapshot::from_json(&body))
    }
}
