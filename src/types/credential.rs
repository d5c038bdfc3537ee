use serde::Deserialize;
use std::fmt;

/// OAuth entry of the host's credential file: `{type: "oauth", refresh, access, expires}`
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct OAuthCredential {
    pub refresh: String,
    pub access: String,
    /// Expiry of `access` in epoch milliseconds
    pub expires: i64,
}

impl OAuthCredential {
    /// The access token may not be used once `expires` has passed
    pub fn is_expired_at(&self, now_millis: i64) -> bool {
        self.expires < now_millis
    }
}

// Keep tokens out of logs and panic messages
impl fmt::Debug for OAuthCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthCredential")
            .field("refresh", &"<redacted>")
            .field("access", &"<redacted>")
            .field("expires", &self.expires)
            .finish()
    }
}

/// Response body of the OAuth token endpoint
#[derive(Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry() {
        let credential = OAuthCredential {
            refresh: "r".into(),
            access: "a".into(),
            expires: 1_000,
        };
        assert!(!credential.is_expired_at(999));
        assert!(!credential.is_expired_at(1_000));
        assert!(credential.is_expired_at(1_001));
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let credential = OAuthCredential {
            refresh: "secret-refresh".into(),
            access: "secret-access".into(),
            expires: 42,
        };
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("42"));
    }
}
