use crate::constants::{AUTH_FILE_ENV, DEFAULT_PROVIDER};
use crate::error::{QuotaError, Result};
use crate::types::OAuthCredential;
use serde::Deserialize;
use serde_json::Value;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs as async_fs;

const AUTH_FILE_NAME: &str = "auth.json";
const APP_DIR: &str = "opencode";

/// Produces one candidate location, or nothing if its inputs are unset
pub type PathResolver = Box<dyn Fn() -> Option<PathBuf> + Send + Sync>;

/// Outcome of probing the candidate list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialPath {
    Existing(PathBuf),
    /// Nothing exists; the first candidate is kept for diagnostics
    Fallback(PathBuf),
}

impl CredentialPath {
    pub fn path(&self) -> &Path {
        match self {
            CredentialPath::Existing(path) | CredentialPath::Fallback(path) => path,
        }
    }
}

/// Ordered credential file candidates plus the provider entry to read
pub struct CredentialLocator {
    resolvers: Vec<PathResolver>,
    provider: String,
}

impl fmt::Debug for CredentialLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialLocator")
            .field("resolvers", &self.resolvers.len())
            .field("provider", &self.provider)
            .finish()
    }
}

impl Default for CredentialLocator {
    fn default() -> Self {
        Self::new(default_resolvers())
    }
}

impl CredentialLocator {
    pub fn new(resolvers: Vec<PathResolver>) -> Self {
        Self {
            resolvers,
            provider: DEFAULT_PROVIDER.to_string(),
        }
    }

    /// Locator over a fixed list of paths
    pub fn from_paths<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let resolvers = paths
            .into_iter()
            .map(|path| Box::new(move || Some(path.clone())) as PathResolver)
            .collect();
        Self::new(resolvers)
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Evaluate candidates in order, stopping at the first existing file
    pub fn resolve(&self) -> CredentialPath {
        let mut first = None;
        for candidate in self.resolvers.iter().filter_map(|resolve| resolve()) {
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "using credentials file");
                return CredentialPath::Existing(candidate);
            }
            if first.is_none() {
                first = Some(candidate);
            }
        }
        CredentialPath::Fallback(first.unwrap_or_else(|| PathBuf::from(AUTH_FILE_NAME)))
    }

    /// Read and validate this provider's OAuth entry
    pub async fn load(&self) -> Result<OAuthCredential> {
        let path = match self.resolve() {
            CredentialPath::Existing(path) => path,
            CredentialPath::Fallback(path) => {
                return Err(QuotaError::CredentialsNotFound { path });
            }
        };

        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|source| QuotaError::CredentialRead {
                path: path.clone(),
                source,
            })?;

        parse_credentials(&content, &self.provider, &path)
    }
}

/// Extract `provider`'s OAuth entry from the credential file contents
pub fn parse_credentials(content: &str, provider: &str, path: &Path) -> Result<OAuthCredential> {
    let parse_error = |source| QuotaError::CredentialParse {
        path: path.to_path_buf(),
        source,
    };

    let document: Value = serde_json::from_str(content).map_err(parse_error)?;
    let entry = document
        .get(provider)
        .filter(|entry| entry.is_object())
        .ok_or_else(|| QuotaError::ProviderMissing {
            provider: provider.to_string(),
        })?;

    let kind = entry.get("type").and_then(Value::as_str).unwrap_or_default();
    if kind != "oauth" {
        return Err(QuotaError::NotOAuth {
            provider: provider.to_string(),
            kind: kind.to_string(),
        });
    }

    OAuthCredential::deserialize(entry).map_err(parse_error)
}

/// Env override, XDG data dir, then per-platform data directories
pub fn default_resolvers() -> Vec<PathResolver> {
    vec![
        Box::new(|| env::var_os(AUTH_FILE_ENV).map(PathBuf::from)) as PathResolver,
        Box::new(|| {
            env::var_os("XDG_DATA_HOME")
                .filter(|dir| !dir.is_empty())
                .map(|dir| PathBuf::from(dir).join(APP_DIR).join(AUTH_FILE_NAME))
        }),
        Box::new(|| {
            home::home_dir().map(|home| {
                home.join(".local/share")
                    .join(APP_DIR)
                    .join(AUTH_FILE_NAME)
            })
        }),
        Box::new(|| {
            home::home_dir().map(|home| {
                home.join("Library/Application Support")
                    .join(APP_DIR)
                    .join(AUTH_FILE_NAME)
            })
        }),
        Box::new(|| {
            env::var_os("APPDATA").map(|dir| PathBuf::from(dir).join(APP_DIR).join(AUTH_FILE_NAME))
        }),
    ]
}
