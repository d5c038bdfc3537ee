use std::time::Duration;

/// OAuth token endpoint used to exchange a refresh token for a new access token
pub const TOKEN_URL: &str = "https://console.anthropic.com/v1/oauth/token";

/// Subscription usage endpoint (5-hour and 7-day windows)
pub const USAGE_URL: &str = "https://api.anthropic.com/api/oauth/usage";

/// Public OAuth client identifier of the Claude CLI
pub const OAUTH_CLIENT_ID: &str = "9d1c250a-e61b-44d9-88ed-5944d1962f5e";

/// Beta header required by the OAuth usage API
pub const ANTHROPIC_BETA_HEADER: &str = "anthropic-beta";
pub const ANTHROPIC_BETA_VALUE: &str = "oauth-2025-04-20";

pub const ANTHROPIC_VERSION_HEADER: &str = "anthropic-version";
pub const ANTHROPIC_VERSION_VALUE: &str = "2023-06-01";

pub const USER_AGENT_VALUE: &str = concat!("ccquota/", env!("CARGO_PKG_VERSION"));

/// Key of the credential entry inside the auth file
pub const DEFAULT_PROVIDER: &str = "anthropic";

/// Overrides every other credential location when set
pub const AUTH_FILE_ENV: &str = "CCQUOTA_AUTH_FILE";

/// Filter directive for the CLI log output (stderr)
pub const LOG_ENV: &str = "CCQUOTA_LOG";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_DAILY_TOKEN_LIMIT: u64 = 1_000_000;
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(5000);
pub const DEFAULT_PROGRESS_BAR_WIDTH: usize = 20;

/// Utilization thresholds used for coloring (percent)
pub const WARN_THRESHOLD: f64 = 50.0;
pub const CRITICAL_THRESHOLD: f64 = 80.0;
