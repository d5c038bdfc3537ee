use ccquota::{
    CredentialLocator, Endpoints, QuotaConfig, QuotaFetcher, QuotaPlugin, Toast, ToastSink,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Clone, Default)]
struct RecordingSink(Arc<Mutex<Vec<Toast>>>);

impl ToastSink for RecordingSink {
    fn show(&self, toast: Toast) {
        self.0.lock().unwrap().push(toast);
    }
}

fn write_credentials(dir: &TempDir, access: &str, expires: i64) -> PathBuf {
    let path = dir.path().join("auth.json");
    let content = json!({
        "anthropic": {
            "type": "oauth",
            "refresh": "refresh-token",
            "access": access,
            "expires": expires
        }
    });
    std::fs::write(&path, content.to_string()).unwrap();
    path
}

fn plugin_for(server: &MockServer, credentials: PathBuf) -> QuotaPlugin {
    let fetcher = QuotaFetcher::with_endpoints(Endpoints {
        token_url: format!("{}/v1/oauth/token", server.uri()),
        usage_url: format!("{}/api/oauth/usage", server.uri()),
    })
    .unwrap();
    QuotaPlugin::new(
        QuotaConfig::default(),
        fetcher,
        CredentialLocator::from_paths([credentials]),
    )
}

fn assistant_message(input: u64, output: u64, cost: f64) -> serde_json::Value {
    json!({
        "role": "assistant",
        "tokens": { "input": input, "output": output, "cache": { "read": 0, "write": 0 } },
        "cost": cost
    })
}

#[tokio::test]
async fn test_quota_report_renders_remote_and_local_sections() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/oauth/usage"))
        .and(header("authorization", "Bearer live-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "five_hour": { "utilization": 8 },
            "seven_day": { "utilization": 28 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let plugin = plugin_for(&server, write_credentials(&dir, "live-token", i64::MAX));
    plugin.on_response_value(assistant_message(2_000, 1_000, 0.05));

    let report = plugin.quota().await;

    let session = report
        .lines()
        .find(|line| line.starts_with("**Session (5h):**"))
        .expect("session line");
    assert!(session.ends_with("8% used | 92% remaining"), "{session}");

    let weekly = report
        .lines()
        .find(|line| line.starts_with("**Weekly (7d):**"))
        .expect("weekly line");
    assert!(weekly.ends_with("28% used | 72% remaining"), "{weekly}");

    assert!(report.contains("## Local Usage (this session)"));
    assert!(report.contains("| **Total** | **3,000** |"));
    assert!(report.contains("Cost: $0.050"));
}

#[tokio::test]
async fn test_expired_token_with_failed_refresh_still_queries_usage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/oauth/token"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/oauth/usage"))
        .and(header("authorization", "Bearer expired-token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let plugin = plugin_for(&server, write_credentials(&dir, "expired-token", 1));

    let report = plugin.quota().await;
    assert!(report.contains("Could not fetch quota information."));
}

#[tokio::test]
async fn test_missing_credentials_fallback_keeps_local_usage() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let plugin = plugin_for(&server, dir.path().join("auth.json"));

    plugin.on_response_value(assistant_message(1_200, 300, 0.004));
    let report = plugin.quota().await;

    assert!(report.contains("Could not fetch quota information."));
    assert!(report.contains("Possible causes:"));
    assert!(report.contains("| Input | 1K |"));
    assert!(report.contains("Requests: 1"));
    assert!(report.contains("Cost: $0.0040"));
}

#[tokio::test]
async fn test_cancelled_quota_report_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/oauth/usage"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let plugin = plugin_for(&server, write_credentials(&dir, "token", i64::MAX));

    let report = plugin
        .quota_until(tokio::time::sleep(std::time::Duration::from_millis(20)))
        .await;
    assert!(report.contains("Could not fetch quota information."));
    assert!(report.contains("Requests: 0"));
}

#[tokio::test]
async fn test_session_lifecycle() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let sink = RecordingSink::default();
    let plugin = plugin_for(&server, dir.path().join("auth.json")).with_toast_sink(sink.clone());

    // Nothing recorded yet, so no toast
    assert!(plugin.on_session_idle().is_none());

    plugin.on_response_value(assistant_message(400_000, 100_000, 2.5));
    plugin.on_response_value(json!({ "role": "user" }));
    plugin.on_session_idle().expect("toast after a response");

    {
        let toasts = sink.0.lock().unwrap();
        assert_eq!(toasts.len(), 1);
        assert!(toasts[0].message.contains("Tokens: 500K / 1.0M (50%)"));
        assert!(toasts[0].message.contains("Cost: $2.50"));
        assert!(toasts[0].message.contains("Requests: 1"));
    }

    assert_eq!(
        plugin.quota_reset(),
        "Reset local usage. Previous: 500K tokens, 1 requests, $2.50"
    );

    plugin.on_response_value(assistant_message(10, 10, 0.0));
    plugin.on_session_created();
    assert!(plugin.on_session_idle().is_none());
    assert_eq!(sink.0.lock().unwrap().len(), 1);
}
