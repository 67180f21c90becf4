use std::collections::HashMap;
use std::time::Instant;

use colored::Colorize;
use reqwest::Method;
use serde_json::Value;
use uuid::Uuid;

use super::state::{CheckState, RunSummary, ScenarioState, ScenarioStatus, SessionState};
use crate::client::ApiClient;
use crate::utils::config::HarnessConfig;

/// Raw response bodies are cut to this length in failure details
const MAX_DETAIL_LEN: usize = 100;

/// Drives request/response assertions and accumulates the check log.
///
/// Every assertion is recorded exactly once and never retried; a failed
/// check never aborts the run.
pub struct Harness {
    client: ApiClient,
    session: SessionState,
    current: Option<ScenarioState>,
}

impl Harness {
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            client: ApiClient::new(&config.base_url, config.request_timeout_ms),
            session: SessionState::new(&Uuid::new_v4().to_string(), &config.base_url),
            current: None,
        }
    }

    pub fn start(&mut self) {
        self.session.start();
    }

    pub fn finish(&mut self) {
        self.session.finish();
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn session_id(&self) -> &str {
        &self.session.session_id
    }

    pub fn summary(&self) -> RunSummary {
        self.session.summary()
    }

    pub fn set_token(&mut self, token: &str) {
        self.client.set_token(token);
    }

    pub fn has_token(&self) -> bool {
        self.client.has_token()
    }

    /// Issue a request through the client without recording anything.
    /// Used by probes that grade the status code themselves.
    pub async fn raw_request(
        &self,
        method: Method,
        endpoint: &str,
    ) -> reqwest::Result<reqwest::Response> {
        self.client.request(method, endpoint, None, None).await
    }

    pub fn begin_scenario(&mut self, name: &str) {
        println!("\n{} Scenario: {}", "→".blue(), name.white().bold());
        let mut scenario = ScenarioState::new(name);
        scenario.start();
        self.current = Some(scenario);
    }

    pub fn finish_scenario(&mut self) {
        if let Some(mut scenario) = self.current.take() {
            scenario.finish();

            let status_str = match &scenario.status {
                ScenarioStatus::Passed => "PASSED".green().bold(),
                ScenarioStatus::Failed => "FAILED".red().bold(),
                ScenarioStatus::PartiallyPassed { passed, failed } => {
                    format!("PARTIAL ({}/{} passed)", passed, passed + failed)
                        .yellow()
                        .bold()
                }
                _ => "UNKNOWN".white().bold(),
            };
            println!("  {} {} [{}]", "←".blue(), scenario.name, status_str);

            self.session.add_scenario(scenario);
        }
    }

    /// Record a scenario as skipped without running any of its checks
    pub fn skip_scenario(&mut self, name: &str, reason: &str) {
        println!(
            "\n{} Scenario: {} [{}] {}",
            "↷".yellow(),
            name,
            "SKIPPED".yellow().bold(),
            reason.dimmed()
        );
        let mut scenario = ScenarioState::new(name);
        scenario.skip(reason);
        self.session.add_scenario(scenario);
    }

    /// Record a log-only assertion; shared by networked and field checks
    pub fn check(&mut self, name: &str, success: bool, details: &str) -> bool {
        if success {
            println!("  {} {}", "✓".green(), name);
            self.record(CheckState::passed(name, details));
        } else {
            println!("  {} {} - {}", "✗".red(), name, details);
            self.record(CheckState::failed(name, details));
        }
        success
    }

    /// Record a skipped check with a reason
    pub fn skip(&mut self, name: &str, reason: &str) {
        println!("  {} {} ({})", "↷".yellow(), name, reason.dimmed());
        self.record(CheckState::skipped(name, reason));
    }

    /// Run a single request assertion without extra headers
    pub async fn run_request(
        &mut self,
        name: &str,
        method: Method,
        endpoint: &str,
        expected_status: u16,
        body: Option<Value>,
    ) -> Option<Value> {
        self.run_request_with(name, method, endpoint, expected_status, body, None)
            .await
    }

    /// Run a single request assertion.
    ///
    /// Compares the observed status to `expected_status` and records a pass
    /// or fail. On a match the parsed JSON body is returned, falling back to
    /// a generic success marker for non-JSON bodies. Status mismatches and
    /// transport failures are recorded with diagnostic detail and yield
    /// `None`; neither propagates.
    pub async fn run_request_with(
        &mut self,
        name: &str,
        method: Method,
        endpoint: &str,
        expected_status: u16,
        body: Option<Value>,
        headers: Option<&HashMap<String, String>>,
    ) -> Option<Value> {
        let started = Instant::now();
        let result = self
            .client
            .request(method, endpoint, body.as_ref(), headers)
            .await;

        match result {
            Ok(response) => {
                let actual_status = response.status().as_u16();
                let raw = response.text().await.unwrap_or_default();
                let duration_ms = started.elapsed().as_millis() as u64;

                if actual_status == expected_status {
                    println!("  {} {}", "✓".green(), name);
                    self.record(
                        CheckState::passed(name, "")
                            .with_statuses(expected_status, Some(actual_status))
                            .with_duration(duration_ms),
                    );
                    Some(parse_body(&raw))
                } else {
                    let details = extract_error_detail(&raw);
                    println!("  {} {} - {}", "✗".red(), name, details);
                    println!(
                        "      Expected: {}, Got: {}",
                        expected_status.to_string().green(),
                        actual_status.to_string().red()
                    );
                    self.record(
                        CheckState::failed(name, &details)
                            .with_statuses(expected_status, Some(actual_status))
                            .with_duration(duration_ms),
                    );
                    None
                }
            }
            Err(err) => {
                let duration_ms = started.elapsed().as_millis() as u64;
                let details = format!("Error: {}", err);
                println!("  {} {} - {}", "✗".red(), name, details);
                self.record(
                    CheckState::failed(name, &details)
                        .with_statuses(expected_status, None)
                        .with_duration(duration_ms),
                );
                None
            }
        }
    }

    fn record(&mut self, check: CheckState) {
        let scenario = self.current.get_or_insert_with(|| {
            let mut adhoc = ScenarioState::new("ad hoc");
            adhoc.start();
            adhoc
        });
        scenario.record(check);
    }
}

/// Parse a body that matched its expected status; non-JSON bodies
/// collapse to a generic success marker
fn parse_body(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::json!({ "status": "success" }))
}

/// Pull a human-readable error out of a failure response body.
/// Prefers the backend's `detail` field; non-JSON bodies are truncated.
fn extract_error_detail(raw: &str) -> String {
    match serde_json::from_str::<Value>(raw) {
        Ok(body) => match body.get("detail") {
            Some(Value::String(detail)) => detail.clone(),
            Some(other) => other.to_string(),
            None => "Unknown error".to_string(),
        },
        Err(_) => raw.chars().take(MAX_DETAIL_LEN).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::state::CheckStatus;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn harness_for(base_url: &str) -> Harness {
        let config = HarnessConfig {
            base_url: base_url.to_string(),
            request_timeout_ms: 2_000,
            ..HarnessConfig::default()
        };
        Harness::new(&config)
    }

    /// Serve a single canned HTTP response, then close
    async fn spawn_stub(status_line: &'static str, body: &'static str) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub addr");

        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{}", addr)
    }

    #[test]
    fn test_check_counts_pass_and_fail() {
        let mut harness = harness_for("http://localhost");
        harness.begin_scenario("Counting");
        harness.check("passes", true, "");
        harness.check("fails", false, "wrong value");
        harness.skip("not applicable", "backend feature disabled");
        harness.finish_scenario();

        let summary = harness.summary();
        assert_eq!(summary.tests_run, 2);
        assert_eq!(summary.tests_passed, 1);
        assert_eq!(summary.tests_failed, 1);
        assert_eq!(summary.tests_skipped, 1);
    }

    #[test]
    fn test_skipped_scenario_recorded_with_reason() {
        let mut harness = harness_for("http://localhost");
        harness.skip_scenario("Admin Only", "no token");

        let session = harness.session();
        assert_eq!(session.scenarios.len(), 1);
        assert_eq!(
            session.scenarios[0].status,
            ScenarioStatus::Skipped {
                reason: "no token".to_string()
            }
        );
        assert_eq!(harness.summary().tests_run, 0);
    }

    #[test]
    fn test_extract_error_detail() {
        assert_eq!(
            extract_error_detail(r#"{"detail": "Invalid credentials"}"#),
            "Invalid credentials"
        );
        assert_eq!(
            extract_error_detail(r#"{"detail": [{"loc": "body"}]}"#),
            r#"[{"loc":"body"}]"#
        );
        assert_eq!(extract_error_detail(r#"{"message": "nope"}"#), "Unknown error");

        let long_body = "x".repeat(250);
        let detail = extract_error_detail(&long_body);
        assert_eq!(detail.len(), MAX_DETAIL_LEN);
    }

    #[test]
    fn test_parse_body_falls_back_to_marker() {
        assert_eq!(
            parse_body("<html>not json</html>"),
            serde_json::json!({ "status": "success" })
        );
        assert_eq!(
            parse_body(r#"{"token": "abc"}"#),
            serde_json::json!({ "token": "abc" })
        );
    }

    #[tokio::test]
    async fn test_matching_status_returns_parsed_body() {
        let base = spawn_stub("200 OK", r#"{"token": "abc123"}"#).await;
        let mut harness = harness_for(&base);

        harness.begin_scenario("Login");
        let body = harness
            .run_request("Admin Login", Method::GET, "admin/login", 200, None)
            .await;
        harness.finish_scenario();

        assert_eq!(body, Some(serde_json::json!({ "token": "abc123" })));
        let summary = harness.summary();
        assert_eq!(summary.tests_run, 1);
        assert_eq!(summary.tests_passed, 1);
    }

    #[tokio::test]
    async fn test_status_mismatch_counts_run_not_passed() {
        let base = spawn_stub("404 Not Found", r#"{"detail": "Email not found"}"#).await;
        let mut harness = harness_for(&base);

        harness.begin_scenario("Missing");
        let body = harness
            .run_request("Forgot Password", Method::GET, "auth/forgot-password", 200, None)
            .await;
        harness.finish_scenario();

        assert_eq!(body, None);
        let summary = harness.summary();
        assert_eq!(summary.tests_run, 1);
        assert_eq!(summary.tests_passed, 0);

        let check = &harness.session().scenarios[0].checks[0];
        assert_eq!(check.status, CheckStatus::Failed);
        assert_eq!(check.expected_status, Some(200));
        assert_eq!(check.actual_status, Some(404));
        assert_eq!(check.details, "Email not found");
    }

    #[tokio::test]
    async fn test_transport_failure_recorded_as_failure() {
        // Bind then drop to get a port with nothing listening
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let mut harness = harness_for(&format!("http://{}", addr));
        harness.begin_scenario("Unreachable");
        let body = harness
            .run_request("Get Services", Method::GET, "services", 200, None)
            .await;
        harness.finish_scenario();

        assert_eq!(body, None);
        let summary = harness.summary();
        assert_eq!(summary.tests_run, 1);
        assert_eq!(summary.tests_failed, 1);

        let check = &harness.session().scenarios[0].checks[0];
        assert!(check.details.starts_with("Error: "));
        assert_eq!(check.actual_status, None);
    }
}
