use std::collections::HashMap;
use std::time::Duration;

use log::debug;
use reqwest::Method;
use serde_json::Value;

/// HTTP client for the backend API.
///
/// Holds the `/api`-suffixed base URL and, once an admin login succeeded,
/// the bearer token attached to every subsequent request.
pub struct ApiClient {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client with a fixed per-request timeout
    pub fn new(base_url: &str, timeout_ms: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_url: format!("{}/api", base_url.trim_end_matches('/')),
            token: None,
        }
    }

    /// Store the bearer token for authenticated calls
    pub fn set_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Full URL for an endpoint path
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.api_url, endpoint.trim_start_matches('/'))
    }

    /// Issue a request with a JSON content type, optional extra headers,
    /// optional JSON body, and the bearer token when one is held.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        headers: Option<&HashMap<String, String>>,
    ) -> reqwest::Result<reqwest::Response> {
        let url = self.endpoint_url(endpoint);
        debug!("{} {}", method, url);

        let mut req = self
            .client
            .request(method, &url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        if let Some(extra) = headers {
            for (key, value) in extra {
                req = req.header(key.as_str(), value.as_str());
            }
        }

        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        if let Some(body) = body {
            req = req.json(body);
        }

        req.send().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_join() {
        let client = ApiClient::new("https://example.com", 1000);
        assert_eq!(
            client.endpoint_url("services"),
            "https://example.com/api/services"
        );
        assert_eq!(
            client.endpoint_url("/settings/content"),
            "https://example.com/api/settings/content"
        );
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let client = ApiClient::new("http://localhost:8000/", 1000);
        assert_eq!(
            client.endpoint_url("admin/login"),
            "http://localhost:8000/api/admin/login"
        );
    }
}
