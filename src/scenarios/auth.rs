use reqwest::Method;
use serde_json::{json, Value};

use crate::runner::Harness;
use crate::utils::config::HarnessConfig;

/// Admin login; stores the bearer token for the rest of the session
pub async fn run(harness: &mut Harness, config: &HarnessConfig) {
    harness.begin_scenario("Admin Authentication");

    let response = harness
        .run_request(
            "Admin Login",
            Method::POST,
            "admin/login",
            200,
            Some(json!({
                "email": config.admin_email,
                "password": config.admin_password,
            })),
        )
        .await;

    if let Some(response) = response {
        match response.get("token").and_then(Value::as_str) {
            Some(token) => {
                harness.set_token(token);
                harness.check("Login Token Present", true, "");
            }
            None => {
                harness.check(
                    "Login Token Present",
                    false,
                    "token field missing in login response",
                );
            }
        }
    }

    harness.finish_scenario();
}
