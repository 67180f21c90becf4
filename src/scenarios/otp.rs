use reqwest::Method;
use serde_json::json;

use super::unique_fragment;
use crate::runner::Harness;
use crate::utils::config::HarnessConfig;

/// OTP-based password recovery flows for admins and users.
///
/// Unknown emails are expected to surface as 404; the backend owns that
/// contract and the observed status lands in the check detail either way.
pub async fn run(harness: &mut Harness, config: &HarnessConfig) {
    admin_forgot_password(harness, config).await;
    user_forgot_password(harness).await;
    admin_resend_otp(harness, config).await;
}

async fn admin_forgot_password(harness: &mut Harness, config: &HarnessConfig) {
    harness.begin_scenario("Admin Forgot Password Flow");

    let result = harness
        .run_request(
            "Admin Forgot Password Request",
            Method::POST,
            "auth/forgot-password",
            200,
            Some(json!({
                "email": config.admin_email,
                "user_type": "admin",
            })),
        )
        .await;

    harness.check(
        "Admin Forgot Password Response Format",
        result.is_some(),
        if result.is_some() {
            "OTP request successful"
        } else {
            "Invalid response"
        },
    );

    harness
        .run_request(
            "Admin Forgot Password Invalid Email",
            Method::POST,
            "auth/forgot-password",
            404,
            Some(json!({
                "email": "nonexistent@example.com",
                "user_type": "admin",
            })),
        )
        .await;

    harness.finish_scenario();
}

/// Registers a throwaway user first so the recovery request has a target
async fn user_forgot_password(harness: &mut Harness) {
    harness.begin_scenario("User Forgot Password Flow");

    let test_email = format!("test_user_{}@example.com", unique_fragment());

    let registered = harness
        .run_request(
            "User Registration",
            Method::POST,
            "auth/register",
            200,
            Some(json!({
                "name": "Test User",
                "email": test_email,
                "password": "TestPass123!",
            })),
        )
        .await;

    if registered.is_some() {
        let result = harness
            .run_request(
                "User Forgot Password Request",
                Method::POST,
                "auth/forgot-password",
                200,
                Some(json!({
                    "email": test_email,
                    "user_type": "user",
                })),
            )
            .await;

        harness.check(
            "User Forgot Password Response Format",
            result.is_some(),
            if result.is_some() {
                "OTP request successful"
            } else {
                "Invalid response"
            },
        );
    }

    harness
        .run_request(
            "User Forgot Password Invalid Email",
            Method::POST,
            "auth/forgot-password",
            404,
            Some(json!({
                "email": "nonexistent_user@example.com",
                "user_type": "user",
            })),
        )
        .await;

    harness.finish_scenario();
}

async fn admin_resend_otp(harness: &mut Harness, config: &HarnessConfig) {
    harness.begin_scenario("Admin Resend OTP Flow");

    let otp_body = json!({ "email": config.admin_email });

    let requested = harness
        .run_request(
            "Admin Initial OTP Request",
            Method::POST,
            "admin/request-otp",
            200,
            Some(otp_body.clone()),
        )
        .await;

    if requested.is_some() {
        let resent = harness
            .run_request(
                "Admin Resend OTP",
                Method::POST,
                "admin/resend-otp",
                200,
                Some(otp_body),
            )
            .await;

        harness.check(
            "Admin Resend OTP Response Format",
            resent.is_some(),
            if resent.is_some() {
                "Resend successful"
            } else {
                "Invalid response"
            },
        );
    }

    harness.finish_scenario();
}
