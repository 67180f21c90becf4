use reqwest::Method;
use serde_json::json;

use super::NO_TOKEN_REASON;
use crate::runner::Harness;

const ATTACHMENT_FIELDS: [&str; 5] = [
    "instagram_id",
    "youtube_link1",
    "youtube_link2",
    "youtube_link3",
    "cv_filename",
];

/// Job application flows: admin listing, public submission, upload probe
pub async fn run(harness: &mut Harness) {
    if harness.has_token() {
        admin_access(harness).await;
    } else {
        harness.skip_scenario("Admin Applications Access", NO_TOKEN_REASON);
    }

    submission(harness).await;
    cv_upload_probe(harness).await;
}

/// Admin listing must expose the attachment fields on stored applications
async fn admin_access(harness: &mut Harness) {
    harness.begin_scenario("Admin Applications Access");

    let applications = harness
        .run_request(
            "Get Job Applications (Admin)",
            Method::GET,
            "applications",
            200,
            None,
        )
        .await;

    if let Some(applications) = applications {
        let list = applications.as_array().cloned().unwrap_or_default();
        harness.check(
            "Admin Applications Access",
            true,
            &format!("Found {} applications", list.len()),
        );

        if let Some(first) = list.first() {
            for field in ATTACHMENT_FIELDS {
                harness.check(
                    &format!("Application Field {} Present", field),
                    first.get(field).is_some(),
                    "Field missing in application data",
                );
            }
        }
    }

    harness.finish_scenario();
}

/// Public submission with portfolio, social and CV attachment fields
async fn submission(harness: &mut Harness) {
    harness.begin_scenario("Job Application Submission");

    let application = json!({
        "name": "Test Applicant",
        "email": "test@example.com",
        "phone": "+91 9876543210",
        "city": "Mumbai",
        "position_type": "intern",
        "note": "I am passionate about audio engineering and would love to learn from your team.",
        "portfolio_url": "https://portfolio.example.com",
        "instagram_id": "@testuser",
        "youtube_link1": "https://youtube.com/watch?v=test1",
        "youtube_link2": "https://youtube.com/watch?v=test2",
        "youtube_link3": "https://youtube.com/watch?v=test3",
        "cv_filename": "test_cv.pdf",
    });

    let response = harness
        .run_request(
            "Submit Job Application",
            Method::POST,
            "applications",
            200,
            Some(application),
        )
        .await;

    if let Some(response) = response {
        let details = response
            .get("id")
            .map(|id| format!("Application id: {}", id))
            .unwrap_or_default();
        harness.check("Job Application Accepted", true, &details);
    }

    harness.finish_scenario();
}

/// The upload endpoint must reject a missing file rather than 404.
/// Graded by hand since any non-404 status proves the route exists.
async fn cv_upload_probe(harness: &mut Harness) {
    harness.begin_scenario("CV Upload Endpoint");

    match harness.raw_request(Method::POST, "upload/cv").await {
        Ok(response) => match response.status().as_u16() {
            422 => {
                harness.check(
                    "CV Upload Endpoint Exists",
                    true,
                    "Endpoint responds correctly to missing file",
                );
            }
            404 => {
                harness.check("CV Upload Endpoint Exists", false, "Endpoint not found");
            }
            other => {
                harness.check(
                    "CV Upload Endpoint Exists",
                    true,
                    &format!("Endpoint exists (status: {})", other),
                );
            }
        },
        Err(err) => {
            harness.check(
                "CV Upload Endpoint Exists",
                false,
                &format!("Error: {}", err),
            );
        }
    }

    harness.finish_scenario();
}
