use reqwest::Method;

use crate::runner::Harness;

/// Basic availability checks across the public endpoints
pub async fn run(harness: &mut Harness) {
    harness.begin_scenario("General API Health");

    let endpoints = [
        ("Get Services", "services"),
        ("Get Projects", "projects"),
        ("Get Site Content", "settings/content"),
        ("Get Contact Info", "settings/contact"),
    ];

    for (name, endpoint) in endpoints {
        harness
            .run_request(name, Method::GET, endpoint, 200, None)
            .await;
    }

    harness.finish_scenario();
}
