use reqwest::Method;
use serde_json::{json, Value};

use super::unique_fragment;
use crate::runner::Harness;

/// Hourly-service contract: flag and price checks, then a 3-hour booking
pub async fn run(harness: &mut Harness) {
    let services = service_hours(harness).await;
    booking_with_hours(harness, services).await;
}

/// `GET services` and verify the two hourly services advertise themselves
async fn service_hours(harness: &mut Harness) -> Option<Value> {
    harness.begin_scenario("Service Hours Requirements");

    let services = harness
        .run_request("Get Services for Hours Check", Method::GET, "services", 200, None)
        .await;

    if let Some(services) = &services {
        verify_hourly_service(harness, services, "Dubbing", "₹299/hr");
        verify_hourly_service(harness, services, "Vocal Recording", "₹399/hr");
    }

    harness.finish_scenario();
    services
}

/// Book the Dubbing service for 3 hours and verify the hours round-trip
async fn booking_with_hours(harness: &mut Harness, services: Option<Value>) {
    harness.begin_scenario("Booking With Hours");

    let dubbing = services
        .as_ref()
        .and_then(|services| find_service(services, "Dubbing"));
    let Some(dubbing) = dubbing else {
        harness.check(
            "Booking Creation With Hours",
            false,
            "Dubbing service not available",
        );
        harness.finish_scenario();
        return;
    };

    let booking = json!({
        "full_name": "Test Hours Booking",
        "email": format!("hours_test_{}@example.com", unique_fragment()),
        "phone": "+91 9876543210",
        "service_id": dubbing.get("id").cloned().unwrap_or(Value::Null),
        "service_name": "Dubbing",
        "description": "Automated booking for an hourly service",
        "preferred_date": "2024-12-25",
        "preferred_time": "10:00 AM",
        "hours": 3,
    });

    let response = harness
        .run_request(
            "Booking Creation With Hours",
            Method::POST,
            "bookings",
            200,
            Some(booking),
        )
        .await;

    if let Some(response) = response {
        let hours = response
            .get("booking")
            .and_then(|booking| booking.get("hours"))
            .and_then(Value::as_i64);

        harness.check(
            "Booking Hours Saved",
            hours == Some(3),
            &match hours {
                Some(3) => "3 hours saved correctly".to_string(),
                Some(other) => format!("Expected 3 hours, got {}", other),
                None => "hours field missing in booking response".to_string(),
            },
        );
    }

    harness.finish_scenario();
}

fn find_service<'a>(services: &'a Value, name: &str) -> Option<&'a Value> {
    services
        .as_array()?
        .iter()
        .find(|service| service.get("name").and_then(Value::as_str) == Some(name))
}

fn verify_hourly_service(harness: &mut Harness, services: &Value, name: &str, price: &str) {
    let Some(service) = find_service(services, name) else {
        harness.check(
            &format!("{} Service Found", name),
            false,
            &format!("{} service not found", name),
        );
        return;
    };

    let requires_hours = service.get("requires_hours").and_then(Value::as_bool);
    harness.check(
        &format!("{} Requires Hours Flag", name),
        requires_hours == Some(true),
        &format!("requires_hours = {:?}", requires_hours),
    );

    let actual_price = service.get("price").and_then(Value::as_str);
    harness.check(
        &format!("{} Hourly Price", name),
        actual_price == Some(price),
        &format!("Expected {}, got {:?}", price, actual_price),
    );
}
