pub mod applications;
pub mod auth;
pub mod bookings;
pub mod cms;
pub mod health;
pub mod otp;

use serde_json::Value;
use uuid::Uuid;

use crate::runner::Harness;

pub(crate) const NO_TOKEN_REASON: &str = "admin login did not yield a token";

/// Short unique fragment for throwaway test emails
pub(crate) fn unique_fragment() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Check that every field sent in `expected` is echoed back unchanged
pub(crate) fn verify_fields_updated(
    harness: &mut Harness,
    label: &str,
    expected: &Value,
    response: &Value,
) {
    let Some(fields) = expected.as_object() else {
        return;
    };

    for (key, value) in fields {
        let name = format!("{} {} Updated", label, key);
        match response.get(key) {
            Some(actual) if actual == value => {
                harness.check(&name, true, "");
            }
            other => {
                let got = other.map_or_else(|| "null".to_string(), Value::to_string);
                harness.check(&name, false, &format!("Expected {}, got {}", value, got));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::state::CheckStatus;
    use crate::utils::config::HarnessConfig;
    use serde_json::json;

    #[test]
    fn test_verify_fields_updated_records_per_field() {
        let mut harness = Harness::new(&HarnessConfig::default());
        harness.begin_scenario("Echo");

        let expected = json!({ "stat1_value": "7+", "stat1_label": "Years Experience" });
        let response = json!({ "stat1_value": "7+", "stat1_label": "stale" });
        verify_fields_updated(&mut harness, "Stats Field", &expected, &response);

        harness.finish_scenario();

        let checks = &harness.session().scenarios[0].checks;
        assert_eq!(checks.len(), 2);
        let failed: Vec<_> = checks
            .iter()
            .filter(|c| c.status == CheckStatus::Failed)
            .collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].name, "Stats Field stat1_label Updated");
        assert!(failed[0].details.contains("stale"));
    }

    #[test]
    fn test_unique_fragment_length() {
        let fragment = unique_fragment();
        assert_eq!(fragment.len(), 8);
        assert_ne!(fragment, unique_fragment());
    }
}
