use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Outcome of a single recorded check
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Passed,
    Failed,
    Skipped,
}

/// A single expected-vs-actual comparison; immutable once recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckState {
    pub name: String,
    pub status: CheckStatus,
    pub details: String,
    pub expected_status: Option<u16>,
    pub actual_status: Option<u16>,
    pub duration_ms: Option<u64>,
}

impl CheckState {
    pub fn passed(name: &str, details: &str) -> Self {
        Self::new(name, CheckStatus::Passed, details)
    }

    pub fn failed(name: &str, details: &str) -> Self {
        Self::new(name, CheckStatus::Failed, details)
    }

    pub fn skipped(name: &str, reason: &str) -> Self {
        Self::new(name, CheckStatus::Skipped, reason)
    }

    fn new(name: &str, status: CheckStatus, details: &str) -> Self {
        Self {
            name: name.to_string(),
            status,
            details: details.to_string(),
            expected_status: None,
            actual_status: None,
            duration_ms: None,
        }
    }

    /// Attach the expected and observed HTTP status codes
    pub fn with_statuses(mut self, expected: u16, actual: Option<u16>) -> Self {
        self.expected_status = Some(expected);
        self.actual_status = actual;
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

/// Status of a whole scenario group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScenarioStatus {
    Pending,
    Passed,
    Failed,
    PartiallyPassed { passed: u32, failed: u32 },
    Skipped { reason: String },
}

/// State for one scenario group execution
#[derive(Debug, Clone)]
pub struct ScenarioState {
    pub name: String,
    pub status: ScenarioStatus,
    pub checks: Vec<CheckState>,
    pub started_at: Option<Instant>,
    pub duration_ms: Option<u64>,
}

impl ScenarioState {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: ScenarioStatus::Pending,
            checks: Vec::new(),
            started_at: None,
            duration_ms: None,
        }
    }

    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Append a check to the ordered log
    pub fn record(&mut self, check: CheckState) {
        self.checks.push(check);
    }

    /// Mark the whole scenario as skipped
    pub fn skip(&mut self, reason: &str) {
        self.status = ScenarioStatus::Skipped {
            reason: reason.to_string(),
        };
    }

    /// Derive the scenario status from its checks
    pub fn finish(&mut self) {
        if let Some(start) = self.started_at {
            self.duration_ms = Some(start.elapsed().as_millis() as u64);
        }

        let (passed, failed) = self
            .checks
            .iter()
            .fold((0, 0), |(p, f), check| match check.status {
                CheckStatus::Passed => (p + 1, f),
                CheckStatus::Failed => (p, f + 1),
                CheckStatus::Skipped => (p, f),
            });

        self.status = if failed == 0 {
            ScenarioStatus::Passed
        } else if passed == 0 {
            ScenarioStatus::Failed
        } else {
            ScenarioStatus::PartiallyPassed { passed, failed }
        };
    }

    /// Serialize state for reporting (without Instant which isn't serializable)
    pub fn to_report(&self) -> ScenarioReport {
        ScenarioReport {
            name: self.name.clone(),
            status: self.status.clone(),
            checks: self.checks.clone(),
            duration_ms: self.duration_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    pub name: String,
    pub status: ScenarioStatus,
    pub checks: Vec<CheckState>,
    pub duration_ms: Option<u64>,
}

/// Global test session state
#[derive(Debug, Clone)]
pub struct SessionState {
    pub session_id: String,
    pub base_url: String,
    pub scenarios: Vec<ScenarioState>,
    pub started_at: Option<Instant>,
    pub finished_at: Option<Instant>,
}

impl SessionState {
    pub fn new(session_id: &str, base_url: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            base_url: base_url.to_string(),
            scenarios: Vec::new(),
            started_at: None,
            finished_at: None,
        }
    }

    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    pub fn add_scenario(&mut self, scenario: ScenarioState) {
        self.scenarios.push(scenario);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Instant::now());
    }

    /// Derive the run summary from the check log.
    ///
    /// Skipped checks are visibility bookkeeping and count toward neither
    /// `tests_run` nor `tests_passed`; the success rate reflects executed
    /// assertions only and is 0.0 when nothing ran.
    pub fn summary(&self) -> RunSummary {
        let mut passed = 0u32;
        let mut failed = 0u32;
        let mut skipped = 0u32;

        for scenario in &self.scenarios {
            for check in &scenario.checks {
                match check.status {
                    CheckStatus::Passed => passed += 1,
                    CheckStatus::Failed => failed += 1,
                    CheckStatus::Skipped => skipped += 1,
                }
            }
        }

        let tests_run = passed + failed;
        let success_rate = if tests_run == 0 {
            0.0
        } else {
            let rate = passed as f64 / tests_run as f64 * 100.0;
            (rate * 10.0).round() / 10.0
        };

        let total_duration_ms = self.started_at.map(|start| {
            self.finished_at
                .unwrap_or_else(Instant::now)
                .duration_since(start)
                .as_millis() as u64
        });

        RunSummary {
            tests_run,
            tests_passed: passed,
            tests_failed: failed,
            tests_skipped: skipped,
            success_rate,
            total_duration_ms,
        }
    }

    pub fn to_reports(&self) -> Vec<ScenarioReport> {
        self.scenarios.iter().map(|s| s.to_report()).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub tests_run: u32,
    pub tests_passed: u32,
    pub tests_failed: u32,
    pub tests_skipped: u32,
    pub success_rate: f64,
    pub total_duration_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_checks(checks: Vec<CheckState>) -> SessionState {
        let mut scenario = ScenarioState::new("Sample Scenario");
        scenario.start();
        for check in checks {
            scenario.record(check);
        }
        scenario.finish();

        let mut session = SessionState::new("session", "http://localhost");
        session.add_scenario(scenario);
        session
    }

    #[test]
    fn test_summary_counts_and_rate() {
        let session = session_with_checks(vec![
            CheckState::passed("a", ""),
            CheckState::passed("b", ""),
            CheckState::failed("c", "boom"),
        ]);

        let summary = session.summary();
        assert_eq!(summary.tests_run, 3);
        assert_eq!(summary.tests_passed, 2);
        assert_eq!(summary.tests_failed, 1);
        assert_eq!(summary.success_rate, 66.7);
    }

    #[test]
    fn test_empty_run_reports_zero_rate() {
        let session = SessionState::new("session", "http://localhost");
        let summary = session.summary();
        assert_eq!(summary.tests_run, 0);
        assert_eq!(summary.success_rate, 0.0);
    }

    #[test]
    fn test_skipped_checks_excluded_from_rate() {
        let session = session_with_checks(vec![
            CheckState::passed("a", ""),
            CheckState::skipped("b", "no token"),
        ]);

        let summary = session.summary();
        assert_eq!(summary.tests_run, 1);
        assert_eq!(summary.tests_passed, 1);
        assert_eq!(summary.tests_skipped, 1);
        assert_eq!(summary.success_rate, 100.0);
    }

    #[test]
    fn test_scenario_status_derivation() {
        let mut all_passed = ScenarioState::new("ok");
        all_passed.record(CheckState::passed("a", ""));
        all_passed.finish();
        assert_eq!(all_passed.status, ScenarioStatus::Passed);

        let mut all_failed = ScenarioState::new("bad");
        all_failed.record(CheckState::failed("a", "x"));
        all_failed.finish();
        assert_eq!(all_failed.status, ScenarioStatus::Failed);

        let mut mixed = ScenarioState::new("mixed");
        mixed.record(CheckState::passed("a", ""));
        mixed.record(CheckState::failed("b", "x"));
        mixed.finish();
        assert_eq!(
            mixed.status,
            ScenarioStatus::PartiallyPassed {
                passed: 1,
                failed: 1
            }
        );
    }

    #[test]
    fn test_check_statuses_attached() {
        let check = CheckState::failed("login", "Unauthorized").with_statuses(200, Some(401));
        assert_eq!(check.expected_status, Some(200));
        assert_eq!(check.actual_status, Some(401));
    }
}
