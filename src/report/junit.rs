use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;
use std::path::Path;

use super::types::TestResults;
use crate::runner::state::{CheckStatus, ScenarioReport, ScenarioStatus};

/// Generate JUnit XML report string from TestResults
pub fn generate_junit_xml(results: &TestResults) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let total_tests = results.scenarios.len();
    let failures = results
        .scenarios
        .iter()
        .filter(|s| {
            matches!(
                s.status,
                ScenarioStatus::Failed | ScenarioStatus::PartiallyPassed { .. }
            )
        })
        .count();
    let skipped = results
        .scenarios
        .iter()
        .filter(|s| matches!(s.status, ScenarioStatus::Skipped { .. }))
        .count();
    let total_duration: u64 = results
        .scenarios
        .iter()
        .map(|s| s.duration_ms.unwrap_or(0))
        .sum();

    // <testsuites>
    let mut suites_start = BytesStart::new("testsuites");
    suites_start.push_attribute(("name", "studio-api-tester-run"));
    suites_start.push_attribute(("tests", total_tests.to_string().as_str()));
    suites_start.push_attribute(("failures", failures.to_string().as_str()));
    suites_start.push_attribute(("skipped", skipped.to_string().as_str()));
    suites_start.push_attribute((
        "time",
        (total_duration as f64 / 1000.0).to_string().as_str(),
    ));
    writer.write_event(Event::Start(suites_start))?;

    // Single <testsuite> for the run; scenarios map to test cases
    let mut suite_start = BytesStart::new("testsuite");
    suite_start.push_attribute(("name", "scenarios"));
    suite_start.push_attribute(("tests", total_tests.to_string().as_str()));
    suite_start.push_attribute(("failures", failures.to_string().as_str()));
    suite_start.push_attribute(("skipped", skipped.to_string().as_str()));
    suite_start.push_attribute(("id", results.session_id.as_str()));
    suite_start.push_attribute((
        "time",
        (total_duration as f64 / 1000.0).to_string().as_str(),
    ));
    suite_start.push_attribute(("timestamp", results.generated_at.as_str()));
    writer.write_event(Event::Start(suite_start))?;

    for scenario in &results.scenarios {
        write_test_case(&mut writer, scenario)?;
    }

    writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
    writer.write_event(Event::End(BytesEnd::new("testsuites")))?;

    let result = writer.into_inner().into_inner();
    let xml = String::from_utf8(result)?;
    Ok(xml)
}

fn write_test_case<W: std::io::Write>(
    writer: &mut Writer<W>,
    scenario: &ScenarioReport,
) -> Result<()> {
    let mut case_start = BytesStart::new("testcase");
    case_start.push_attribute(("name", scenario.name.as_str()));
    case_start.push_attribute(("classname", "scenarios"));
    case_start.push_attribute((
        "time",
        (scenario.duration_ms.unwrap_or(0) as f64 / 1000.0)
            .to_string()
            .as_str(),
    ));

    writer.write_event(Event::Start(case_start))?;

    match &scenario.status {
        ScenarioStatus::Failed | ScenarioStatus::PartiallyPassed { .. } => {
            let failing: Vec<&crate::runner::state::CheckState> = scenario
                .checks
                .iter()
                .filter(|c| c.status == CheckStatus::Failed)
                .collect();
            let message = failing
                .first()
                .map(|c| c.details.as_str())
                .unwrap_or("Unknown error");

            let mut fail_start = BytesStart::new("failure");
            fail_start.push_attribute(("message", message));
            fail_start.push_attribute(("type", "AssertionError"));
            writer.write_event(Event::Start(fail_start))?;

            let body = failing
                .iter()
                .map(|c| format!("{}: {}", c.name, c.details))
                .collect::<Vec<_>>()
                .join("\n");
            writer.write_event(Event::Text(BytesText::new(&body)))?;

            writer.write_event(Event::End(BytesEnd::new("failure")))?;
        }
        ScenarioStatus::Skipped { reason } => {
            let mut skip_start = BytesStart::new("skipped");
            skip_start.push_attribute(("message", reason.as_str()));
            writer.write_event(Event::Start(skip_start))?;
            writer.write_event(Event::End(BytesEnd::new("skipped")))?;
        }
        _ => {}
    }

    writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    Ok(())
}

/// Write junit.xml into the output directory
pub fn write_report(results: &TestResults, output_dir: &Path) -> Result<()> {
    let xml = generate_junit_xml(results)?;
    let path = output_dir.join("junit.xml");
    std::fs::write(&path, xml)?;
    println!("    Generated JUnit report: {}", path.display());
    Ok(())
}

/// Generate JUnit report for the `report` subcommand
pub async fn generate(results: &TestResults, output: Option<&Path>) -> Result<()> {
    let xml = generate_junit_xml(results)?;

    if let Some(path) = output {
        std::fs::write(path, xml)?;
        println!("JUnit report saved to: {}", path.display());
    } else {
        println!("{}", xml);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::state::{CheckState, RunSummary};

    #[test]
    fn test_generate_junit_xml() {
        let results = TestResults {
            session_id: "test-session".to_string(),
            base_url: "http://localhost:8000".to_string(),
            generated_at: "2023-01-01T12:00:00+00:00".to_string(),
            summary: RunSummary {
                tests_run: 3,
                tests_passed: 2,
                tests_failed: 1,
                tests_skipped: 0,
                success_rate: 66.7,
                total_duration_ms: Some(3500),
            },
            scenarios: vec![
                ScenarioReport {
                    name: "Admin Authentication".to_string(),
                    status: ScenarioStatus::Passed,
                    checks: vec![CheckState::passed("Admin Login", "")],
                    duration_ms: Some(1500),
                },
                ScenarioReport {
                    name: "Booking With Hours".to_string(),
                    status: ScenarioStatus::Failed,
                    checks: vec![CheckState::failed(
                        "Booking Hours Saved",
                        "Expected 3 hours, got 1",
                    )],
                    duration_ms: Some(2000),
                },
                ScenarioReport {
                    name: "Stats Section CMS".to_string(),
                    status: ScenarioStatus::Skipped {
                        reason: "admin login did not yield a token".to_string(),
                    },
                    checks: vec![],
                    duration_ms: None,
                },
            ],
        };

        let xml = generate_junit_xml(&results).expect("Failed to generate XML");

        assert!(xml.contains(r#"<testsuites name="studio-api-tester-run""#));
        assert!(xml.contains(r#"tests="3""#));
        assert!(xml.contains(r#"failures="1""#));
        assert!(xml.contains(r#"skipped="1""#));
        assert!(xml.contains(r#"<testcase name="Admin Authentication""#));
        assert!(xml.contains(r#"message="Expected 3 hours, got 1""#));
        assert!(xml.contains(r#"<skipped message="admin login did not yield a token""#));
    }
}
