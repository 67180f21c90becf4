pub mod harness;
pub mod state;

pub use harness::Harness;
pub use state::*;

use anyhow::Result;
use colored::Colorize;

use crate::report::{self, types::TestResults};
use crate::scenarios;
use crate::utils::config::HarnessConfig;

/// Run the scenario groups in order against the backend.
///
/// Scenarios never fail-fast; a failing check only marks its own entry.
/// Returns `true` when every recorded check passed.
pub async fn run_scenarios(
    config: &HarnessConfig,
    only: Option<Vec<String>>,
    junit: bool,
) -> Result<bool> {
    let mut harness = Harness::new(config);
    harness.start();

    println!(
        "\n{} Test session started: {}",
        "▶".green().bold(),
        harness.session_id().cyan()
    );

    let selected = |name: &str| {
        only.as_ref()
            .map_or(true, |names| names.iter().any(|n| n.eq_ignore_ascii_case(name)))
    };

    if selected("auth") {
        scenarios::auth::run(&mut harness, config).await;
    }
    if selected("health") {
        scenarios::health::run(&mut harness).await;
    }
    if selected("cms") {
        scenarios::cms::run(&mut harness).await;
    }
    if selected("applications") {
        scenarios::applications::run(&mut harness).await;
    }
    if selected("otp") {
        scenarios::otp::run(&mut harness, config).await;
    }
    if selected("bookings") {
        scenarios::bookings::run(&mut harness).await;
    }

    harness.finish();

    let results = TestResults::from_session(harness.session());
    let results_path = report::write_results(&results, &config.output_dir)?;
    if junit {
        report::junit::write_report(&results, &config.output_dir)?;
    }

    print_summary(&results.summary);
    println!("  Results: {}", results_path.display().to_string().cyan());

    Ok(results.summary.tests_failed == 0)
}

fn print_summary(summary: &RunSummary) {
    println!("\n{} Test session finished", "■".blue().bold());
    println!("  Tests run: {}", summary.tests_run);
    println!(
        "  {} passed, {} failed, {} skipped",
        summary.tests_passed.to_string().green(),
        summary.tests_failed.to_string().red(),
        summary.tests_skipped.to_string().yellow()
    );
    println!("  Success rate: {:.1}%", summary.success_rate);
    if let Some(duration) = summary.total_duration_ms {
        println!("  Duration: {}ms", duration);
    }
}
