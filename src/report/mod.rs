pub mod json;
pub mod junit;
pub mod types;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Regenerate a report from a persisted results file
pub async fn generate_report(
    results_path: &Path,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let raw = std::fs::read_to_string(results_path)?;
    let results: types::TestResults = serde_json::from_str(&raw)?;

    match format {
        "json" => json::generate(&results, output).await,
        "junit" => junit::generate(&results, output).await,
        _ => anyhow::bail!("Unknown format: {}", format),
    }
}

/// Persist run results into the output directory
pub fn write_results(results: &types::TestResults, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join("api_test_results.json");
    std::fs::write(&path, serde_json::to_string_pretty(results)?)?;
    Ok(path)
}
