use serde::{Deserialize, Serialize};

use crate::runner::state::{RunSummary, ScenarioReport, SessionState};

/// Persisted results for a full test run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResults {
    pub session_id: String,
    pub base_url: String,
    pub generated_at: String,
    pub summary: RunSummary,
    pub scenarios: Vec<ScenarioReport>,
}

impl TestResults {
    pub fn from_session(session: &SessionState) -> Self {
        Self {
            session_id: session.session_id.clone(),
            base_url: session.base_url.clone(),
            generated_at: chrono::Local::now().to_rfc3339(),
            summary: session.summary(),
            scenarios: session.to_reports(),
        }
    }
}
