use std::path::PathBuf;

/// Harness configuration
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Backend base URL; the `/api` suffix is appended per request
    pub base_url: String,

    /// Admin login email
    pub admin_email: String,

    /// Admin login password
    pub admin_password: String,

    /// Per-request timeout (ms)
    pub request_timeout_ms: u64,

    /// Output directory for reports
    pub output_dir: PathBuf,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: "https://glassmorphic-hub-1.preview.emergentagent.com".to_string(),
            admin_email: "leocelestine.s@gmail.com".to_string(),
            admin_password: "Admin123!".to_string(),
            request_timeout_ms: 10_000,
            output_dir: PathBuf::from("./output"),
        }
    }
}
