use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy.
pub struct Config {
    /// Directory for audit segment files (CHAPERONE_LOG_DIR, default ./audit_logs)
    pub log_dir: PathBuf,
    /// VADER-compatible sentiment scoring endpoint (SENTIMENT_API_URL)
    pub sentiment_api_url: String,
    /// Reviewer identity recorded on audit events (CHAPERONE_USER)
    pub user: Option<String>,
    /// Cap on tracked sessions (CHAPERONE_SESSION_CAPACITY).
    /// When unset, the audit log's built-in default applies.
    pub session_capacity: Option<usize>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Only the sentiment endpoint has no default — `summary` and `status`
    /// work without it, scanning does not.
    pub fn load() -> Result<Self> {
        Ok(Self {
            log_dir: env::var("CHAPERONE_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./audit_logs")),
            sentiment_api_url: env::var("SENTIMENT_API_URL").unwrap_or_default(),
            user: env::var("CHAPERONE_USER").ok(),
            session_capacity: env::var("CHAPERONE_SESSION_CAPACITY")
                .ok()
                .and_then(|value| value.parse().ok()),
        })
    }

    /// Check that the sentiment endpoint is configured.
    /// Call this before any operation that scores messages.
    pub fn require_sentiment(&self) -> Result<()> {
        if self.sentiment_api_url.is_empty() {
            anyhow::bail!(
                "SENTIMENT_API_URL not set. Add it to your .env file.\n\
                 Any VADER-compatible scoring endpoint works."
            );
        }
        Ok(())
    }
}
