// Severity triage.
//
// A coarse three-way call made from the flat rule table plus compound
// sentiment. This runs on every message; the full risk profile is only
// computed for messages that get flagged here.

use serde::{Deserialize, Serialize};

/// Triage outcome for a single message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Safe,
    Suspicious,
    HighRisk,
}

impl Severity {
    /// Determine severity from the flat match count and compound sentiment.
    ///
    /// Two or more matches is high risk outright. A single match, or no
    /// matches with strongly negative sentiment, is suspicious. Everything
    /// else is safe.
    pub fn from_signals(match_count: u32, compound: f64) -> Self {
        if match_count >= 2 {
            Severity::HighRisk
        } else if match_count == 1 || compound <= -0.5 {
            Severity::Suspicious
        } else {
            Severity::Safe
        }
    }

    /// Whether this severity marks the message for review.
    pub fn is_flagged(&self) -> bool {
        !matches!(self, Severity::Safe)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Safe => "Safe",
            Severity::Suspicious => "Suspicious",
            Severity::HighRisk => "High Risk",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
