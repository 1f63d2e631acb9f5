// Audit event types.
//
// Every security-relevant operation produces one AuditEvent, serialized as a
// single JSON line in the day's segment file. The serde renames are part of
// the log format and must not change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Types of events that can be recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    FileUpload,
    AnalysisStart,
    AnalysisComplete,
    ThreatDetected,
    ThreatViewed,
    AdminAction,
    Error,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::FileUpload => "FILE_UPLOAD",
            EventType::AnalysisStart => "ANALYSIS_START",
            EventType::AnalysisComplete => "ANALYSIS_COMPLETE",
            EventType::ThreatDetected => "THREAT_DETECTED",
            EventType::ThreatViewed => "THREAT_VIEWED",
            EventType::AdminAction => "ADMIN_ACTION",
            EventType::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity recorded on an audit event.
///
/// This is the event taxonomy, not the message triage verdict: a
/// THREAT_DETECTED event carries a severity derived from the risk score,
/// while routine events default to Low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EventSeverity {
    /// Severity for a THREAT_DETECTED event with the given risk score.
    pub fn for_risk_score(score: f64) -> Self {
        match score {
            s if s >= 70.0 => EventSeverity::Critical,
            s if s >= 50.0 => EventSeverity::High,
            _ => EventSeverity::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventSeverity::Low => "low",
            EventSeverity::Medium => "medium",
            EventSeverity::High => "high",
            EventSeverity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for EventSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether the audited operation succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Error,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Error => "error",
        }
    }
}

/// Caller identity attached to every event a request produces.
///
/// Everything is optional: a missing user is recorded as "anonymous" and a
/// missing session gets a fresh id, so correlation across a batch only works
/// when the caller supplies a session id up front.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestContext {
    /// Context with no identity at all.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context for a known user, without a session yet.
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }
}

/// A single record in the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique identifier for this event.
    pub event_id: Uuid,
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
    pub event_type: EventType,
    pub severity: EventSeverity,
    /// The user who performed the action ("anonymous" if unknown).
    pub user_id: String,
    /// Session the event belongs to.
    pub session_id: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    /// Human-readable description of the action.
    pub action: String,
    /// The resource acted on (a filename, message id, or batch name).
    pub resource: String,
    pub outcome: Outcome,
    /// Event-specific details.
    pub details: serde_json::Map<String, serde_json::Value>,
    /// Risk score, present only on THREAT_DETECTED events.
    pub risk_score: Option<f64>,
}
