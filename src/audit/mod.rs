// Audit pipeline — append-only event log plus live session tracking.
//
// AuditLog is the single entry point: every recorded event is appended to
// the day's JSONL segment first, then folded into the in-memory session
// registry. The typed log_* wrappers fix the action wording and detail
// shapes so call sites cannot drift.

pub mod event;
pub mod segment;
pub mod sessions;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::patterns::ThreatCategory;

pub use event::{AuditEvent, EventSeverity, EventType, Outcome, RequestContext};
pub use segment::{open_segment, segment_path, AuditError, SegmentWriter};
pub use sessions::{
    EventSummary, SessionRecord, SessionRegistry, DEFAULT_SESSION_CAPACITY,
    RECENT_EVENTS_PER_SESSION,
};

/// The audit log: segment writer plus session registry.
pub struct AuditLog {
    writer: SegmentWriter,
    registry: SessionRegistry,
}

impl AuditLog {
    /// Open the audit log rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, AuditError> {
        Self::with_session_capacity(dir, DEFAULT_SESSION_CAPACITY)
    }

    /// Open with an explicit session registry capacity.
    pub fn with_session_capacity(
        dir: impl Into<PathBuf>,
        capacity: usize,
    ) -> Result<Self, AuditError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| AuditError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(Self {
            writer: SegmentWriter::new(dir),
            registry: SessionRegistry::new(capacity),
        })
    }

    /// Directory holding the segment files.
    pub fn dir(&self) -> &Path {
        self.writer.dir()
    }

    /// Record one event: append to the segment, then update the session
    /// registry. Returns the generated event id.
    ///
    /// A context without a user is recorded as "anonymous"; a context
    /// without a session gets a fresh session id for this event only.
    #[allow(clippy::too_many_arguments)]
    pub fn log_event(
        &self,
        ctx: &RequestContext,
        event_type: EventType,
        severity: EventSeverity,
        action: impl Into<String>,
        resource: impl Into<String>,
        outcome: Outcome,
        details: serde_json::Map<String, serde_json::Value>,
        risk_score: Option<f64>,
    ) -> Result<Uuid, AuditError> {
        let event = AuditEvent {
            event_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event_type,
            severity,
            user_id: ctx
                .user_id
                .clone()
                .unwrap_or_else(|| "anonymous".to_string()),
            session_id: ctx
                .session_id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            ip_address: ctx.ip_address.clone(),
            user_agent: ctx.user_agent.clone(),
            action: action.into(),
            resource: resource.into(),
            outcome,
            details,
            risk_score,
        };

        // Durable write first. The registry only sees events that made it
        // to disk.
        self.writer.append(&event)?;
        self.registry.touch(&event);

        debug!(
            event_id = %event.event_id,
            event_type = event.event_type.as_str(),
            session_id = %event.session_id,
            "Recorded audit event"
        );

        Ok(event.event_id)
    }

    /// Record a transcript upload.
    pub fn log_file_upload(
        &self,
        ctx: &RequestContext,
        filename: &str,
        row_count: usize,
    ) -> Result<Uuid, AuditError> {
        let mut details = serde_json::Map::new();
        details.insert("filename".to_string(), json!(filename));
        details.insert("row_count".to_string(), json!(row_count));
        self.log_event(
            ctx,
            EventType::FileUpload,
            EventSeverity::Low,
            "Uploaded chat transcript",
            filename,
            Outcome::Success,
            details,
            None,
        )
    }

    /// Record the start of a batch analysis.
    pub fn log_analysis_start(
        &self,
        ctx: &RequestContext,
        message_count: usize,
    ) -> Result<Uuid, AuditError> {
        let mut details = serde_json::Map::new();
        details.insert("message_count".to_string(), json!(message_count));
        self.log_event(
            ctx,
            EventType::AnalysisStart,
            EventSeverity::Low,
            "Started batch analysis",
            "batch",
            Outcome::Success,
            details,
            None,
        )
    }

    /// Record the completion of a batch analysis.
    pub fn log_analysis_complete(
        &self,
        ctx: &RequestContext,
        message_count: usize,
        flagged_count: usize,
    ) -> Result<Uuid, AuditError> {
        let mut details = serde_json::Map::new();
        details.insert("message_count".to_string(), json!(message_count));
        details.insert("flagged_count".to_string(), json!(flagged_count));
        self.log_event(
            ctx,
            EventType::AnalysisComplete,
            EventSeverity::Low,
            "Completed batch analysis",
            "batch",
            Outcome::Success,
            details,
            None,
        )
    }

    /// Record a detected threat. Event severity is derived from the risk
    /// score, not from the triage verdict.
    pub fn log_threat_detection(
        &self,
        ctx: &RequestContext,
        message_id: &str,
        threat_scores: &BTreeMap<ThreatCategory, u32>,
        sentiment_compound: f64,
        risk_score: f64,
    ) -> Result<Uuid, AuditError> {
        let total_matches: u32 = threat_scores.values().sum();
        let mut details = serde_json::Map::new();
        details.insert(
            "categories".to_string(),
            serde_json::to_value(threat_scores)?,
        );
        details.insert("total_matches".to_string(), json!(total_matches));
        details.insert(
            "sentiment_compound".to_string(),
            json!(sentiment_compound),
        );
        self.log_event(
            ctx,
            EventType::ThreatDetected,
            EventSeverity::for_risk_score(risk_score),
            "Detected threat indicators in message",
            message_id,
            Outcome::Success,
            details,
            Some(risk_score),
        )
    }

    /// Record that a reviewer viewed a flagged message.
    pub fn log_threat_viewed(
        &self,
        ctx: &RequestContext,
        message_id: &str,
    ) -> Result<Uuid, AuditError> {
        self.log_event(
            ctx,
            EventType::ThreatViewed,
            EventSeverity::Low,
            "Viewed flagged message",
            message_id,
            Outcome::Success,
            serde_json::Map::new(),
            None,
        )
    }

    /// Record an administrative action.
    pub fn log_admin_action(
        &self,
        ctx: &RequestContext,
        action: &str,
        resource: &str,
    ) -> Result<Uuid, AuditError> {
        self.log_event(
            ctx,
            EventType::AdminAction,
            EventSeverity::Medium,
            action,
            resource,
            Outcome::Success,
            serde_json::Map::new(),
            None,
        )
    }

    /// Record a processing failure.
    pub fn log_error(
        &self,
        ctx: &RequestContext,
        category: &str,
        error: &anyhow::Error,
    ) -> Result<Uuid, AuditError> {
        let mut details = serde_json::Map::new();
        details.insert("category".to_string(), json!(category));
        details.insert("error".to_string(), json!(format!("{error:#}")));
        self.log_event(
            ctx,
            EventType::Error,
            EventSeverity::Medium,
            "Encountered processing error",
            category,
            Outcome::Error,
            details,
            None,
        )
    }

    /// Snapshot of tracked sessions, most recently active first.
    pub fn active_sessions(&self) -> Vec<SessionRecord> {
        self.registry.snapshot()
    }
}
