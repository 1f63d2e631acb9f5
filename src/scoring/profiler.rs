// Risk profiler — orchestrates scoring for a single message.
//
// Two entry points with different depth:
// - `classify` is the cheap triage pass: flat rule matches plus sentiment,
//   collapsed into a Safe / Suspicious / High Risk call.
// - `analyze` is the full profile: categorized matches, the additive risk
//   score, a plain-language explanation, and a THREAT_DETECTED audit event
//   when the score crosses the detection threshold.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::audit::{AuditLog, RequestContext};
use crate::patterns::{PatternCatalog, ThreatCategory};
use crate::scoring::risk::{self, RiskLevel, RiskWeights};
use crate::scoring::severity::Severity;
use crate::sentiment::{SentimentScore, SentimentScorer};

/// Minimum risk score at which analysis records a THREAT_DETECTED event.
pub const DETECTION_THRESHOLD: f64 = 30.0;

/// Result of the triage pass over a single message.
#[derive(Debug, Clone, Copy)]
pub struct Classification {
    pub severity: Severity,
    pub match_count: u32,
    pub sentiment: SentimentScore,
}

/// Full risk profile for a single message.
#[derive(Debug, Clone, Serialize)]
pub struct RiskProfile {
    /// Match counts per category, zero counts included.
    pub threat_scores: BTreeMap<ThreatCategory, u32>,
    pub sentiment_compound: f64,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub explanation: String,
}

/// Triage a single message: flat rule matches plus sentiment.
pub async fn classify(
    catalog: &PatternCatalog,
    scorer: &dyn SentimentScorer,
    text: &str,
) -> Result<Classification> {
    let match_count = catalog.match_flat(text);
    let sentiment = scorer.score(text).await?;
    let severity = Severity::from_signals(match_count, sentiment.compound);

    Ok(Classification {
        severity,
        match_count,
        sentiment,
    })
}

/// Build the full risk profile for a single message.
///
/// Records a THREAT_DETECTED audit event when the risk score reaches the
/// detection threshold. A failed audit write fails the whole analysis.
pub async fn analyze(
    catalog: &PatternCatalog,
    scorer: &dyn SentimentScorer,
    weights: &RiskWeights,
    audit: &AuditLog,
    ctx: &RequestContext,
    message_id: &str,
    text: &str,
) -> Result<RiskProfile> {
    // Step 1: Count matches per category
    let threat_scores = catalog.match_categories(text);

    // Step 2: Score sentiment
    let sentiment = scorer.score(text).await?;

    // Step 3: Compute the risk score and level
    let (risk_score, risk_level) =
        risk::compute_risk_score(&threat_scores, sentiment.compound, weights);
    let explanation = risk::build_explanation(&threat_scores, sentiment.compound, risk_level);

    info!(
        message_id = message_id,
        risk = format!("{:.1}", risk_score),
        level = risk_level.as_str(),
        compound = format!("{:.2}", sentiment.compound),
        "Profiled message"
    );

    // Step 4: Record a threat event once the score crosses the threshold
    if risk_score >= DETECTION_THRESHOLD {
        audit.log_threat_detection(ctx, message_id, &threat_scores, sentiment.compound, risk_score)?;
    }

    Ok(RiskProfile {
        threat_scores,
        sentiment_compound: sentiment.compound,
        risk_score,
        risk_level,
        explanation,
    })
}

/// Record a failed message analysis and wrap the error with context.
///
/// The ERROR audit event is best-effort: a second failure while reporting
/// the first is logged and dropped, and the original error is returned.
pub fn report_analysis_failure(
    audit: &AuditLog,
    ctx: &RequestContext,
    message_id: &str,
    err: anyhow::Error,
) -> anyhow::Error {
    warn!(error = %err, message_id = message_id, "Message analysis failed");
    if let Err(log_err) = audit.log_error(ctx, "THREAT_ANALYSIS_ERROR", &err) {
        warn!(error = %log_err, "Failed to record error event");
    }
    err.context(format!("Analysis failed for message {message_id}"))
}
