// Additive risk score formula.
//
// The risk score combines categorized pattern matches and sentiment
// intensity: every match adds points, every distinct category hit adds
// points, and the absolute compound sentiment adds points in proportion
// to its magnitude. Polarity is ignored; strongly positive text carries
// the same sentiment term as strongly negative text.
//
// `score = matches * per_match + categories * per_category
//          + |compound| * sentiment_weight`

use std::collections::BTreeMap;

use crate::patterns::ThreatCategory;

/// Configurable weights for the risk score formula.
pub struct RiskWeights {
    /// Points per pattern match (default 15.0)
    pub per_match: f64,
    /// Points per distinct category with at least one match (default 10.0)
    pub per_category: f64,
    /// Multiplier on the absolute compound sentiment (default 20.0).
    /// A compound of -1.0 or 1.0 contributes 20 points.
    pub sentiment_weight: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            per_match: 15.0,
            per_category: 10.0,
            sentiment_weight: 20.0,
        }
    }
}

/// Risk level thresholds — these are configurable constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RiskLevel {
    Minimal,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Determine the level from a risk score (0-100).
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 70.0 => RiskLevel::Critical,
            s if s >= 50.0 => RiskLevel::High,
            s if s >= 30.0 => RiskLevel::Medium,
            s if s >= 15.0 => RiskLevel::Low,
            _ => RiskLevel::Minimal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Minimal => "Minimal",
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compute the risk score from per-category match counts and compound
/// sentiment.
///
/// Returns a score from 0.0 to 100.0, rounded to one decimal place, and the
/// corresponding risk level.
pub fn compute_risk_score(
    threat_scores: &BTreeMap<ThreatCategory, u32>,
    compound: f64,
    weights: &RiskWeights,
) -> (f64, RiskLevel) {
    let total_matches: u32 = threat_scores.values().sum();
    let categories_hit = threat_scores.values().filter(|&&c| c > 0).count();

    let sentiment_term = compound.abs() * weights.sentiment_weight;
    let raw = f64::from(total_matches) * weights.per_match
        + categories_hit as f64 * weights.per_category
        + sentiment_term;

    // Cap at 100, then round to one decimal place
    let score = (raw.min(100.0) * 10.0).round() / 10.0;
    let level = RiskLevel::from_score(score);

    (score, level)
}

/// Build the plain-language explanation shown next to a risk score.
///
/// Clauses are accumulated in a fixed order (categories, sentiment, level)
/// and joined into sentences. Minimal-level results get no level clause.
pub fn build_explanation(
    threat_scores: &BTreeMap<ThreatCategory, u32>,
    compound: f64,
    level: RiskLevel,
) -> String {
    let mut clauses: Vec<String> = Vec::new();

    let hit: Vec<&str> = threat_scores
        .iter()
        .filter(|(_, &count)| count > 0)
        .map(|(category, _)| category.label())
        .collect();
    if !hit.is_empty() {
        clauses.push(format!("Matched patterns in categories: {}", hit.join(", ")));
    }

    if compound <= -0.5 {
        clauses.push("Message sentiment is highly negative".to_string());
    } else if compound <= -0.2 {
        clauses.push("Message sentiment is negative".to_string());
    }

    let level_clause = match level {
        RiskLevel::Critical => Some("Immediate review is strongly recommended"),
        RiskLevel::High => Some("Prompt review is recommended"),
        RiskLevel::Medium => Some("Review is recommended"),
        RiskLevel::Low => Some("Minor risk indicators are present"),
        RiskLevel::Minimal => None,
    };
    if let Some(clause) = level_clause {
        clauses.push(clause.to_string());
    }

    if clauses.is_empty() {
        "No risk factors identified.".to_string()
    } else {
        format!("{}.", clauses.join(". "))
    }
}
