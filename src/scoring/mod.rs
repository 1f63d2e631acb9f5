// Risk scoring — the additive risk formula, severity triage, and the
// profiler that ties pattern matching and sentiment together.

pub mod profiler;
pub mod risk;
pub mod severity;

pub use profiler::{analyze, classify, Classification, RiskProfile, DETECTION_THRESHOLD};
pub use risk::{build_explanation, compute_risk_score, RiskLevel, RiskWeights};
pub use severity::Severity;
