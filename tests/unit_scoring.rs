// Unit tests for scoring and output functions.
//
// Tests isolated pure functions: RiskLevel::from_score boundary conditions,
// Severity::from_signals triage, EventSeverity::for_risk_score, custom
// risk weights, and truncate_chars UTF-8 safety.

use std::collections::BTreeMap;

use chaperone::audit::EventSeverity;
use chaperone::output::truncate_chars;
use chaperone::patterns::ThreatCategory;
use chaperone::scoring::{
    build_explanation, compute_risk_score, RiskLevel, RiskWeights, Severity, DETECTION_THRESHOLD,
};

fn counts(entries: &[(ThreatCategory, u32)]) -> BTreeMap<ThreatCategory, u32> {
    entries.iter().copied().collect()
}

// ============================================================
// RiskLevel::from_score — boundary conditions
// ============================================================

#[test]
fn level_exact_boundary_critical() {
    assert_eq!(RiskLevel::from_score(70.0), RiskLevel::Critical);
}

#[test]
fn level_just_below_critical() {
    assert_eq!(RiskLevel::from_score(69.9), RiskLevel::High);
}

#[test]
fn level_exact_boundary_high() {
    assert_eq!(RiskLevel::from_score(50.0), RiskLevel::High);
}

#[test]
fn level_just_below_high() {
    assert_eq!(RiskLevel::from_score(49.9), RiskLevel::Medium);
}

#[test]
fn level_exact_boundary_medium() {
    assert_eq!(RiskLevel::from_score(30.0), RiskLevel::Medium);
}

#[test]
fn level_just_below_medium() {
    assert_eq!(RiskLevel::from_score(29.9), RiskLevel::Low);
}

#[test]
fn level_exact_boundary_low() {
    assert_eq!(RiskLevel::from_score(15.0), RiskLevel::Low);
}

#[test]
fn level_just_below_low() {
    assert_eq!(RiskLevel::from_score(14.9), RiskLevel::Minimal);
}

#[test]
fn level_zero() {
    assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Minimal);
}

#[test]
fn level_maximum() {
    assert_eq!(RiskLevel::from_score(100.0), RiskLevel::Critical);
}

#[test]
fn level_negative() {
    assert_eq!(RiskLevel::from_score(-5.0), RiskLevel::Minimal);
}

#[test]
fn level_nan_falls_to_minimal() {
    // NaN fails all >= comparisons, so it falls through to the wildcard arm
    assert_eq!(RiskLevel::from_score(f64::NAN), RiskLevel::Minimal);
}

// ============================================================
// RiskLevel round-trip: from_score -> as_str -> Display
// ============================================================

#[test]
fn level_as_str_all_variants() {
    assert_eq!(RiskLevel::Minimal.as_str(), "Minimal");
    assert_eq!(RiskLevel::Low.as_str(), "Low");
    assert_eq!(RiskLevel::Medium.as_str(), "Medium");
    assert_eq!(RiskLevel::High.as_str(), "High");
    assert_eq!(RiskLevel::Critical.as_str(), "Critical");
}

#[test]
fn level_display_matches_as_str() {
    for level in [
        RiskLevel::Minimal,
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Critical,
    ] {
        assert_eq!(level.to_string(), level.as_str());
    }
}

#[test]
fn level_round_trip_score_to_string() {
    let cases = [
        (5.0, "Minimal"),
        (20.0, "Low"),
        (40.0, "Medium"),
        (60.0, "High"),
        (85.0, "Critical"),
    ];
    for (score, expected_str) in cases {
        let level = RiskLevel::from_score(score);
        assert_eq!(
            level.as_str(),
            expected_str,
            "Score {score} should map to {expected_str}"
        );
    }
}

// ============================================================
// Severity::from_signals — triage table
// ============================================================

#[test]
fn two_matches_is_high_risk() {
    assert_eq!(Severity::from_signals(2, 0.0), Severity::HighRisk);
}

#[test]
fn many_matches_is_high_risk_despite_positive_sentiment() {
    assert_eq!(Severity::from_signals(5, 0.9), Severity::HighRisk);
}

#[test]
fn one_match_is_suspicious() {
    assert_eq!(Severity::from_signals(1, 0.9), Severity::Suspicious);
}

#[test]
fn no_matches_strongly_negative_is_suspicious() {
    // Boundary: compound of exactly -0.5 counts as strongly negative
    assert_eq!(Severity::from_signals(0, -0.5), Severity::Suspicious);
    assert_eq!(Severity::from_signals(0, -0.6), Severity::Suspicious);
}

#[test]
fn no_matches_mildly_negative_is_safe() {
    assert_eq!(Severity::from_signals(0, -0.49), Severity::Safe);
}

#[test]
fn no_matches_positive_is_safe() {
    assert_eq!(Severity::from_signals(0, 0.1), Severity::Safe);
}

#[test]
fn flagged_excludes_only_safe() {
    assert!(!Severity::Safe.is_flagged());
    assert!(Severity::Suspicious.is_flagged());
    assert!(Severity::HighRisk.is_flagged());
}

#[test]
fn severity_display_matches_as_str() {
    let cases = [
        (Severity::Safe, "Safe"),
        (Severity::Suspicious, "Suspicious"),
        (Severity::HighRisk, "High Risk"),
    ];
    for (severity, expected) in cases {
        assert_eq!(severity.as_str(), expected);
        assert_eq!(severity.to_string(), expected);
    }
}

// ============================================================
// EventSeverity::for_risk_score — audit event taxonomy
// ============================================================

#[test]
fn event_severity_critical_at_70() {
    assert_eq!(EventSeverity::for_risk_score(70.0), EventSeverity::Critical);
    assert_eq!(EventSeverity::for_risk_score(75.0), EventSeverity::Critical);
}

#[test]
fn event_severity_high_band() {
    assert_eq!(EventSeverity::for_risk_score(69.9), EventSeverity::High);
    assert_eq!(EventSeverity::for_risk_score(50.0), EventSeverity::High);
}

#[test]
fn event_severity_floor_is_medium() {
    // A THREAT_DETECTED event is never less than medium, even for scores
    // a risk profile would call Minimal
    assert_eq!(EventSeverity::for_risk_score(49.9), EventSeverity::Medium);
    assert_eq!(EventSeverity::for_risk_score(0.0), EventSeverity::Medium);
}

#[test]
fn event_severity_ladder_diverges_from_risk_level() {
    // The profile ladder and the event ladder agree at the top but not at
    // the bottom: 40 is Medium on both, while 10 profiles as Minimal but
    // would still log as medium if an event were emitted for it.
    assert_eq!(RiskLevel::from_score(40.0), RiskLevel::Medium);
    assert_eq!(EventSeverity::for_risk_score(40.0), EventSeverity::Medium);
    assert_eq!(RiskLevel::from_score(10.0), RiskLevel::Minimal);
    assert_eq!(EventSeverity::for_risk_score(10.0), EventSeverity::Medium);
}

#[test]
fn event_severity_is_ordered() {
    assert!(EventSeverity::Low < EventSeverity::Medium);
    assert!(EventSeverity::Medium < EventSeverity::High);
    assert!(EventSeverity::High < EventSeverity::Critical);
}

// ============================================================
// compute_risk_score — custom weights
// ============================================================

#[test]
fn custom_weights_zero_produces_zero() {
    let w = RiskWeights {
        per_match: 0.0,
        per_category: 0.0,
        sentiment_weight: 0.0,
    };
    let scores = counts(&[(ThreatCategory::Grooming, 3), (ThreatCategory::Coercion, 2)]);
    let (score, level) = compute_risk_score(&scores, -1.0, &w);
    assert_eq!(score, 0.0);
    assert_eq!(level, RiskLevel::Minimal);
}

#[test]
fn custom_weights_heavier_per_match() {
    let w = RiskWeights {
        per_match: 50.0,
        per_category: 10.0,
        sentiment_weight: 20.0,
    };
    let scores = counts(&[(ThreatCategory::Isolation, 1)]);
    let (score, level) = compute_risk_score(&scores, 0.0, &w);
    // 1 * 50 + 1 * 10 + 0 = 60.0
    assert!((score - 60.0).abs() < 0.001, "Expected 60.0, got {score}");
    assert_eq!(level, RiskLevel::High);
}

#[test]
fn custom_sentiment_weight_scales_penalty() {
    let w = RiskWeights {
        per_match: 15.0,
        per_category: 10.0,
        sentiment_weight: 100.0,
    };
    let (score, level) = compute_risk_score(&BTreeMap::new(), -0.8, &w);
    // 0 + 0 + 0.8 * 100 = 80.0
    assert!((score - 80.0).abs() < 0.001, "Expected 80.0, got {score}");
    assert_eq!(level, RiskLevel::Critical);
}

#[test]
fn default_weights_match_documented_values() {
    let w = RiskWeights::default();
    assert_eq!(w.per_match, 15.0);
    assert_eq!(w.per_category, 10.0);
    assert_eq!(w.sentiment_weight, 20.0);
}

#[test]
fn detection_threshold_sits_on_medium_boundary() {
    assert_eq!(DETECTION_THRESHOLD, 30.0);
    assert_eq!(
        RiskLevel::from_score(DETECTION_THRESHOLD),
        RiskLevel::Medium
    );
}

// ============================================================
// compute_risk_score — zero-count categories carry no weight
// ============================================================

#[test]
fn zero_count_categories_do_not_score() {
    let weights = RiskWeights::default();
    // All five categories present, only one with a match
    let mut scores = counts(&[]);
    for category in ThreatCategory::all() {
        scores.insert(category, 0);
    }
    scores.insert(ThreatCategory::Coercion, 1);

    let (score, _) = compute_risk_score(&scores, 0.0, &weights);
    // 1 * 15 + 1 * 10 = 25.0 — the four zero categories add nothing
    assert!((score - 25.0).abs() < 0.001, "Expected 25.0, got {score}");
}

// ============================================================
// compute_risk_score — range and monotonicity
// ============================================================

#[test]
fn score_is_monotonic_in_match_count() {
    let weights = RiskWeights::default();
    let mut previous = -1.0;
    for n in 0..12u32 {
        let scores = counts(&[(ThreatCategory::Grooming, n)]);
        let (score, _) = compute_risk_score(&scores, -0.3, &weights);
        assert!(
            score >= previous,
            "Score fell from {previous} to {score} at {n} matches"
        );
        assert!((0.0..=100.0).contains(&score), "Out of range: {score}");
        previous = score;
    }
}

// ============================================================
// build_explanation — level clause wording
// ============================================================

#[test]
fn explanation_low_level_names_minor_indicators() {
    let scores = counts(&[(ThreatCategory::Grooming, 1)]);
    let text = build_explanation(&scores, 0.2, RiskLevel::Low);
    assert_eq!(
        text,
        "Matched patterns in categories: grooming. Minor risk indicators are present."
    );
}

#[test]
fn explanation_critical_level_urges_immediate_review() {
    let scores = counts(&[
        (ThreatCategory::Isolation, 2),
        (ThreatCategory::InappropriateRequests, 1),
    ]);
    let text = build_explanation(&scores, -0.3, RiskLevel::Critical);
    assert!(
        text.ends_with("Immediate review is strongly recommended."),
        "Missing critical clause: {text}"
    );
    assert!(text.contains("Message sentiment is negative"));
}

#[test]
fn explanation_minimal_with_no_factors_uses_fallback() {
    let text = build_explanation(&counts(&[]), 0.0, RiskLevel::Minimal);
    assert_eq!(text, "No risk factors identified.");
}

// ============================================================
// truncate_chars — UTF-8 safe truncation
// ============================================================

#[test]
fn truncate_empty_string() {
    assert_eq!(truncate_chars("", 10), "");
}

#[test]
fn truncate_within_limit() {
    assert_eq!(truncate_chars("hello", 10), "hello");
}

#[test]
fn truncate_one_over_limit() {
    assert_eq!(truncate_chars("hello!", 5), "hello...");
}

#[test]
fn truncate_emoji_safe() {
    // "Hello 🌍!" = 8 chars (emoji is 1 char, 4 bytes)
    let text = "Hello 🌍!";
    assert_eq!(text.chars().count(), 8);
    let result = truncate_chars(text, 7);
    assert_eq!(result, "Hello 🌍...");
}

#[test]
fn truncate_cjk_characters() {
    let text = "日本語テスト";
    assert_eq!(text.chars().count(), 6);
    let result = truncate_chars(text, 3);
    assert_eq!(result, "日本語...");
}

#[test]
fn truncate_long_string() {
    let text = "a".repeat(200);
    let result = truncate_chars(&text, 120);
    assert_eq!(result.chars().count(), 123); // 120 + "..."
    assert!(result.ends_with("..."));
}
