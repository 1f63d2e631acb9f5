// Colored terminal output for scan reports and audit views.
//
// This module handles all terminal-specific formatting: colors, tables,
// section headers. The main.rs display functions delegate here.

use colored::Colorize;

use crate::audit::SessionRecord;
use crate::pipeline::scan::ClassifiedMessage;
use crate::query::DailySummary;
use crate::scoring::{Classification, RiskLevel, RiskProfile, Severity};

/// Display the flagged messages from a scan, one colored line each.
pub fn display_flagged(rows: &[ClassifiedMessage]) {
    let flagged: Vec<&ClassifiedMessage> = rows
        .iter()
        .filter(|row| row.classification.severity.is_flagged())
        .collect();

    println!("\n--- Flagged Messages ---\n");
    if flagged.is_empty() {
        println!("{}", "No flagged messages found!".green());
        return;
    }

    for row in &flagged {
        let line = format!(
            "ID: {} | Severity: {} | Matches: {} | Message: {} (Compound Sentiment: {:.2})",
            row.message.id,
            row.classification.severity,
            row.classification.match_count,
            super::truncate_chars(&row.message.text, 120),
            row.classification.sentiment.compound,
        );
        let colored_line = match row.classification.severity {
            Severity::HighRisk => line.red(),
            Severity::Suspicious => line.yellow(),
            Severity::Safe => line.green(),
        };
        println!("{colored_line}");
    }
}

/// Display the scan distributions: severity, top patterns, sentiment, matches.
pub fn display_distributions(rows: &[ClassifiedMessage]) {
    if rows.is_empty() {
        return;
    }

    println!(
        "\n{}",
        format!("=== Scan Report ({} messages) ===", rows.len()).bold()
    );

    // Severity distribution
    println!("\n  {}", "Severity".dimmed());
    for severity in [Severity::Safe, Severity::Suspicious, Severity::HighRisk] {
        let count = rows
            .iter()
            .filter(|row| row.classification.severity == severity)
            .count();
        println!("    {:<16} {:>4}", severity.as_str(), count);
    }

    // Top detected patterns across flagged messages
    let mut pattern_counts: std::collections::BTreeMap<&str, usize> =
        std::collections::BTreeMap::new();
    for row in rows {
        for &label in &row.pattern_labels {
            *pattern_counts.entry(label).or_insert(0) += 1;
        }
    }
    if !pattern_counts.is_empty() {
        let mut ranked: Vec<(&str, usize)> = pattern_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        println!("\n  {}", "Top patterns".dimmed());
        for (label, count) in ranked.into_iter().take(5) {
            println!("    {:<20} {:>4}", super::truncate_chars(label, 15), count);
        }
    }

    // Sentiment distribution
    println!("\n  {}", "Sentiment".dimmed());
    for bucket in SENTIMENT_BUCKETS {
        let count = rows
            .iter()
            .filter(|row| sentiment_bucket(row.classification.sentiment.compound) == bucket)
            .count();
        println!("    {:<16} {:>4}", bucket, count);
    }

    // Match count distribution
    println!("\n  {}", "Matches".dimmed());
    for bucket in MATCH_BUCKETS {
        let count = rows
            .iter()
            .filter(|row| match_bucket(row.classification.match_count) == bucket)
            .count();
        println!("    {:<16} {:>4}", bucket, count);
    }
    println!();
}

/// Display a single message's full risk profile.
pub fn display_analysis(classification: &Classification, profile: &RiskProfile) {
    println!("\n{}", "=== Risk Profile ===".bold());
    println!(
        "  Severity:   {} ({} flat matches)",
        colorize_severity(classification.severity),
        classification.match_count
    );
    println!(
        "  Sentiment:  compound {:.2} (pos {:.2} / neg {:.2} / neu {:.2})",
        classification.sentiment.compound,
        classification.sentiment.positive,
        classification.sentiment.negative,
        classification.sentiment.neutral,
    );
    println!(
        "  Risk score: {:.1}/100  {}",
        profile.risk_score,
        colorize_level(profile.risk_level)
    );

    println!("\n  Categories:");
    for (category, count) in &profile.threat_scores {
        if *count > 0 {
            println!("    {:<24} {:>2}", category.label(), count);
        } else {
            println!(
                "    {}",
                format!("{:<24} {:>2}", category.label(), count).dimmed()
            );
        }
    }

    println!("\n  {}", profile.explanation);
    println!();
}

/// Display a daily audit summary.
pub fn display_summary(summary: &DailySummary) {
    println!(
        "\n{}",
        format!("=== Audit Summary for {} ===", summary.date).bold()
    );
    println!("  Total events:    {:>5}", summary.total_events);

    let threats = summary.threat_events.to_string();
    if summary.threat_events > 0 {
        println!("  Threat events:   {:>5}", threats.red());
    } else {
        println!("  Threat events:   {:>5}", threats);
    }

    let errors = summary.error_events.to_string();
    if summary.error_events > 0 {
        println!("  Error events:    {:>5}", errors.yellow());
    } else {
        println!("  Error events:    {:>5}", errors);
    }

    if summary.malformed_lines > 0 {
        println!(
            "  {}",
            format!("Malformed lines: {:>5}", summary.malformed_lines).yellow()
        );
    }
    println!();
}

/// Display the active session registry, most recent first.
pub fn display_sessions(sessions: &[SessionRecord]) {
    if sessions.is_empty() {
        return;
    }

    println!(
        "\n{}",
        format!("=== Active Sessions ({}) ===", sessions.len()).bold()
    );
    for record in sessions {
        println!(
            "  {:<36}  {:<12}  {:>4} events  last active {}",
            record.session_id,
            record.user_id,
            record.event_count,
            record.last_activity.format("%H:%M:%S"),
        );
        for event in record.recent_events.iter().rev().take(3) {
            println!(
                "    {}",
                format!(
                    "{} {} {}",
                    event.timestamp.format("%H:%M:%S"),
                    event.event_type,
                    super::truncate_chars(&event.action, 40)
                )
                .dimmed()
            );
        }
    }
    println!();
}

const SENTIMENT_BUCKETS: [&str; 5] = [
    "Very Negative",
    "Negative",
    "Neutral",
    "Positive",
    "Very Positive",
];

fn sentiment_bucket(compound: f64) -> &'static str {
    if compound < -0.6 {
        "Very Negative"
    } else if compound < -0.2 {
        "Negative"
    } else if compound < 0.2 {
        "Neutral"
    } else if compound < 0.6 {
        "Positive"
    } else {
        "Very Positive"
    }
}

const MATCH_BUCKETS: [&str; 4] = ["0 matches", "1 match", "2 matches", "3+ matches"];

fn match_bucket(count: u32) -> &'static str {
    match count {
        0 => "0 matches",
        1 => "1 match",
        2 => "2 matches",
        _ => "3+ matches",
    }
}

/// Colorize a severity verdict.
fn colorize_severity(severity: Severity) -> colored::ColoredString {
    match severity {
        Severity::HighRisk => severity.as_str().red(),
        Severity::Suspicious => severity.as_str().yellow(),
        Severity::Safe => severity.as_str().green(),
    }
}

/// Colorize a risk level.
fn colorize_level(level: RiskLevel) -> colored::ColoredString {
    match level {
        RiskLevel::Critical => level.as_str().red().bold(),
        RiskLevel::High => level.as_str().bright_red(),
        RiskLevel::Medium => level.as_str().yellow(),
        RiskLevel::Low => level.as_str().green(),
        RiskLevel::Minimal => level.as_str().dimmed(),
    }
}
