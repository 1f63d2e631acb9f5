// Compiled regex rule sets for grooming-tactic detection.
//
// Two independent rule tables are kept: a categorized table used for risk
// profiling (per-category match counts feed the risk score) and a flat table
// used for quick severity triage. The tables overlap but are not identical,
// so a message can trip one and not the other.

use std::collections::BTreeMap;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Tactic family a categorized rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatCategory {
    Grooming,
    Isolation,
    Coercion,
    InappropriateRequests,
    MeetingRequests,
}

impl ThreatCategory {
    pub fn all() -> [ThreatCategory; 5] {
        [
            ThreatCategory::Grooming,
            ThreatCategory::Isolation,
            ThreatCategory::Coercion,
            ThreatCategory::InappropriateRequests,
            ThreatCategory::MeetingRequests,
        ]
    }

    /// Stable identifier, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatCategory::Grooming => "grooming",
            ThreatCategory::Isolation => "isolation",
            ThreatCategory::Coercion => "coercion",
            ThreatCategory::InappropriateRequests => "inappropriate_requests",
            ThreatCategory::MeetingRequests => "meeting_requests",
        }
    }

    /// Human-readable name for reports.
    pub fn label(&self) -> &'static str {
        match self {
            ThreatCategory::Grooming => "grooming",
            ThreatCategory::Isolation => "isolation",
            ThreatCategory::Coercion => "coercion",
            ThreatCategory::InappropriateRequests => "inappropriate requests",
            ThreatCategory::MeetingRequests => "meeting requests",
        }
    }
}

impl std::fmt::Display for ThreatCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Categorized rules, five per tactic family. Counting is binary per rule:
// a rule contributes at most one match no matter how often it fires.
const CATEGORIZED_RULES: &[(ThreatCategory, &str)] = &[
    // Flattery and trust-building
    (ThreatCategory::Grooming, r"you'?re\s+so\s+(mature|grown\s+up)"),
    (
        ThreatCategory::Grooming,
        r"you'?re\s+so\s+beautiful\s+for\s+your\s+age",
    ),
    (ThreatCategory::Grooming, r"age.*doesn'?t\s+matter"),
    (ThreatCategory::Grooming, r"i.*like.*you.*(so much|a lot)"),
    (ThreatCategory::Grooming, r"you\s+can\s+trust\s+me"),
    // Secrecy pressure
    (ThreatCategory::Isolation, r"don'?t\s+tell"),
    (ThreatCategory::Isolation, r"keep.*between\s+us"),
    (ThreatCategory::Isolation, r"just\s+between\s+us"),
    (ThreatCategory::Isolation, r"(it'?s|this\s+is)\s+our.*secret"),
    (ThreatCategory::Isolation, r"nobody\s+will\s+know"),
    // Obligation and threat framing
    (ThreatCategory::Coercion, r"you\s+owe\s+me"),
    (ThreatCategory::Coercion, r"it\s+won'?t\s+hurt"),
    (
        ThreatCategory::Coercion,
        r"if\s+you\s+tell\s+anyone\s+we\s+can'?t\s+talk",
    ),
    (ThreatCategory::Coercion, r"promise.*won'?t.*tell"),
    (ThreatCategory::Coercion, r"won'?t\s+get\s+caught"),
    // Requests for images or physical contact
    (
        ThreatCategory::InappropriateRequests,
        r"send.*(pic|photo|picture)",
    ),
    (ThreatCategory::InappropriateRequests, r"what.*wearing"),
    (ThreatCategory::InappropriateRequests, r"(touch|touching)"),
    (ThreatCategory::InappropriateRequests, r"(kiss|kissing)"),
    (
        ThreatCategory::InappropriateRequests,
        r"(undress|take.*clothes.*off|naked|nude)",
    ),
    // Attempts to arrange unsupervised contact
    (ThreatCategory::MeetingRequests, r"(let'?s|lets)\s+meet.*alone"),
    (ThreatCategory::MeetingRequests, r"meet\s+you\s+in\s+person"),
    (ThreatCategory::MeetingRequests, r"come\s+over"),
    (
        ThreatCategory::MeetingRequests,
        r"are\s+your\s+parents\s+(home|around)",
    ),
    (ThreatCategory::MeetingRequests, r"hang\s+out\s+just\s+us"),
];

// Flat triage rules. This list predates the categorized table and is kept
// broader on purpose, including single-word tripwires like "secret".
const FLAT_RULES: &[&str] = &[
    r"don'?t\s+tell",
    r"keep.*between\s+us",
    r"only\s+between\s+us",
    r"(secret|private|special)\s+(chat|talk)?",
    r"(just|only)\s+you\s+and\s+me",
    r"don't\s+share\s+this\s+with\s+anyone",
    r"it's\s+our\s+little\s+secret",
    r"you're\s+so\s+(mature|grown\s+up)",
    r"you're\s+so\s+beautiful\s+for\s+your\s+age",
    r"(let'?s|lets)\s+meet.*alone",
    r"i\s+want\s+to\s+meet\s+you\s+in\s+person",
    r"are\s+your\s+parents\s+(home|around)",
    r"let'?s\s+hang\s+out\s+just\s+us",
    r"tell\s+me\s+more\s+about\s+your\s+family",
    r"send\s+me\s+a\s+pic",
    r"i\s+can\s+keep\s+secrets",
    r"show\s+me\s+what\s+you're\s+wearing",
    r"you\s+owe\s+me\s+(something|a\s+favor)",
    r"just\s+trust\s+me",
    r"you\s+don't\s+have\s+to\s+tell\s+anyone",
    r"it\s+won'?t\s+hurt",
    r"if\s+you\s+tell\s+anyone\s+we\s+can'?t\s+talk\s+anymore",
    r"i\s+won'?t\s+tell\s+anyone\s+promise",
    r"this\s+is\s+our\s+secret\s+to\s+keep",
    r"secret",
    r"don't tell anyone",
    r"just between us",
    r"you're so mature",
    r"send.*(pic|photo|picture)",
    r"what.*wearing",
    r"come over",
    r"alone.*(meet|see)",
    r"i won.t tell",
    r"you can trust me",
    r"age.*doesn't matter",
    r"it.*our.*secret",
    r"if.*tell.*anyone",
    r"i.*like.*you.*(so much|a lot)",
    r"nobody will know",
    r"this.*is.*between.*us",
    r"promise.*won't.*tell",
    r"(i|we).*won.t.*get.*caught",
    r"(touch|touching)",
    r"(kiss|kissing)",
    r"(undress|take.*clothes.*off|naked|nude)",
];

/// Both rule tables, compiled once at startup.
pub struct PatternCatalog {
    categorized: Vec<(ThreatCategory, Regex)>,
    flat: Vec<(&'static str, Regex)>,
}

impl PatternCatalog {
    pub fn new() -> Self {
        let categorized = CATEGORIZED_RULES
            .iter()
            .map(|(category, pattern)| (*category, compile(pattern)))
            .collect();
        let flat = FLAT_RULES
            .iter()
            .map(|pattern| (*pattern, compile(pattern)))
            .collect();
        Self { categorized, flat }
    }

    /// Per-category match counts against the categorized table. Every
    /// category appears in the result, zero counts included.
    pub fn match_categories(&self, text: &str) -> BTreeMap<ThreatCategory, u32> {
        let mut counts: BTreeMap<ThreatCategory, u32> =
            ThreatCategory::all().iter().map(|c| (*c, 0)).collect();
        for (category, regex) in &self.categorized {
            if regex.is_match(text) {
                *counts.entry(*category).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Labels of the flat rules that fire on the text.
    pub fn flat_matches(&self, text: &str) -> Vec<&'static str> {
        self.flat
            .iter()
            .filter(|(_, regex)| regex.is_match(text))
            .map(|(label, _)| *label)
            .collect()
    }

    /// Number of flat rules that fire on the text.
    pub fn match_flat(&self, text: &str) -> u32 {
        self.flat_matches(text).len() as u32
    }
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("built-in pattern must compile")
}
