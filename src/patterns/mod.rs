// Pattern catalog — the fixed regex rule sets for grooming-tactic detection.

pub mod catalog;

pub use catalog::{PatternCatalog, ThreatCategory};
