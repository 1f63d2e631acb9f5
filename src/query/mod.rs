// Audit log queries — read-side of the pipeline.
//
// Queries work directly off the segment files so they see everything ever
// written, not just what the current process recorded. Lines that fail to
// parse are counted and skipped; one corrupt line must not hide a day of
// events.

use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::audit::{open_segment, segment_path, AuditError, AuditEvent, EventType};

/// Event counts for a single day's segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total_events: u64,
    /// Events of type THREAT_DETECTED.
    pub threat_events: u64,
    /// Events of type ERROR.
    pub error_events: u64,
    /// Lines that could not be parsed as events.
    pub malformed_lines: u64,
}

/// Tally the given day's segment. A missing segment yields zero counts.
pub fn summarize(dir: &Path, date: NaiveDate) -> Result<DailySummary, AuditError> {
    let mut summary = DailySummary {
        date,
        total_events: 0,
        threat_events: 0,
        error_events: 0,
        malformed_lines: 0,
    };

    let file = match open_segment(dir, date)? {
        Some(file) => file,
        None => return Ok(summary),
    };

    let reader = BufReader::new(file);
    for line in reader.lines() {
        let line = line.map_err(|source| AuditError::Read {
            path: segment_path(dir, date),
            source,
        })?;
        match serde_json::from_str::<AuditEvent>(&line) {
            Ok(event) => {
                summary.total_events += 1;
                match event.event_type {
                    EventType::ThreatDetected => summary.threat_events += 1,
                    EventType::Error => summary.error_events += 1,
                    _ => {}
                }
            }
            Err(e) => {
                summary.malformed_lines += 1;
                debug!(error = %e, "Skipped malformed audit line");
            }
        }
    }

    Ok(summary)
}
