// Batch scan pipeline: transcript in -> classified messages out.
//
// This is the main review workflow. Given an uploaded transcript, the
// pipeline:
// 1. Records the upload and the start of the batch in the audit log
// 2. Triages every message (flat rules + sentiment)
// 3. Runs the full risk profile on each flagged message, which records
//    THREAT_DETECTED events for anything over the detection threshold
// 4. Records batch completion with the final counts
//
// Messages whose scoring fails are recorded as ERROR events and skipped;
// one bad message never aborts the batch.

use std::path::Path;

use anyhow::Result;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::audit::{AuditLog, RequestContext};
use crate::ingest::{self, Message};
use crate::patterns::PatternCatalog;
use crate::scoring::profiler::{self, Classification, RiskProfile};
use crate::scoring::risk::RiskWeights;
use crate::sentiment::SentimentScorer;

/// One transcript row and everything the scan learned about it.
pub struct ClassifiedMessage {
    pub message: Message,
    pub classification: Classification,
    /// Labels of the flat rules that fired. Empty unless flagged.
    pub pattern_labels: Vec<&'static str>,
    /// Full risk profile. Present only for flagged messages.
    pub profile: Option<RiskProfile>,
}

/// Run the scan pipeline over a transcript file.
///
/// Returns the scanned messages in transcript order. Failed messages are
/// omitted from the result.
pub async fn run(
    catalog: &PatternCatalog,
    scorer: &dyn SentimentScorer,
    weights: &RiskWeights,
    audit: &AuditLog,
    ctx: &RequestContext,
    transcript: &Path,
    concurrency: usize,
) -> Result<Vec<ClassifiedMessage>> {
    let messages = ingest::read_transcript(transcript)?;
    let total = messages.len();

    let filename = transcript
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| transcript.display().to_string());

    audit.log_file_upload(ctx, &filename, total)?;
    audit.log_analysis_start(ctx, total)?;

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Scanning [{bar:30}] {pos}/{len} ({eta})")
            .unwrap(),
    );

    // Phase 1: Score in parallel — each future does an HTTP sentiment call
    let results: Vec<(usize, String, Result<ClassifiedMessage>)> =
        stream::iter(messages.into_iter().enumerate().map(|(idx, message)| {
            async move {
                let id = message.id.clone();
                let outcome = scan_message(catalog, scorer, weights, audit, ctx, message).await;
                (idx, id, outcome)
            }
        }))
        .buffer_unordered(concurrency)
        .collect()
        .await;

    // Phase 2: Collect sequentially, reporting failures as ERROR events
    let mut scanned: Vec<(usize, ClassifiedMessage)> = Vec::with_capacity(total);
    let mut failed = 0usize;
    for (idx, id, result) in results {
        match result {
            Ok(row) => scanned.push((idx, row)),
            Err(e) => {
                failed += 1;
                profiler::report_analysis_failure(audit, ctx, &id, e);
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    // Restore transcript order lost to buffer_unordered
    scanned.sort_by_key(|(idx, _)| *idx);
    let rows: Vec<ClassifiedMessage> = scanned.into_iter().map(|(_, row)| row).collect();

    let flagged = rows
        .iter()
        .filter(|row| row.classification.severity.is_flagged())
        .count();
    audit.log_analysis_complete(ctx, total, flagged)?;

    info!(
        total = total,
        flagged = flagged,
        failed = failed,
        "Scan complete"
    );

    Ok(rows)
}

/// Triage one message, then profile it if flagged.
async fn scan_message(
    catalog: &PatternCatalog,
    scorer: &dyn SentimentScorer,
    weights: &RiskWeights,
    audit: &AuditLog,
    ctx: &RequestContext,
    message: Message,
) -> Result<ClassifiedMessage> {
    let classification = profiler::classify(catalog, scorer, &message.text).await?;

    let mut pattern_labels = Vec::new();
    let mut profile = None;
    if classification.severity.is_flagged() {
        pattern_labels = catalog.flat_matches(&message.text);
        profile = Some(
            profiler::analyze(
                catalog,
                scorer,
                weights,
                audit,
                ctx,
                &message.id,
                &message.text,
            )
            .await?,
        );
    }

    Ok(ClassifiedMessage {
        message,
        classification,
        pattern_labels,
        profile,
    })
}
