use std::path::Path;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

mod config;

/// Chaperone: Risk profiling and audit trail for chat-safety review.
///
/// Flags chat messages showing grooming or predatory patterns, profiles the
/// risk of each flagged message, and keeps an append-only audit log of every
/// analysis action.
#[derive(Parser)]
#[command(name = "chaperone", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a chat transcript CSV and flag risky messages
    Scan {
        /// Transcript CSV with id,message columns
        transcript: PathBuf,

        /// Where to write the flagged-messages CSV (default: flagged_messages.csv)
        #[arg(long, default_value = "flagged_messages.csv")]
        output: PathBuf,

        /// Number of messages to score in parallel (default: 8)
        #[arg(long, default_value = "8")]
        concurrency: u32,
    },

    /// Build the full risk profile for a single message
    Analyze {
        /// The message text to profile
        message: String,
    },

    /// Summarize one day's audit log
    Summary {
        /// Day to summarize, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<chrono::NaiveDate>,
    },

    /// Show system status (log directory, segments, today's events)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("chaperone=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            transcript,
            output,
            concurrency,
        } => {
            let config = config::Config::load()?;
            config.require_sentiment()?;

            let audit = open_audit(&config)?;
            let ctx = build_context(&config);

            println!("Scanning transcript: {}", transcript.display());

            let catalog = chaperone::patterns::PatternCatalog::new();
            let scorer =
                chaperone::sentiment::HttpSentimentScorer::new(config.sentiment_api_url.clone());
            let weights = chaperone::scoring::RiskWeights::default();

            let rows = chaperone::pipeline::scan::run(
                &catalog,
                &scorer,
                &weights,
                &audit,
                &ctx,
                &transcript,
                concurrency as usize,
            )
            .await?;

            chaperone::output::terminal::display_flagged(&rows);
            chaperone::output::terminal::display_distributions(&rows);

            let flagged_rows: Vec<chaperone::ingest::FlaggedRow> = rows
                .iter()
                .filter(|row| row.classification.severity.is_flagged())
                .map(|row| chaperone::ingest::FlaggedRow {
                    id: row.message.id.clone(),
                    message: row.message.text.clone(),
                    severity: row.classification.severity.to_string(),
                    match_count: row.classification.match_count,
                    compound: row.classification.sentiment.compound,
                })
                .collect();
            chaperone::ingest::write_flagged(&output, &flagged_rows)?;
            println!(
                "\n{}",
                format!("Flagged messages saved to '{}'", output.display()).cyan()
            );

            chaperone::output::terminal::display_sessions(&audit.active_sessions());

            println!("{}", "Scan complete.".bold());
            println!("  Messages scanned: {}", rows.len());
            println!("  Flagged: {}", flagged_rows.len());
            println!("  Audit log: {}", audit.dir().display());
        }

        Commands::Analyze { message } => {
            let config = config::Config::load()?;
            config.require_sentiment()?;

            let audit = open_audit(&config)?;
            let ctx = build_context(&config);

            let catalog = chaperone::patterns::PatternCatalog::new();
            let scorer =
                chaperone::sentiment::HttpSentimentScorer::new(config.sentiment_api_url.clone());
            let weights = chaperone::scoring::RiskWeights::default();

            let (classification, profile) =
                match profile_adhoc(&catalog, &scorer, &weights, &audit, &ctx, &message).await {
                    Ok(result) => result,
                    Err(e) => {
                        return Err(chaperone::scoring::profiler::report_analysis_failure(
                            &audit, &ctx, "adhoc", e,
                        ));
                    }
                };

            chaperone::output::terminal::display_analysis(&classification, &profile);
        }

        Commands::Summary { date } => {
            let config = config::Config::load()?;
            let date = date.unwrap_or_else(|| chrono::Utc::now().date_naive());
            let summary = chaperone::query::summarize(&config.log_dir, date)?;
            chaperone::output::terminal::display_summary(&summary);
        }

        Commands::Status => {
            let config = config::Config::load()?;

            println!("\n{}", "=== Chaperone Status ===".bold());
            println!("  Log directory: {}", config.log_dir.display());
            println!("  Audit segments: {}", count_segments(&config.log_dir)?);

            let today = chrono::Utc::now().date_naive();
            let summary = chaperone::query::summarize(&config.log_dir, today)?;
            println!("  Events today: {}", summary.total_events);
            if summary.threat_events > 0 {
                println!(
                    "  {}",
                    format!("Threats today: {}", summary.threat_events).red()
                );
            }

            if config.sentiment_api_url.is_empty() {
                println!(
                    "\n  {}",
                    "SENTIMENT_API_URL not set. Scanning is disabled.".yellow()
                );
            }
        }
    }

    Ok(())
}

/// Classify and profile a single ad-hoc message.
async fn profile_adhoc(
    catalog: &chaperone::patterns::PatternCatalog,
    scorer: &dyn chaperone::sentiment::SentimentScorer,
    weights: &chaperone::scoring::RiskWeights,
    audit: &chaperone::audit::AuditLog,
    ctx: &chaperone::audit::RequestContext,
    message: &str,
) -> Result<(
    chaperone::scoring::Classification,
    chaperone::scoring::RiskProfile,
)> {
    let classification = chaperone::scoring::classify(catalog, scorer, message).await?;
    let profile =
        chaperone::scoring::analyze(catalog, scorer, weights, audit, ctx, "adhoc", message).await?;
    Ok((classification, profile))
}

/// Open the audit log with the configured session capacity.
fn open_audit(config: &config::Config) -> Result<chaperone::audit::AuditLog> {
    let audit = match config.session_capacity {
        Some(capacity) => {
            chaperone::audit::AuditLog::with_session_capacity(&config.log_dir, capacity)?
        }
        None => chaperone::audit::AuditLog::open(&config.log_dir)?,
    };
    Ok(audit)
}

/// Build the request context for audit events produced by this run.
///
/// One session id is minted per invocation so every event from a single run
/// correlates to the same session.
fn build_context(config: &config::Config) -> chaperone::audit::RequestContext {
    let mut ctx = match &config.user {
        Some(user) => chaperone::audit::RequestContext::for_user(user.clone()),
        None => chaperone::audit::RequestContext::anonymous(),
    };
    ctx.session_id = Some(uuid::Uuid::new_v4().to_string());
    ctx
}

/// Count audit segment files in the log directory.
fn count_segments(dir: &Path) -> Result<usize> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let mut count = 0;
    for entry in entries {
        let name = entry?.file_name();
        let name = name.to_string_lossy();
        if name.starts_with("audit-") && name.ends_with(".jsonl") {
            count += 1;
        }
    }
    Ok(count)
}
