// Sentiment scorer trait — the swap-ready abstraction.
//
// Profiling only consumes the compound score, but the full polarity breakdown
// is kept so reports can show it.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// VADER-style polarity scores for a single piece of text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SentimentScore {
    /// Normalized aggregate from -1.0 (very negative) to 1.0 (very positive).
    pub compound: f64,
    /// Fraction of the text classified as positive.
    pub positive: f64,
    /// Fraction of the text classified as negative.
    pub negative: f64,
    /// Fraction of the text classified as neutral.
    pub neutral: f64,
}

/// Trait for scoring text sentiment. Implementations must be async because
/// scoring goes over HTTP to the backing service.
#[async_trait]
pub trait SentimentScorer: Send + Sync {
    /// Score a single text for sentiment polarity.
    async fn score(&self, text: &str) -> Result<SentimentScore>;
}
