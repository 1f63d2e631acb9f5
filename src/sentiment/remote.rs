// HTTP sentiment backend.
//
// Talks to a VADER-compatible scoring endpoint: POST a JSON body with the
// text, get polarity scores back. Any service speaking that shape works,
// which keeps the scorer usable against both the hosted service and a local
// sidecar during development.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::{SentimentScore, SentimentScorer};

/// Sentiment scorer backed by an HTTP scoring endpoint.
pub struct HttpSentimentScorer {
    client: Client,
    endpoint: String,
}

impl HttpSentimentScorer {
    /// Create a new scorer pointed at the given endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl SentimentScorer for HttpSentimentScorer {
    async fn score(&self, text: &str) -> Result<SentimentScore> {
        let request = ScoreRequest {
            text: text.to_string(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .context("Failed to call sentiment endpoint")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Sentiment endpoint returned {}: {}", status, body);
        }

        let result: ScoreResponse = response
            .json()
            .await
            .context("Failed to parse sentiment response")?;

        debug!(compound = result.compound, "Scored text");

        Ok(SentimentScore {
            compound: result.compound,
            positive: result.pos,
            negative: result.neg,
            neutral: result.neu,
        })
    }
}

// --- Sentiment endpoint request/response types ---

#[derive(Serialize)]
struct ScoreRequest {
    text: String,
}

/// Response body, using VADER's field names.
#[derive(Deserialize)]
struct ScoreResponse {
    compound: f64,
    #[serde(default)]
    pos: f64,
    #[serde(default)]
    neg: f64,
    #[serde(default)]
    neu: f64,
}
