// Sentiment scoring — trait-based abstraction for swappable backends.
//
// The SentimentScorer trait defines the interface. HttpSentimentScorer
// implements it against a VADER-compatible scoring endpoint. Swapping in a
// different backend means adding an implementation, not touching the pipeline.

pub mod remote;
pub mod traits;

pub use remote::HttpSentimentScorer;
pub use traits::{SentimentScore, SentimentScorer};
