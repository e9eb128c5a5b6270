//! Scoring collaborator seam.

use async_trait::async_trait;

use crate::error::SentimentError;

/// Document-level sentiment as reported by the scoring service.
///
/// `score` is the polarity in `[-1.0, 1.0]`; `magnitude` is the scorer's
/// non-negative confidence/strength measure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentScore {
    pub score: f32,
    pub magnitude: f32,
}

/// External sentiment-scoring collaborator.
///
/// Implementations must never be called with empty text; the tagger short
/// circuits empty input before reaching this seam.
#[async_trait]
pub trait SentimentScorer: Send + Sync {
    async fn score(&self, text: &str) -> Result<SentimentScore, SentimentError>;
}
