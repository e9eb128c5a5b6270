//! Batch classification of fetched messages.

use chatwatch_core::{ClassifiedMessage, RawMessage};

use crate::error::SentimentError;
use crate::normalize::Normalizer;
use crate::scorer::{SentimentScore, SentimentScorer};

/// The asymmetric negativity rule: magnitude measures the scorer's
/// confidence, so only a confidently negative signal flips the flag.
#[must_use]
pub fn is_negative(score: SentimentScore) -> bool {
    score.score < -score.magnitude
}

/// Classify a batch of messages with the injected scorer.
///
/// Text is normalized before scoring; messages whose text normalizes to
/// empty skip the scorer entirely and come back non-negative (the scoring
/// API rejects empty documents).
///
/// # Errors
///
/// The first scorer failure aborts the whole batch with
/// [`SentimentError::Classification`] naming the offending message's
/// source. Partial tagging is never returned — it would silently
/// under-flag the remaining messages.
pub async fn classify(
    messages: Vec<RawMessage>,
    scorer: &dyn SentimentScorer,
) -> Result<Vec<ClassifiedMessage>, SentimentError> {
    let normalizer = Normalizer::new();
    let mut classified = Vec::with_capacity(messages.len());

    for message in messages {
        let cleaned = normalizer.normalize(&message.text);
        let negative = if cleaned.is_empty() {
            false
        } else {
            let score = scorer.score(&cleaned).await.map_err(|e| {
                SentimentError::Classification {
                    source_id: message.source_id.clone(),
                    source: Box::new(e),
                }
            })?;
            is_negative(score)
        };

        classified.push(ClassifiedMessage {
            message,
            is_negative: negative,
        });
    }

    Ok(classified)
}
