//! Span parsing and ingestion-threshold resolution.

use thiserror::Error;

/// Default lookback span when the caller omits `span`. The upstream
/// scheduler triggers this service every 60 minutes.
pub const DEFAULT_SPAN_MINUTES: i64 = 60;

/// Upper bound on the lookback span: 7 days. Anything larger is outside
/// the use case and rejected rather than clamped.
pub const MAX_SPAN_MINUTES: i64 = 10_080;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpanError {
    #[error("span must be an integer number of minutes, got {0:?}")]
    NotAnInteger(String),
    #[error("span must be non-negative, got {0}")]
    Negative(i64),
    #[error("span must not exceed {MAX_SPAN_MINUTES} minutes (7 days), got {0}")]
    TooLarge(i64),
}

/// Parse the optional `span` query value into minutes.
///
/// Absent means [`DEFAULT_SPAN_MINUTES`]. Present values must parse as an
/// integer in `[0, MAX_SPAN_MINUTES]`; anything else is the caller's error
/// to surface, never silently corrected.
///
/// # Errors
///
/// Returns [`SpanError`] for non-integer, negative, or too-large values.
pub fn parse_span(raw: Option<&str>) -> Result<i64, SpanError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_SPAN_MINUTES);
    };

    let minutes: i64 = raw
        .trim()
        .parse()
        .map_err(|_| SpanError::NotAnInteger(raw.to_string()))?;

    if minutes < 0 {
        return Err(SpanError::Negative(minutes));
    }
    if minutes > MAX_SPAN_MINUTES {
        return Err(SpanError::TooLarge(minutes));
    }

    Ok(minutes)
}

/// Compute the effective lower time bound for one invocation.
///
/// Base threshold is `now − span` (unix seconds). When a watermark exists it
/// dominates any span-based lookback: messages at or below the maximum
/// already-persisted `published_at` are never re-admitted, even if the caller
/// passes a span large enough to re-cover them.
#[must_use]
pub fn resolve_threshold(span_minutes: i64, now: i64, watermark: Option<i64>) -> i64 {
    let base = now - span_minutes * 60;
    match watermark {
        Some(mark) => base.max(mark),
        None => base,
    }
}
