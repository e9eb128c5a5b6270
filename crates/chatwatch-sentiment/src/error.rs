use thiserror::Error;

/// Errors from sentiment scoring and classification.
#[derive(Debug, Error)]
pub enum SentimentError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The scoring API returned a non-2xx status with an error body.
    #[error("sentiment API error: {0}")]
    ApiError(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A scorer failure wrapped with the source whose batch was aborted.
    #[error("scoring failed for source {source_id}: {source}")]
    Classification {
        source_id: String,
        #[source]
        source: Box<SentimentError>,
    },
}
