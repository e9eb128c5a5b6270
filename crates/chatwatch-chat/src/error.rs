use thiserror::Error;

/// Errors returned by the live-chat API client.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-2xx status with an error body.
    #[error("live chat API error: {0}")]
    ApiError(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A message carried a `publishedAt` value that is not valid RFC 3339.
    #[error("invalid publishedAt timestamp {value:?}: {reason}")]
    InvalidTimestamp { value: String, reason: String },
}
