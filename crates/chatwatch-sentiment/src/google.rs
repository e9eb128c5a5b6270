//! Google Cloud Natural Language client implementing [`SentimentScorer`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::SentimentError;
use crate::scorer::{SentimentScore, SentimentScorer};

const DEFAULT_BASE_URL: &str = "https://language.googleapis.com/";

/// Client for the `documents:analyzeSentiment` REST endpoint.
///
/// Use [`GoogleLanguageClient::new`] for production or
/// [`GoogleLanguageClient::with_base_url`] to point at a mock server in
/// tests.
pub struct GoogleLanguageClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeSentimentRequest<'a> {
    document: Document<'a>,
    encoding_type: &'static str,
}

#[derive(Debug, Serialize)]
struct Document<'a> {
    #[serde(rename = "type")]
    doc_type: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeSentimentResponse {
    document_sentiment: DocumentSentiment,
}

#[derive(Debug, Deserialize)]
struct DocumentSentiment {
    #[serde(default)]
    score: f32,
    #[serde(default)]
    magnitude: f32,
}

impl GoogleLanguageClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, SentimentError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SentimentError::ApiError`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, SentimentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("chatwatch/0.1 (live-chat-ingest)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| SentimentError::ApiError(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }
}

#[async_trait]
impl SentimentScorer for GoogleLanguageClient {
    async fn score(&self, text: &str) -> Result<SentimentScore, SentimentError> {
        let mut url = self
            .base_url
            .join("v2/documents:analyzeSentiment")
            .map_err(|e| SentimentError::ApiError(format!("invalid endpoint URL: {e}")))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);

        let request = AnalyzeSentimentRequest {
            document: Document {
                doc_type: "PLAIN_TEXT",
                content: text,
            },
            encoding_type: "UTF8",
        };

        let response = self.client.post(url).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::warn!(status = %status, "analyzeSentiment failed");
            return Err(SentimentError::ApiError(format!(
                "analyzeSentiment returned {status}: {body}"
            )));
        }

        let parsed: AnalyzeSentimentResponse =
            serde_json::from_str(&body).map_err(|e| SentimentError::Deserialize {
                context: "documents:analyzeSentiment".to_string(),
                source: e,
            })?;

        tracing::debug!(
            score = parsed.document_sentiment.score,
            magnitude = parsed.document_sentiment.magnitude,
            "scored document"
        );
        Ok(SentimentScore {
            score: parsed.document_sentiment.score,
            magnitude: parsed.document_sentiment.magnitude,
        })
    }
}
