//! HTTP client for the YouTube Live Chat messages endpoint.
//!
//! Wraps `reqwest` with API key management, typed response deserialization,
//! and conversion of wire items into domain [`RawMessage`] values. Messages
//! arrive ordered ascending by `publishedAt`; that ordering is an API
//! guarantee this client passes through untouched.

use std::time::Duration;

use chatwatch_core::RawMessage;
use chrono::DateTime;
use reqwest::{Client, Url};

use crate::error::ChatError;
use crate::types::LiveChatMessageListResponse;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

/// Client for the live-chat messages API.
///
/// Use [`LiveChatClient::new`] for production or
/// [`LiveChatClient::with_base_url`] to point at a mock server in tests.
pub struct LiveChatClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl LiveChatClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, ChatError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ChatError::ApiError`] if `base_url` is
    /// not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("chatwatch/0.1 (live-chat-ingest)")
            .build()?;

        // Normalise: exactly one trailing slash so Url::join resolves the
        // endpoint under the base path instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| ChatError::ApiError(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Fetches the current batch of messages for one chat thread.
    ///
    /// `source_id` tags the returned messages with the broadcast they were
    /// fetched for; `max_results` of 0 lets the API pick its default page
    /// size.
    ///
    /// # Errors
    ///
    /// - [`ChatError::ApiError`] for non-2xx responses with an error body.
    /// - [`ChatError::Http`] on network failure.
    /// - [`ChatError::Deserialize`] if the response does not match the
    ///   expected shape.
    /// - [`ChatError::InvalidTimestamp`] if any item carries an unparsable
    ///   `publishedAt`.
    pub async fn list_messages(
        &self,
        source_id: &str,
        chat_id: &str,
        max_results: u32,
    ) -> Result<Vec<RawMessage>, ChatError> {
        let mut url = self
            .base_url
            .join("liveChatMessages")
            .map_err(|e| ChatError::ApiError(format!("invalid endpoint URL: {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("part", "snippet");
            pairs.append_pair("liveChatId", chat_id);
            pairs.append_pair("key", &self.api_key);
            if max_results != 0 {
                pairs.append_pair("maxResults", &max_results.to_string());
            }
        }

        tracing::debug!(source_id, chat_id, max_results, "fetching live chat batch");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::warn!(source_id, chat_id, status = %status, "liveChatMessages.list failed");
            return Err(ChatError::ApiError(format!(
                "liveChatMessages.list returned {status}: {body}"
            )));
        }

        let parsed: LiveChatMessageListResponse =
            serde_json::from_str(&body).map_err(|e| ChatError::Deserialize {
                context: format!("liveChatMessages.list(liveChatId={chat_id})"),
                source: e,
            })?;

        let mut messages = Vec::with_capacity(parsed.items.len());
        for item in parsed.items {
            let published_at = DateTime::parse_from_rfc3339(&item.snippet.published_at)
                .map_err(|e| ChatError::InvalidTimestamp {
                    value: item.snippet.published_at.clone(),
                    reason: e.to_string(),
                })?
                .timestamp();

            messages.push(RawMessage {
                author_id: item.snippet.author_channel_id,
                text: item.snippet.display_message,
                published_at,
                source_id: source_id.to_owned(),
            });
        }

        tracing::debug!(source_id, count = messages.len(), "fetched live chat batch");
        Ok(messages)
    }
}
