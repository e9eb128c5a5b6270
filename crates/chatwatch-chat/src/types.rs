//! Wire types for the `liveChatMessages.list` endpoint (snippet part only).

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LiveChatMessageListResponse {
    #[serde(default)]
    pub items: Vec<LiveChatMessageItem>,
}

#[derive(Debug, Deserialize)]
pub struct LiveChatMessageItem {
    pub snippet: LiveChatMessageSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveChatMessageSnippet {
    pub author_channel_id: String,
    /// Absent for non-text events (membership milestones etc.).
    #[serde(default)]
    pub display_message: String,
    pub published_at: String,
}
