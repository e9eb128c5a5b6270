use serde::{Deserialize, Serialize};

/// Broadcast lifecycle status as reported by the external discovery process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    Live,
    Upcoming,
    /// Anything else (ended, archived, unknown). Never polled.
    Other,
}

impl SourceStatus {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "live" => SourceStatus::Live,
            "upcoming" => SourceStatus::Upcoming,
            _ => SourceStatus::Other,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SourceStatus::Live => "live",
            SourceStatus::Upcoming => "upcoming",
            SourceStatus::Other => "other",
        }
    }
}

/// One monitored broadcast. `source_id` is the stable correlation key;
/// `chat_id` is the attached chat thread and may change over the
/// broadcast's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub source_id: String,
    pub chat_id: String,
    pub status: SourceStatus,
}

/// One chat message as fetched from the live-chat API. Exists only within
/// a single invocation; `published_at` is unix seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    pub author_id: String,
    pub text: String,
    pub published_at: i64,
    pub source_id: String,
}

/// A fetched message plus its sentiment flag, ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedMessage {
    pub message: RawMessage,
    pub is_negative: bool,
}
