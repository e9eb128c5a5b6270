mod client;
mod error;
mod types;

pub use client::LiveChatClient;
pub use error::ChatError;
