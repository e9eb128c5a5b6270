mod error;
mod google;
mod normalize;
mod scorer;
mod tagger;

pub use error::SentimentError;
pub use google::GoogleLanguageClient;
pub use normalize::Normalizer;
pub use scorer::{SentimentScore, SentimentScorer};
pub use tagger::{classify, is_negative};
