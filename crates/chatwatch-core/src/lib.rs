mod app_config;
mod config;
pub mod filter;
pub mod select;
pub mod threshold;
mod types;

pub use app_config::{AppConfig, ConfigError, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use types::{ClassifiedMessage, RawMessage, Source, SourceStatus};
