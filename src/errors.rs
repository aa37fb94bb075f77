// src/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PollError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to parse results JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Update request failed with status {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Server refused the update request: {0}")]
    Notice(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to navigate to '{url}': {source}")]
    Navigation {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

impl PollError {
    /// True for failures the poller recovers from by waiting for the next tick.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PollError::Request(_)
                | PollError::ApiError { .. }
                | PollError::JsonParse(_)
                | PollError::Notice(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PollError>;
