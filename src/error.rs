// Error types shared by the config store and the Discord adapter

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading settings or persisting the config document
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing login token: set DISCORD_TOKEN (or token) in the environment")]
    MissingToken,
    #[error("invalid value for {key}: {value}")]
    InvalidSetting { key: &'static str, value: String },
    #[error("failed to write config to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised by outbound calls to the chat platform
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("discord request failed: {0}")]
    Discord(#[from] serenity::Error),
    #[error("failed to download attachment: {0}")]
    Download(#[from] reqwest::Error),
    #[error("invalid emoji {0:?}")]
    InvalidEmoji(String),
    #[cfg(test)]
    #[error("simulated {0} failure")]
    Simulated(&'static str),
}
