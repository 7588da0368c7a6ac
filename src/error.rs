//! Error types.

use std::path::PathBuf;

use thiserror::Error;

/// Problems loading or validating a [`SessionConfig`](crate::SessionConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failure delivering one outbound event. Never reaches the frame loop.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("transport error posting to {url}: {message}")]
    Transport { url: String, message: String },
    #[error("{url} answered with HTTP {code}")]
    Status { url: String, code: u16 },
    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Handoff of an event to the background workers failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("outbound queue is full")]
    QueueFull,
    #[error("outbound workers have shut down")]
    Closed,
}

/// Errors returned when creating a tracking session.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to spawn outbound worker: {0}")]
    Spawn(#[source] std::io::Error),
}
