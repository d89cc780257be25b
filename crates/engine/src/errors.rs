//! Error types for the load-generation engine

use thiserror::Error;

/// Fatal conditions that stop a run.
///
/// Per-request failures are not errors: they become [`crate::Outcome::Fail`].
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("unknown reporting timezone {0:?}")]
    InvalidTimezone(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("configuration load error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("event serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("worker task failed: {0}")]
    WorkerJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
