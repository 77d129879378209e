// Error types for the octobar data core.
// Covers GitHub API failures, cache IO, and response decoding.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OctobarError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, OctobarError>;
