use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Why a fetch cycle was abandoned. None of these are fatal: the scheduler
/// keeps the last good board and retries on the next tick.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Network unreachable, connection reset, TLS failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("start.gg API error: {status} - {body}")]
    Status { status: StatusCode, body: String },

    /// Response arrived but is not what we asked for
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// No response within the request deadline
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

impl FetchError {
    pub fn protocol(msg: impl Into<String>) -> Self {
        FetchError::Protocol(msg.into())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Protocol(format!("Failed to parse start.gg response: {}", e))
    }
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;
