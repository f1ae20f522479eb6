//! Error types for the scanning engine

use thiserror::Error;

/// Configuration-time failures. Raised before any probe is dispatched.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("HTTP client construction failed: {0}")]
    Client(#[from] reqwest::Error),
}

/// A single attempt that never produced an HTTP response.
/// Always retryable; never surfaces past the prober.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
