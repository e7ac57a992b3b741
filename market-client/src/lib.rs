//! Client side of the dashboard backend: configuration, URL builders and a
//! transport seam with an HTTP and an in-memory implementation.

use thiserror::Error;

mod config;
mod endpoints;
mod transport;

pub use config::{ClientConfig, ConfigError};
pub use endpoints::Endpoints;
pub use transport::{HttpTransport, MemoryTransport, Transport};

/// Why a single request did not produce a usable payload.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("invalid json: {0}")]
    InvalidJson(String),
    #[error("unexpected payload shape: {0}")]
    ShapeMismatch(String),
    #[error("empty result from {0}")]
    EmptyResult(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::InvalidJson(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::InvalidJson(err.to_string())
    }
}
