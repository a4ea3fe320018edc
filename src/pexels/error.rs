use std::num::ParseIntError;

use reqwest::{StatusCode, header::HeaderMap};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing or invalid API key")]
    InvalidApiKey,

    #[error("Failed to parse response: {0}")]
    InvalidResponse(#[source] serde_json::Error),

    #[error("Failed to send request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error {status}")]
    Status {
        status: StatusCode,
        headers: HeaderMap,
        body: String,
    },

    #[error("Invalid X-RateLimit-Remaining header {value:?}")]
    RateLimitHeader {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

impl Error {
    /// Status code of a non-2xx response, if this error came from one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
