//! Error types for cachet-client

use thiserror::Error;

/// Errors that can occur while talking to the Cachet API
#[derive(Error, Debug)]
pub enum CachetError {
    /// Base URL cannot be parsed
    #[error("invalid Cachet base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Token rejected by the server
    #[error("Cachet rejected the API key (HTTP {status})")]
    Unauthorized { status: u16 },

    /// Any other non-success response
    #[error("Cachet API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// Connection, TLS or timeout error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
