//! Error types for cfdyn
//!
//! Every stage of a run reports failures through [`Error`]. Only
//! [`Error::Notification`] is tolerated by the engine; everything else ends
//! the run.

use thiserror::Error;

/// Result type alias for cfdyn operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for cfdyn
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The HTTP request could not be built (bad URL, bad header value)
    #[error("Failed to build {method} request for {url}: {message}")]
    Request {
        method: String,
        url: String,
        message: String,
    },

    /// The request was sent but no response came back
    #[error("{method} request to {url} failed: {message}")]
    Transport {
        method: String,
        url: String,
        message: String,
    },

    /// The response body could not be read
    #[error("Failed to read response body from {url}: {message}")]
    BodyRead { url: String, message: String },

    /// Non-2xx response
    #[error("{url} returned HTTP {status}: {body}")]
    Status { url: String, status: u16, body: String },

    /// The response body was not the expected JSON shape
    #[error("Failed to decode {target} from {url}: {source}")]
    Decode {
        url: String,
        target: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A lookup matched nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Notification delivery failed
    #[error("Notification error: {0}")]
    Notification(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a notification error
    pub fn notification(msg: impl Into<String>) -> Self {
        Self::Notification(msg.into())
    }

    /// Whether this error came from a lookup that matched nothing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
