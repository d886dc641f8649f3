//! Remote-service error types.

use thiserror::Error;

/// Errors from the remote stores.
///
/// Transport and API errors are surfaced immediately and retried only by
/// the import poller's bounded loop; not-found is fatal for the operation
/// that hit it.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Network-level failure (connect, timeout, TLS).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The addressed resource no longer exists.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The service answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// A local file could not be read for upload.
    #[error("Failed to read file '{name}': {source}")]
    ReadFile {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl RemoteError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::NotFound(_))
    }
}
