//! Unified error type for hatctl.
//!
//! Covers the library's fallible seams: the state service API and the
//! favorites file. Poller tasks convert these into `RemoteError` events
//! instead of propagating them.

use thiserror::Error;

/// Top-level error type used across the library.
#[derive(Debug, Error)]
pub enum Error {
    // Remote state service
    /// The HTTP request itself failed (connect, timeout, TLS, non-2xx body read).
    #[error("state service request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response was not valid JSON.
    #[error("state service returned invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The response was valid JSON but not shaped as expected.
    #[error("unexpected payload: {0}")]
    Payload(&'static str),

    // Favorites store
    /// Reading or writing the favorites file failed.
    #[error("favorites store: {0}")]
    Io(#[from] std::io::Error),
}
