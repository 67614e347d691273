//! Error types for the playerctl bridge client

/// Result type alias for playerctl bridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the playerctl bridge
///
/// None of these are fatal for a caller that polls: a failed request simply
/// means "no new information this cycle".
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP request could not be completed (connection refused, timeout, ...)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The bridge answered with a non-success HTTP status
    #[error("{url} answered with HTTP status {status}")]
    Status { url: String, status: u16 },

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Returns true when the failure came from the transport itself
    /// (as opposed to the bridge answering with an error status).
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Error::Http(e) if e.is_connect() || e.is_timeout())
    }
}
