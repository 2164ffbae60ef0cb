use thiserror::Error;

/// Errors that can occur when talking to the place-search provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlacesError {
    /// Transport-level failure (DNS, connect, timeout).
    #[error("Provider request failed: {0}")]
    Http(String),
    /// The provider answered but the body could not be decoded.
    #[error("Provider response could not be decoded: {0}")]
    Decode(String),
    /// The provider reported an error status of its own.
    #[error("Provider error ({status}): {message}")]
    Provider { status: String, message: String },
}

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, PlacesError>;
