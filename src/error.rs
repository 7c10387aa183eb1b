//! Error types for the parkwatch service
//!
//! All caller-facing failures are typed: validation failures never reach the
//! store, and constraint violations surface as specific variants rather than
//! opaque database errors, so the HTTP layer can map them to stable status
//! codes.

use thiserror::Error;

/// Result type alias for parkwatch operations
pub type Result<T> = std::result::Result<T, ParkwatchError>;

/// Error types for slot operations
#[derive(Error, Debug)]
pub enum ParkwatchError {
    /// Missing or malformed caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Slot name collision on registration
    #[error("Duplicate slot: {0}")]
    Duplicate(String),

    /// Operation targets a slot that was never registered
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database errors other than the constraint cases above
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upstream service rejected or failed a request unexpectedly
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl ParkwatchError {
    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a duplicate error
    pub fn duplicate<S: Into<String>>(msg: S) -> Self {
        Self::Duplicate(msg.into())
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a database error
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a service unavailable error
    pub fn unavailable<S: Into<String>>(msg: S) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Check if error is retryable
    ///
    /// The reporter retries these on its next poll cycle; everything else is
    /// a definitive answer from the service.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ParkwatchError::Http(_) | ParkwatchError::Unavailable(_) | ParkwatchError::Io(_)
        )
    }
}
