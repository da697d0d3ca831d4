//! Error types for Courtside.

use thiserror::Error;

/// Main error type for Courtside operations.
#[derive(Error, Debug)]
pub enum CourtsideError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decoder error: {0}")]
    Decoder(String),

    #[error("Encoder error: {0}")]
    Encoder(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for Courtside operations.
pub type Result<T> = std::result::Result<T, CourtsideError>;
