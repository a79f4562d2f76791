//! Error types for the Gatehouse service.

use thiserror::Error;

/// Main error type for Gatehouse operations.
///
/// The limiter itself never fails; these errors only arise at the
/// configuration and server boundary.
#[derive(Error, Debug)]
pub enum GatehouseError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP server errors
    #[error("Server error: {0}")]
    Server(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Gatehouse operations.
pub type Result<T> = std::result::Result<T, GatehouseError>;
