//! Docgate error types

use thiserror::Error;

/// Docgate error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid or unsafe detection pattern
    #[error("Invalid pattern: {0}")]
    Pattern(String),

    /// Malformed security policy
    #[error("Policy error: {0}")]
    Policy(String),

    /// External vendor call failed
    #[error("Vendor error: {0}")]
    Vendor(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for docgate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Recoverable boundary validation failures.
///
/// These are ordinary result values, never fatal: the gateway surfaces
/// them to the caller as a structured error envelope and keeps serving.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Capability not in the fixed allow-list
    #[error("Unknown capability: {0}")]
    UnknownCapability(String),

    /// One or more required parameters absent; lists every missing field
    #[error("Missing required parameters: {}", .0.join(", "))]
    MissingParameter(Vec<String>),

    /// Text field exceeds the maximum size the boundary accepts
    #[error("Text too long: {length} characters. Maximum: {max}")]
    PayloadTooLarge { length: usize, max: usize },

    /// Field value not in the supported enum set
    #[error("Invalid {field}: {value}")]
    InvalidEnum { field: String, value: String },

    /// External response missing an expected field
    #[error("Malformed vendor result: {0}")]
    MalformedResult(String),
}
