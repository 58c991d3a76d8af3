//! Error types for redirect-deployer
//!
//! Defines the error enum covering failure modes of the panel. Caller-facing
//! deploy failures are eventually flattened into a success-flag-plus-message
//! response; these variants keep the cause until that point.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for redirect-deployer operations
pub type Result<T> = std::result::Result<T, DeployerError>;

/// Error type for redirect-deployer operations
#[derive(Error, Debug)]
pub enum DeployerError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rejected request input (missing field, path escaping the projects root)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Failed to write a redirect page
    #[error("Failed to write {}: {source}", path.display())]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to persist the hosting configuration
    #[error("Failed to write {}: {source}", path.display())]
    HostingConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP server errors
    #[error("Server error: {0}")]
    Server(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
