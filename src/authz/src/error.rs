//! Error types for the WebAC role resolution engine
//!
//! Only infrastructure failures are errors. Missing ACLs, dangling links and
//! malformed authorizations resolve to "no grant" and never reach this type.

use thiserror::Error;

/// WebAC engine errors
#[derive(Debug, Error)]
pub enum WebAcError {
    /// The resource store could not answer a read
    #[error("Store error: {0}")]
    Store(String),

    /// No resource exists at the requested path
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid engine configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Fixture or configuration (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WebAcError {
    /// Whether this error originates from the resource store
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

/// Result type for WebAC operations
pub type Result<T> = std::result::Result<T, WebAcError>;
