//! Error types for fimerge
//!
//! Only store failures and serialization failures are errors. A document that
//! is absent, fails verification, or has a blank id is an empty result, not an
//! error.

use thiserror::Error;

/// Result type alias using FiMergeError
pub type Result<T> = std::result::Result<T, FiMergeError>;

/// Unified error type for fimerge operations
#[derive(Debug, Error)]
pub enum FiMergeError {
    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Corrupted shard file: {0}")]
    Corruption(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
