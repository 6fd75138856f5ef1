//! Error types for seqstore
//!
//! Provides a unified error type for container, codec and store operations.

use thiserror::Error;

/// Result type alias using SeqError
pub type Result<T> = std::result::Result<T, SeqError>;

/// Unified error type for seqstore operations
#[derive(Debug, Error)]
pub enum SeqError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Container Errors
    // -------------------------------------------------------------------------
    /// A growth, reserve or shrink request could not be satisfied.
    #[error("Allocation failed: could not obtain {requested} slots")]
    Allocation { requested: u64 },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Decode error: {0}")]
    Decode(String),

    /// `read` stopped mid-stream. The container holds exactly `decoded`
    /// elements.
    #[error("Read stopped after {decoded} of {expected} elements: {source}")]
    PartialRead {
        decoded: u64,
        expected: u64,
        #[source]
        source: Box<SeqError>,
    },

    // -------------------------------------------------------------------------
    // Model Errors
    // -------------------------------------------------------------------------
    #[error("Invalid field: {0}")]
    InvalidField(String),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Corrupt store: {0}")]
    Corrupt(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SeqError {
    /// Number of elements a failed `read` managed to decode, if this error
    /// came from one.
    pub fn decoded_count(&self) -> Option<u64> {
        match self {
            SeqError::PartialRead { decoded, .. } => Some(*decoded),
            _ => None,
        }
    }
}
