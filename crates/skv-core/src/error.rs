//! Error types for the structured layer.

use skv_store::StoreError;
use skv_types::{KeyPath, PhysicalKey, TypeError};

/// Errors that can occur during structured KV operations.
#[derive(Debug, thiserror::Error)]
pub enum SkvError {
    /// A logical key could not be built.
    #[error("invalid key: {0}")]
    Key(#[from] TypeError),

    /// A physical key in the data namespace does not have the expected shape.
    #[error("malformed data key {key}: {reason}")]
    MalformedKey { key: PhysicalKey, reason: String },

    /// A child counter holds something other than an 8-byte integer.
    #[error("corrupt child counter at {key}: expected 8 bytes, got {len}")]
    CorruptCounter { key: PhysicalKey, len: usize },

    /// Every commit attempt lost to a concurrent writer. Safe to retry.
    #[error("commit contention on {key} after {attempts} attempts")]
    Conflict { key: KeyPath, attempts: u32 },

    /// A value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration could not be parsed or is out of range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The underlying store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl SkvError {
    /// Returns `true` if retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SkvError::Conflict { .. })
    }
}

/// Convenience alias for structured KV results.
pub type SkvResult<T> = Result<T, SkvError>;
