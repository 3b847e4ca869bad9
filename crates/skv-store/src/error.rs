/// Errors from ordered store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A lock guarding store state was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),

    /// A mutation or check named the empty key.
    #[error("keys must have at least one segment")]
    EmptyKey,

    /// Failure reported by an external storage backend.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
