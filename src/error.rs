use thiserror::Error;

/// Failures of the local JSON store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed store document: {0}")]
    Format(#[from] serde_json::Error),
}

/// Application-level errors surfaced to the user.
///
/// Intake and notification failures never appear here: both adapters swallow
/// their errors at the boundary (a failed parse yields no result, a failed
/// notification is logged and dropped).
#[derive(Debug, Error)]
pub enum HearthError {
    /// A required task field is missing or unparseable. Creation is aborted.
    #[error("{0}")]
    Validation(String),
    /// The store could not be read or written. Non-fatal: the in-memory
    /// state stays usable until the next successful write.
    #[error("storage failure: {0}")]
    Store(#[from] StoreError),
}
