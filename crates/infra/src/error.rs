use thiserror::Error;

/// Store operation error.
///
/// These are **infrastructure errors** as opposed to domain errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be read or written (e.g. poisoned lock).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A targeted write named a record that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A write conflicted with an existing record.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A write would move a record across the tenant boundary.
    #[error("tenant isolation violation: {0}")]
    TenantIsolation(String),
}

impl StoreError {
    pub(crate) fn poisoned(what: &str) -> Self {
        Self::Unavailable(format!("{what} lock poisoned"))
    }
}
