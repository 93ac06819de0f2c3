use chrono::{DateTime, Utc};
use thiserror::Error;

/// Issuance-time failures. Any of these aborts the operation before a write.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IssuanceError {
    /// The member, host or guest does not exist.
    #[error("owner not found: {0}")]
    OwnerNotFound(String),

    /// The caller may not issue for this owner (foreign tenant or not the owner).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("invalid validity window: start {start} is after end {end}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// The request is malformed in some other way (e.g. a blank guest name).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The backing store failed; nothing was persisted.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl IssuanceError {
    pub fn owner_not_found(msg: impl Into<String>) -> Self {
        Self::OwnerNotFound(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialKeyError {
    #[error("credential secret cannot be empty")]
    Empty,

    #[error("credential secret rejected: {0}")]
    Rejected(String),
}
