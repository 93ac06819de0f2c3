use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use gatepass_core::OrganizationId;
use gatepass_credentials::{AccessLogEntry, LogStream};

use crate::StoreError;

/// Failure to persist an audit record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("access log write failed: {0}")]
pub struct LogWriteError(pub String);

/// Append-only audit streams, one pair per organization.
pub trait AccessLogStore: Send + Sync {
    fn append(&self, entry: &AccessLogEntry) -> Result<(), LogWriteError>;

    /// Entries of one stream in append order, optionally for one subject.
    fn list(
        &self,
        organization_id: &OrganizationId,
        stream: LogStream,
        subject_id: Option<&str>,
    ) -> Result<Vec<AccessLogEntry>, StoreError>;
}

impl<S> AccessLogStore for Arc<S>
where
    S: AccessLogStore + ?Sized,
{
    fn append(&self, entry: &AccessLogEntry) -> Result<(), LogWriteError> {
        (**self).append(entry)
    }

    fn list(
        &self,
        organization_id: &OrganizationId,
        stream: LogStream,
        subject_id: Option<&str>,
    ) -> Result<Vec<AccessLogEntry>, StoreError> {
        (**self).list(organization_id, stream, subject_id)
    }
}

/// In-memory audit log for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAccessLogStore {
    streams: RwLock<HashMap<(OrganizationId, LogStream), Vec<AccessLogEntry>>>,
}

impl InMemoryAccessLogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccessLogStore for InMemoryAccessLogStore {
    fn append(&self, entry: &AccessLogEntry) -> Result<(), LogWriteError> {
        let mut streams = self
            .streams
            .write()
            .map_err(|_| LogWriteError("access log lock poisoned".to_string()))?;
        streams
            .entry((entry.organization_id.clone(), entry.stream()))
            .or_default()
            .push(entry.clone());
        Ok(())
    }

    fn list(
        &self,
        organization_id: &OrganizationId,
        stream: LogStream,
        subject_id: Option<&str>,
    ) -> Result<Vec<AccessLogEntry>, StoreError> {
        let streams = self.streams.read().map_err(|_| StoreError::poisoned("access log"))?;
        let Some(entries) = streams.get(&(organization_id.clone(), stream)) else {
            return Ok(vec![]);
        };
        Ok(entries
            .iter()
            .filter(|e| subject_id.is_none_or(|s| e.subject_id.as_deref() == Some(s)))
            .cloned()
            .collect())
    }
}
