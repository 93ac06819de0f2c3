//! Best-effort audit recording on the scan hot path.
//!
//! A gate decision must never wait on, or fail because of, the audit store.
//! Write failures are reported on the [`AUDIT_TARGET`] tracing target and
//! counted; they are never returned to the validator's caller.

use std::sync::atomic::{AtomicU64, Ordering};

use gatepass_core::OrganizationId;
use gatepass_credentials::{AccessLogEntry, LogStream};
use gatepass_observability::AUDIT_TARGET;

use crate::StoreError;
use crate::store::AccessLogStore;

#[derive(Debug)]
pub struct AccessLogger<S> {
    store: S,
    failed_writes: AtomicU64,
}

impl<S> AccessLogger<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            failed_writes: AtomicU64::new(0),
        }
    }

    /// Number of entries that could not be written since startup.
    pub fn failed_writes(&self) -> u64 {
        self.failed_writes.load(Ordering::Relaxed)
    }
}

impl<S> AccessLogger<S>
where
    S: AccessLogStore,
{
    /// Append one entry; fire-and-continue.
    pub fn record(&self, entry: &AccessLogEntry) {
        if let Err(err) = self.store.append(entry) {
            self.failed_writes.fetch_add(1, Ordering::Relaxed);
            tracing::error!(
                target: AUDIT_TARGET,
                organization_id = %entry.organization_id,
                credential_hash = %entry.credential_hash,
                granted = entry.granted,
                denial_reason = ?entry.denial_reason,
                error = %err,
                "failed to record access log entry"
            );
        }
    }

    pub fn list(
        &self,
        organization_id: &OrganizationId,
        stream: LogStream,
        subject_id: Option<&str>,
    ) -> Result<Vec<AccessLogEntry>, StoreError> {
        self.store.list(organization_id, stream, subject_id)
    }
}
