//! Audit records of validation attempts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gatepass_core::{AccessLogId, OrganizationId};

use crate::{Decision, DenialReason, Subject};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectType {
    Member,
    Guest,
}

/// The per-organization append-only stream an entry lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStream {
    /// `organizations/{id}/accessLogs`
    AccessLogs,
    /// `organizations/{id}/guestAccessLogs`
    GuestAccessLogs,
}

impl From<SubjectType> for LogStream {
    fn from(value: SubjectType) -> Self {
        match value {
            SubjectType::Member => LogStream::AccessLogs,
            SubjectType::Guest => LogStream::GuestAccessLogs,
        }
    }
}

/// The guard performing a scan, taken from the authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardContext {
    pub organization_id: OrganizationId,
    pub guard_id: String,
    pub guard_name: String,
}

/// Immutable record of one validation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLogEntry {
    pub id: AccessLogId,
    pub organization_id: OrganizationId,
    /// Absent when nothing resolved inside the guard's organization.
    pub subject_id: Option<String>,
    pub subject_name: Option<String>,
    pub subject_type: SubjectType,
    pub guard_id: String,
    pub guard_name: String,
    pub timestamp: DateTime<Utc>,
    pub granted: bool,
    pub credential_hash: String,
    pub denial_reason: Option<DenialReason>,
    pub message: Option<String>,
}

impl AccessLogEntry {
    /// Build the entry for an attempt from the same snapshot that produced
    /// `decision`.
    pub fn for_attempt(
        guard: &GuardContext,
        presented: &str,
        subject_type: SubjectType,
        subject: Option<&Subject>,
        decision: &Decision,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AccessLogId::new(),
            organization_id: guard.organization_id.clone(),
            subject_id: subject.map(|s| s.subject_id().to_string()),
            subject_name: subject.map(|s| s.name().to_string()),
            subject_type,
            guard_id: guard.guard_id.clone(),
            guard_name: guard.guard_name.clone(),
            timestamp,
            granted: decision.is_granted(),
            credential_hash: presented.to_string(),
            denial_reason: decision.denial_reason(),
            message: decision.message().map(str::to_string),
        }
    }

    pub fn stream(&self) -> LogStream {
        self.subject_type.into()
    }
}
