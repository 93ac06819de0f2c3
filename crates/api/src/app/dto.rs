use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gatepass_core::{Entity, MemberId, OrganizationId, TenantOwned};
use gatepass_credentials::{Decision, LogStream};
use gatepass_directory::{AccessLevel, CommunityType, Member, MemberProfile};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct UpsertOrganizationRequest {
    pub name: String,
    pub community_type: CommunityType,
}

#[derive(Debug, Deserialize)]
pub struct RegisterMemberRequest {
    /// Defaults to a fresh id.
    pub member_id: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub access_level: AccessLevel,
    #[serde(default)]
    pub profile: MemberProfile,
}

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    /// Decoded QR payload or manually typed value.
    pub credential: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamParam {
    Member,
    Guest,
}

impl From<StreamParam> for LogStream {
    fn from(value: StreamParam) -> Self {
        match value {
            StreamParam::Member => LogStream::AccessLogs,
            StreamParam::Guest => LogStream::GuestAccessLogs,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AccessLogQuery {
    pub stream: StreamParam,
    pub subject: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

/// Roster view of a member. The credential hash itself is not exposed.
#[derive(Debug, Serialize)]
pub struct MemberView {
    pub id: MemberId,
    pub organization_id: OrganizationId,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub access_level: AccessLevel,
    pub profile: MemberProfile,
    pub has_credential: bool,
    pub credential_expiry: Option<DateTime<Utc>>,
}

impl From<&Member> for MemberView {
    fn from(m: &Member) -> Self {
        Self {
            id: m.id().clone(),
            organization_id: m.organization_id().clone(),
            name: m.name().to_string(),
            email: m.email().to_string(),
            is_active: m.is_active(),
            access_level: m.access_level(),
            profile: m.profile().clone(),
            has_credential: m.credential_hash().is_some(),
            credential_expiry: m.credential_expiry(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub granted: bool,
    pub decision: Decision,
}

impl From<Decision> for ScanResponse {
    fn from(decision: Decision) -> Self {
        Self {
            granted: decision.is_granted(),
            decision,
        }
    }
}
