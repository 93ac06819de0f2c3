use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gatepass_core::{CredentialHash, DomainError, DomainResult, Entity, MemberId, OrganizationId, TenantOwned};

/// Access tier granted to a member at the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    #[default]
    Resident,
    Restricted,
}

/// Details shown to the guard on a successful scan.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MemberProfile {
    /// Street address, or tower/unit for tower-based communities.
    pub home_address: Option<String>,
    pub vehicle_info: Option<String>,
}

/// Input to [`Member::register`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterMember {
    pub member_id: MemberId,
    pub organization_id: OrganizationId,
    pub name: String,
    pub email: String,
    pub access_level: AccessLevel,
    pub profile: MemberProfile,
}

/// A resident of exactly one organization.
///
/// # Invariants
/// - `organization_id` never changes after registration.
/// - Credential fields are written only through [`Member::record_credential`],
///   which the credential issuer owns.
/// - Members are never deleted; they are deactivated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    id: MemberId,
    organization_id: OrganizationId,
    name: String,
    email: String,
    is_active: bool,
    access_level: AccessLevel,
    profile: MemberProfile,
    credential_hash: Option<CredentialHash>,
    credential_expiry: Option<DateTime<Utc>>,
}

impl Member {
    pub fn register(cmd: RegisterMember) -> DomainResult<Self> {
        let name = cmd.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        let email = normalize_email(&cmd.email);
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation("invalid email format"));
        }

        Ok(Self {
            id: cmd.member_id,
            organization_id: cmd.organization_id,
            name: name.to_string(),
            email,
            is_active: true,
            access_level: cmd.access_level,
            profile: cmd.profile,
            credential_hash: None,
            credential_expiry: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized (trimmed, lowercased) email.
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn access_level(&self) -> AccessLevel {
        self.access_level
    }

    pub fn profile(&self) -> &MemberProfile {
        &self.profile
    }

    pub fn credential_hash(&self) -> Option<&CredentialHash> {
        self.credential_hash.as_ref()
    }

    pub fn credential_expiry(&self) -> Option<DateTime<Utc>> {
        self.credential_expiry
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn activate(&mut self) {
        self.is_active = true;
    }

    /// Store a freshly issued credential on the record.
    pub fn record_credential(&mut self, hash: CredentialHash, expiry: DateTime<Utc>) {
        self.credential_hash = Some(hash);
        self.credential_expiry = Some(expiry);
    }
}

impl Entity for Member {
    type Id = MemberId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl TenantOwned for Member {
    fn organization_id(&self) -> &OrganizationId {
        &self.organization_id
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
