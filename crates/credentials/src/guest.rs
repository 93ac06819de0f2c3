//! Guests and their time-boxed passes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gatepass_core::{CredentialHash, DomainError, DomainResult, Entity, GuestId, MemberId, OrganizationId, TenantOwned};

use crate::{Credential, CredentialOwner, ValidityWindow};

/// One visitor pass. A guest may hold several; each stands on its own window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestPass {
    pub hash: CredentialHash,
    pub is_active: bool,
    pub window: ValidityWindow,
    pub purpose: String,
    pub issued_at: DateTime<Utc>,
}

impl GuestPass {
    pub fn new(
        hash: CredentialHash,
        window: ValidityWindow,
        purpose: impl Into<String>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            hash,
            is_active: true,
            window,
            purpose: purpose.into(),
            issued_at,
        }
    }

    /// Listed as active: not revoked and not yet ended. Passes whose window
    /// has not started are included.
    pub fn is_listed_active(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.window.has_ended(now)
    }
}

/// A non-member registered under a host member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    id: GuestId,
    organization_id: OrganizationId,
    host_member_id: MemberId,
    name: String,
    purpose: String,
    passes: Vec<GuestPass>,
}

impl Guest {
    pub fn register(
        id: GuestId,
        organization_id: OrganizationId,
        host_member_id: MemberId,
        name: impl Into<String>,
        purpose: impl Into<String>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("guest name cannot be empty"));
        }
        Ok(Self {
            id,
            organization_id,
            host_member_id,
            name: name.trim().to_string(),
            purpose: purpose.into().trim().to_string(),
            passes: Vec::new(),
        })
    }

    pub fn host_member_id(&self) -> &MemberId {
        &self.host_member_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    pub fn passes(&self) -> &[GuestPass] {
        &self.passes
    }

    pub fn pass(&self, hash: &CredentialHash) -> Option<&GuestPass> {
        self.passes.iter().find(|p| &p.hash == hash)
    }

    /// Append a pass. Existing passes are untouched.
    pub fn add_pass(&mut self, pass: GuestPass) -> DomainResult<()> {
        if self.pass(&pass.hash).is_some() {
            return Err(DomainError::invariant("guest pass hash already present"));
        }
        self.passes.push(pass);
        Ok(())
    }

    /// Deactivate exactly one pass.
    pub fn revoke_pass(&mut self, hash: &CredentialHash) -> DomainResult<()> {
        let pass = self
            .passes
            .iter_mut()
            .find(|p| &p.hash == hash)
            .ok_or(DomainError::NotFound)?;
        pass.is_active = false;
        Ok(())
    }

    pub fn active_credentials(&self, now: DateTime<Utc>) -> Vec<Credential> {
        self.passes
            .iter()
            .filter(|p| p.is_listed_active(now))
            .map(|p| self.credential_for(p))
            .collect()
    }

    pub fn credential_for(&self, pass: &GuestPass) -> Credential {
        Credential {
            hash: pass.hash.clone(),
            expiry: pass.window.end(),
            owner: CredentialOwner::Guest(self.id.clone()),
        }
    }
}

impl Entity for Guest {
    type Id = GuestId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl TenantOwned for Guest {
    fn organization_id(&self) -> &OrganizationId {
        &self.organization_id
    }
}
