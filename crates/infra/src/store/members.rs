use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use gatepass_core::{CredentialHash, Entity, MemberId, OrganizationId, TenantOwned};
use gatepass_directory::{Member, Organization};

use crate::StoreError;

/// Tenant directory: organizations and their member roster.
pub trait MemberDirectory: Send + Sync {
    fn upsert_organization(&self, organization: Organization) -> Result<(), StoreError>;

    /// Register a new member. Member ids are unique across all tenants.
    fn insert_member(&self, member: Member) -> Result<(), StoreError>;

    /// Resolve a member by id, regardless of tenant. Callers compare the
    /// returned record's organization against their own.
    fn member(&self, id: &MemberId) -> Result<Option<Member>, StoreError>;

    /// Write a freshly issued credential onto an existing member and re-index
    /// it. Only the credential fields change; the rest of the stored record
    /// is left as the store currently holds it.
    fn record_credential(
        &self,
        id: &MemberId,
        hash: CredentialHash,
        expiry: DateTime<Utc>,
    ) -> Result<Member, StoreError>;

    /// Flip only the active flag of an existing member.
    fn set_active(&self, id: &MemberId, active: bool) -> Result<Member, StoreError>;

    /// Indexed composite lookup on `(organization, credential hash)`.
    fn member_by_credential(
        &self,
        organization_id: &OrganizationId,
        hash: &CredentialHash,
    ) -> Result<Option<Member>, StoreError>;

    /// Organization owning a member credential, if any tenant has it.
    fn credential_organization(&self, hash: &CredentialHash) -> Result<Option<OrganizationId>, StoreError>;

    fn list_members(&self, organization_id: &OrganizationId) -> Result<Vec<Member>, StoreError>;
}

impl<S> MemberDirectory for Arc<S>
where
    S: MemberDirectory + ?Sized,
{
    fn upsert_organization(&self, organization: Organization) -> Result<(), StoreError> {
        (**self).upsert_organization(organization)
    }

    fn insert_member(&self, member: Member) -> Result<(), StoreError> {
        (**self).insert_member(member)
    }

    fn member(&self, id: &MemberId) -> Result<Option<Member>, StoreError> {
        (**self).member(id)
    }

    fn record_credential(
        &self,
        id: &MemberId,
        hash: CredentialHash,
        expiry: DateTime<Utc>,
    ) -> Result<Member, StoreError> {
        (**self).record_credential(id, hash, expiry)
    }

    fn set_active(&self, id: &MemberId, active: bool) -> Result<Member, StoreError> {
        (**self).set_active(id, active)
    }

    fn member_by_credential(
        &self,
        organization_id: &OrganizationId,
        hash: &CredentialHash,
    ) -> Result<Option<Member>, StoreError> {
        (**self).member_by_credential(organization_id, hash)
    }

    fn credential_organization(&self, hash: &CredentialHash) -> Result<Option<OrganizationId>, StoreError> {
        (**self).credential_organization(hash)
    }

    fn list_members(&self, organization_id: &OrganizationId) -> Result<Vec<Member>, StoreError> {
        (**self).list_members(organization_id)
    }
}

#[derive(Debug, Default)]
struct DirectoryState {
    organizations: HashMap<OrganizationId, Organization>,
    members: HashMap<MemberId, Member>,
    by_credential: HashMap<(OrganizationId, CredentialHash), MemberId>,
    credential_orgs: HashMap<CredentialHash, OrganizationId>,
}

impl DirectoryState {
    fn unindex(&mut self, member: &Member) {
        if let Some(hash) = member.credential_hash() {
            self.by_credential
                .remove(&(member.organization_id().clone(), hash.clone()));
            self.credential_orgs.remove(hash);
        }
    }

    fn index(&mut self, member: &Member) {
        if let Some(hash) = member.credential_hash() {
            self.by_credential.insert(
                (member.organization_id().clone(), hash.clone()),
                member.id().clone(),
            );
            self.credential_orgs
                .insert(hash.clone(), member.organization_id().clone());
        }
    }
}

/// In-memory indexed directory for tests/dev.
///
/// Record and indexes live under one lock so readers never observe a
/// member whose index entry is stale.
#[derive(Debug, Default)]
pub struct InMemoryMemberDirectory {
    inner: RwLock<DirectoryState>,
}

impl InMemoryMemberDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemberDirectory for InMemoryMemberDirectory {
    fn upsert_organization(&self, organization: Organization) -> Result<(), StoreError> {
        let mut state = self.inner.write().map_err(|_| StoreError::poisoned("directory"))?;
        state.organizations.insert(organization.id().clone(), organization);
        Ok(())
    }

    fn insert_member(&self, member: Member) -> Result<(), StoreError> {
        let mut state = self.inner.write().map_err(|_| StoreError::poisoned("directory"))?;
        if !state.organizations.contains_key(member.organization_id()) {
            return Err(StoreError::TenantIsolation(format!(
                "unknown organization '{}'",
                member.organization_id()
            )));
        }
        if state.members.contains_key(member.id()) {
            return Err(StoreError::Conflict(format!("member '{}' already exists", member.id())));
        }
        state.index(&member);
        state.members.insert(member.id().clone(), member);
        Ok(())
    }

    fn member(&self, id: &MemberId) -> Result<Option<Member>, StoreError> {
        let state = self.inner.read().map_err(|_| StoreError::poisoned("directory"))?;
        Ok(state.members.get(id).cloned())
    }

    fn record_credential(
        &self,
        id: &MemberId,
        hash: CredentialHash,
        expiry: DateTime<Utc>,
    ) -> Result<Member, StoreError> {
        let mut state = self.inner.write().map_err(|_| StoreError::poisoned("directory"))?;
        let Some(mut member) = state.members.get(id).cloned() else {
            return Err(StoreError::NotFound(format!("member '{id}'")));
        };
        let holder = state
            .credential_orgs
            .get(&hash)
            .and_then(|org| state.by_credential.get(&(org.clone(), hash.clone())));
        if holder.is_some_and(|holder| holder != id) {
            return Err(StoreError::Conflict(format!("credential '{hash}' belongs to another member")));
        }
        state.unindex(&member);
        member.record_credential(hash, expiry);
        state.index(&member);
        state.members.insert(id.clone(), member.clone());
        Ok(member)
    }

    fn set_active(&self, id: &MemberId, active: bool) -> Result<Member, StoreError> {
        let mut state = self.inner.write().map_err(|_| StoreError::poisoned("directory"))?;
        let member = state
            .members
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("member '{id}'")))?;
        if active {
            member.activate();
        } else {
            member.deactivate();
        }
        Ok(member.clone())
    }

    fn member_by_credential(
        &self,
        organization_id: &OrganizationId,
        hash: &CredentialHash,
    ) -> Result<Option<Member>, StoreError> {
        let state = self.inner.read().map_err(|_| StoreError::poisoned("directory"))?;
        Ok(state
            .by_credential
            .get(&(organization_id.clone(), hash.clone()))
            .and_then(|id| state.members.get(id))
            .cloned())
    }

    fn credential_organization(&self, hash: &CredentialHash) -> Result<Option<OrganizationId>, StoreError> {
        let state = self.inner.read().map_err(|_| StoreError::poisoned("directory"))?;
        Ok(state.credential_orgs.get(hash).cloned())
    }

    fn list_members(&self, organization_id: &OrganizationId) -> Result<Vec<Member>, StoreError> {
        let state = self.inner.read().map_err(|_| StoreError::poisoned("directory"))?;
        let mut members: Vec<Member> = state
            .members
            .values()
            .filter(|m| m.organization_id() == organization_id)
            .cloned()
            .collect();
        members.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(members)
    }
}
