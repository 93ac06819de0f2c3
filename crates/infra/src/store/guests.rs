use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use gatepass_core::{CredentialHash, DomainError, Entity, GuestId, MemberId, OrganizationId, TenantOwned};
use gatepass_credentials::{Guest, GuestPass};

use crate::StoreError;

/// Guest records (`organizations/{id}/guests`) and their pass index.
pub trait GuestRepository: Send + Sync {
    fn guest(&self, organization_id: &OrganizationId, id: &GuestId) -> Result<Option<Guest>, StoreError>;

    /// Register a new guest, indexing every pass it already holds.
    fn insert_guest(&self, guest: Guest) -> Result<(), StoreError>;

    /// Append one pass to the stored guest. Other passes are untouched.
    fn add_pass(
        &self,
        organization_id: &OrganizationId,
        guest_id: &GuestId,
        pass: GuestPass,
    ) -> Result<Guest, StoreError>;

    /// Deactivate one pass of the stored guest. Other passes are untouched.
    fn revoke_pass(
        &self,
        organization_id: &OrganizationId,
        guest_id: &GuestId,
        hash: &CredentialHash,
    ) -> Result<Guest, StoreError>;

    /// Indexed lookup of a pass by `(organization, hash)`.
    fn find_pass(
        &self,
        organization_id: &OrganizationId,
        hash: &CredentialHash,
    ) -> Result<Option<(Guest, GuestPass)>, StoreError>;

    /// Organization holding a guest pass, if any tenant has it.
    fn pass_organization(&self, hash: &CredentialHash) -> Result<Option<OrganizationId>, StoreError>;

    fn guests_for_host(
        &self,
        organization_id: &OrganizationId,
        host_member_id: &MemberId,
    ) -> Result<Vec<Guest>, StoreError>;
}

impl<S> GuestRepository for Arc<S>
where
    S: GuestRepository + ?Sized,
{
    fn guest(&self, organization_id: &OrganizationId, id: &GuestId) -> Result<Option<Guest>, StoreError> {
        (**self).guest(organization_id, id)
    }

    fn insert_guest(&self, guest: Guest) -> Result<(), StoreError> {
        (**self).insert_guest(guest)
    }

    fn add_pass(
        &self,
        organization_id: &OrganizationId,
        guest_id: &GuestId,
        pass: GuestPass,
    ) -> Result<Guest, StoreError> {
        (**self).add_pass(organization_id, guest_id, pass)
    }

    fn revoke_pass(
        &self,
        organization_id: &OrganizationId,
        guest_id: &GuestId,
        hash: &CredentialHash,
    ) -> Result<Guest, StoreError> {
        (**self).revoke_pass(organization_id, guest_id, hash)
    }

    fn find_pass(
        &self,
        organization_id: &OrganizationId,
        hash: &CredentialHash,
    ) -> Result<Option<(Guest, GuestPass)>, StoreError> {
        (**self).find_pass(organization_id, hash)
    }

    fn pass_organization(&self, hash: &CredentialHash) -> Result<Option<OrganizationId>, StoreError> {
        (**self).pass_organization(hash)
    }

    fn guests_for_host(
        &self,
        organization_id: &OrganizationId,
        host_member_id: &MemberId,
    ) -> Result<Vec<Guest>, StoreError> {
        (**self).guests_for_host(organization_id, host_member_id)
    }
}

#[derive(Debug, Default)]
struct GuestState {
    guests: HashMap<(OrganizationId, GuestId), Guest>,
    by_pass: HashMap<(OrganizationId, CredentialHash), GuestId>,
    pass_orgs: HashMap<CredentialHash, OrganizationId>,
}

impl GuestState {
    fn ensure_unclaimed(&self, hash: &CredentialHash) -> Result<(), StoreError> {
        if self.pass_orgs.contains_key(hash) {
            return Err(StoreError::Conflict(format!("guest pass '{hash}' already issued")));
        }
        Ok(())
    }

    fn index(&mut self, organization_id: &OrganizationId, guest_id: &GuestId, hash: &CredentialHash) {
        self.by_pass
            .insert((organization_id.clone(), hash.clone()), guest_id.clone());
        self.pass_orgs.insert(hash.clone(), organization_id.clone());
    }
}

/// In-memory guest store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryGuestRepository {
    inner: RwLock<GuestState>,
}

impl InMemoryGuestRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GuestRepository for InMemoryGuestRepository {
    fn guest(&self, organization_id: &OrganizationId, id: &GuestId) -> Result<Option<Guest>, StoreError> {
        let state = self.inner.read().map_err(|_| StoreError::poisoned("guests"))?;
        Ok(state.guests.get(&(organization_id.clone(), id.clone())).cloned())
    }

    fn insert_guest(&self, guest: Guest) -> Result<(), StoreError> {
        let key = (guest.organization_id().clone(), guest.id().clone());
        let mut state = self.inner.write().map_err(|_| StoreError::poisoned("guests"))?;
        if state.guests.contains_key(&key) {
            return Err(StoreError::Conflict(format!("guest '{}' already exists", guest.id())));
        }
        for pass in guest.passes() {
            state.ensure_unclaimed(&pass.hash)?;
        }
        for pass in guest.passes() {
            state.index(&key.0, &key.1, &pass.hash);
        }
        state.guests.insert(key, guest);
        Ok(())
    }

    fn add_pass(
        &self,
        organization_id: &OrganizationId,
        guest_id: &GuestId,
        pass: GuestPass,
    ) -> Result<Guest, StoreError> {
        let key = (organization_id.clone(), guest_id.clone());
        let mut state = self.inner.write().map_err(|_| StoreError::poisoned("guests"))?;
        if !state.guests.contains_key(&key) {
            return Err(StoreError::NotFound(format!("guest '{guest_id}'")));
        }
        state.ensure_unclaimed(&pass.hash)?;
        let hash = pass.hash.clone();
        let guest = state
            .guests
            .get_mut(&key)
            .ok_or_else(|| StoreError::NotFound(format!("guest '{guest_id}'")))?;
        guest
            .add_pass(pass)
            .map_err(|e| StoreError::Conflict(e.to_string()))?;
        let updated = guest.clone();
        state.index(organization_id, guest_id, &hash);
        Ok(updated)
    }

    fn revoke_pass(
        &self,
        organization_id: &OrganizationId,
        guest_id: &GuestId,
        hash: &CredentialHash,
    ) -> Result<Guest, StoreError> {
        let mut state = self.inner.write().map_err(|_| StoreError::poisoned("guests"))?;
        let guest = state
            .guests
            .get_mut(&(organization_id.clone(), guest_id.clone()))
            .ok_or_else(|| StoreError::NotFound(format!("guest '{guest_id}'")))?;
        guest.revoke_pass(hash).map_err(|e| match e {
            DomainError::NotFound => StoreError::NotFound(format!("guest pass '{hash}'")),
            other => StoreError::Conflict(other.to_string()),
        })?;
        Ok(guest.clone())
    }

    fn find_pass(
        &self,
        organization_id: &OrganizationId,
        hash: &CredentialHash,
    ) -> Result<Option<(Guest, GuestPass)>, StoreError> {
        let state = self.inner.read().map_err(|_| StoreError::poisoned("guests"))?;
        let Some(guest_id) = state.by_pass.get(&(organization_id.clone(), hash.clone())) else {
            return Ok(None);
        };
        Ok(state
            .guests
            .get(&(organization_id.clone(), guest_id.clone()))
            .and_then(|g| g.pass(hash).map(|p| (g.clone(), p.clone()))))
    }

    fn pass_organization(&self, hash: &CredentialHash) -> Result<Option<OrganizationId>, StoreError> {
        let state = self.inner.read().map_err(|_| StoreError::poisoned("guests"))?;
        Ok(state.pass_orgs.get(hash).cloned())
    }

    fn guests_for_host(
        &self,
        organization_id: &OrganizationId,
        host_member_id: &MemberId,
    ) -> Result<Vec<Guest>, StoreError> {
        let state = self.inner.read().map_err(|_| StoreError::poisoned("guests"))?;
        let mut guests: Vec<Guest> = state
            .guests
            .iter()
            .filter(|((org, _), g)| org == organization_id && g.host_member_id() == host_member_id)
            .map(|(_, g)| g.clone())
            .collect();
        guests.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(guests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use gatepass_credentials::{ValidityWindow, new_guest_hash};

    fn org(id: &str) -> OrganizationId {
        OrganizationId::parse(id).unwrap()
    }

    fn guest(id: &str, org_id: &str) -> Guest {
        Guest::register(
            GuestId::parse(id).unwrap(),
            org(org_id),
            MemberId::parse("m1").unwrap(),
            "Visitor",
            "visit",
        )
        .unwrap()
    }

    fn pass() -> GuestPass {
        let now = Utc::now();
        GuestPass::new(
            new_guest_hash(),
            ValidityWindow::new(now, now + Duration::hours(1)).unwrap(),
            "visit",
            now,
        )
    }

    #[test]
    fn find_pass_is_tenant_scoped() {
        let repo = InMemoryGuestRepository::new();
        let mut g = guest("g-1", "org-1");
        let p = pass();
        g.add_pass(p.clone()).unwrap();
        repo.insert_guest(g).unwrap();

        let (found, found_pass) = repo.find_pass(&org("org-1"), &p.hash).unwrap().unwrap();
        assert_eq!(found.id().as_str(), "g-1");
        assert_eq!(found_pass, p);
        assert!(repo.find_pass(&org("org-2"), &p.hash).unwrap().is_none());
        assert_eq!(repo.pass_organization(&p.hash).unwrap(), Some(org("org-1")));
    }

    fn gid(id: &str) -> GuestId {
        GuestId::parse(id).unwrap()
    }

    #[test]
    fn revocation_touches_only_the_named_pass() {
        let repo = InMemoryGuestRepository::new();
        repo.insert_guest(guest("g-1", "org-1")).unwrap();
        let (a, b) = (pass(), pass());
        repo.add_pass(&org("org-1"), &gid("g-1"), a.clone()).unwrap();
        repo.add_pass(&org("org-1"), &gid("g-1"), b.clone()).unwrap();

        repo.revoke_pass(&org("org-1"), &gid("g-1"), &a.hash).unwrap();

        let (_, stored_a) = repo.find_pass(&org("org-1"), &a.hash).unwrap().unwrap();
        let (_, stored_b) = repo.find_pass(&org("org-1"), &b.hash).unwrap().unwrap();
        assert!(!stored_a.is_active);
        assert!(stored_b.is_active);
    }

    #[test]
    fn pass_added_after_a_stale_read_survives_revocation() {
        let repo = InMemoryGuestRepository::new();
        let mut g = guest("g-1", "org-1");
        let a = pass();
        g.add_pass(a.clone()).unwrap();
        repo.insert_guest(g).unwrap();

        let stale = repo.guest(&org("org-1"), &gid("g-1")).unwrap().unwrap();
        let b = pass();
        repo.add_pass(&org("org-1"), &gid("g-1"), b.clone()).unwrap();
        repo.revoke_pass(stale.organization_id(), stale.id(), &a.hash).unwrap();

        let (_, stored_b) = repo.find_pass(&org("org-1"), &b.hash).unwrap().unwrap();
        assert!(stored_b.is_active);
        assert_eq!(repo.guest(&org("org-1"), &gid("g-1")).unwrap().unwrap().passes().len(), 2);
    }

    #[test]
    fn targeted_writes_on_missing_records_are_not_found() {
        let repo = InMemoryGuestRepository::new();
        assert!(matches!(
            repo.add_pass(&org("org-1"), &gid("g-1"), pass()),
            Err(StoreError::NotFound(_))
        ));
        repo.insert_guest(guest("g-1", "org-1")).unwrap();
        assert!(matches!(
            repo.revoke_pass(&org("org-1"), &gid("g-1"), &new_guest_hash()),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            repo.revoke_pass(&org("org-2"), &gid("g-1"), &new_guest_hash()),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn pass_hash_cannot_be_reused_by_another_guest() {
        let repo = InMemoryGuestRepository::new();
        let p = pass();
        repo.insert_guest(guest("g-1", "org-1")).unwrap();
        repo.add_pass(&org("org-1"), &gid("g-1"), p.clone()).unwrap();

        let mut b = guest("g-2", "org-2");
        b.add_pass(p.clone()).unwrap();
        assert!(matches!(repo.insert_guest(b), Err(StoreError::Conflict(_))));
        repo.insert_guest(guest("g-3", "org-1")).unwrap();
        assert!(matches!(
            repo.add_pass(&org("org-1"), &gid("g-3"), p),
            Err(StoreError::Conflict(_))
        ));
    }

    #[test]
    fn registering_an_existing_guest_is_a_conflict() {
        let repo = InMemoryGuestRepository::new();
        repo.insert_guest(guest("g-1", "org-1")).unwrap();
        assert!(matches!(
            repo.insert_guest(guest("g-1", "org-1")),
            Err(StoreError::Conflict(_))
        ));
    }
}
