//! Guest pass issuance, listing and revocation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gatepass_auth::{Principal, ensure_tenant};
use gatepass_core::{Clock, CredentialHash, Entity, GuestId, MemberId, TenantOwned};
use gatepass_credentials::{Credential, Guest, GuestPass, IssuanceError, ValidityWindow, new_guest_hash};
use gatepass_directory::Member;

use crate::StoreError;
use crate::store::{GuestRepository, MemberDirectory};

/// Which guest a new pass is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuestRef {
    /// A guest already registered under the host.
    Existing { guest_id: GuestId },
    /// Register a new guest together with the pass.
    New { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestPassRequest {
    pub host_member_id: MemberId,
    pub guest: GuestRef,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub purpose: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedGuestPass {
    pub guest_id: GuestId,
    pub credential: Credential,
}

fn storage(err: StoreError) -> IssuanceError {
    match err {
        StoreError::NotFound(what) => IssuanceError::OwnerNotFound(what),
        other => IssuanceError::Storage(other.to_string()),
    }
}

pub struct GuestCredentialService<D, G> {
    directory: D,
    guests: G,
    clock: Arc<dyn Clock>,
}

impl<D, G> GuestCredentialService<D, G>
where
    D: MemberDirectory,
    G: GuestRepository,
{
    pub fn new(directory: D, guests: G, clock: Arc<dyn Clock>) -> Self {
        Self {
            directory,
            guests,
            clock,
        }
    }

    /// Issue a new pass. Every check runs before the single write, so a
    /// rejected request leaves no partial pass behind.
    pub fn issue(&self, caller: &Principal, request: GuestPassRequest) -> Result<IssuedGuestPass, IssuanceError> {
        let window = ValidityWindow::new(request.start, request.end)?;
        let host = self.authorized_host(caller, &request.host_member_id)?;

        let now = self.clock.now();
        let (guest_id, credential) = match request.guest {
            GuestRef::Existing { guest_id } => {
                let guest = self
                    .guests
                    .guest(host.organization_id(), &guest_id)
                    .map_err(storage)?
                    .ok_or_else(|| IssuanceError::owner_not_found(format!("guest '{guest_id}'")))?;
                if guest.host_member_id() != host.id() {
                    return Err(IssuanceError::owner_not_found(format!(
                        "guest '{guest_id}' under host '{}'",
                        host.id()
                    )));
                }
                let purpose = if request.purpose.trim().is_empty() {
                    guest.purpose().to_string()
                } else {
                    request.purpose
                };
                let pass = GuestPass::new(new_guest_hash(), window, purpose, now);
                let credential = guest.credential_for(&pass);
                self.guests
                    .add_pass(host.organization_id(), &guest_id, pass)
                    .map_err(storage)?;
                (guest_id, credential)
            }
            GuestRef::New { name } => {
                let mut guest = Guest::register(
                    GuestId::new(),
                    host.organization_id().clone(),
                    host.id().clone(),
                    name,
                    request.purpose.clone(),
                )
                .map_err(|e| IssuanceError::InvalidRequest(e.to_string()))?;
                let pass = GuestPass::new(new_guest_hash(), window, request.purpose, now);
                let credential = guest.credential_for(&pass);
                guest
                    .add_pass(pass)
                    .map_err(|e| IssuanceError::Storage(e.to_string()))?;
                let guest_id = guest.id().clone();
                self.guests.insert_guest(guest).map_err(storage)?;
                (guest_id, credential)
            }
        };

        tracing::info!(
            guest_id = %guest_id,
            host_member_id = %request.host_member_id,
            valid_until = %credential.expiry,
            "guest pass issued"
        );

        Ok(IssuedGuestPass { guest_id, credential })
    }

    /// Passes of a guest that are not revoked and not yet over. Any principal
    /// of the guest's organization may look.
    pub fn list_active_for(&self, caller: &Principal, guest_id: &GuestId) -> Result<Vec<Credential>, IssuanceError> {
        let guest = self.tenant_guest(caller, guest_id)?;
        Ok(guest.active_credentials(self.clock.now()))
    }

    pub fn revoke(&self, caller: &Principal, guest_id: &GuestId, hash: &CredentialHash) -> Result<(), IssuanceError> {
        let guest = self.authorized_guest(caller, guest_id)?;
        self.guests
            .revoke_pass(guest.organization_id(), guest.id(), hash)
            .map_err(storage)?;

        tracing::info!(guest_id = %guest_id, credential_hash = %hash, "guest pass revoked");
        Ok(())
    }

    pub fn guests_for(&self, caller: &Principal, host_member_id: &MemberId) -> Result<Vec<Guest>, IssuanceError> {
        let host = self.authorized_host(caller, host_member_id)?;
        self.guests
            .guests_for_host(host.organization_id(), host.id())
            .map_err(storage)
    }

    fn authorized_host(&self, caller: &Principal, host_member_id: &MemberId) -> Result<Member, IssuanceError> {
        let host = self
            .directory
            .member(host_member_id)
            .map_err(storage)?
            .ok_or_else(|| IssuanceError::owner_not_found(format!("host member '{host_member_id}'")))?;
        if ensure_tenant(caller, host.organization_id()).is_err() {
            return Err(IssuanceError::unauthorized("host belongs to another organization"));
        }
        if !caller.is_member(host_member_id) && !caller.is_admin() {
            return Err(IssuanceError::unauthorized("only the host or an admin may manage guest passes"));
        }
        Ok(host)
    }

    fn tenant_guest(&self, caller: &Principal, guest_id: &GuestId) -> Result<Guest, IssuanceError> {
        self.guests
            .guest(&caller.organization_id, guest_id)
            .map_err(storage)?
            .ok_or_else(|| IssuanceError::owner_not_found(format!("guest '{guest_id}'")))
    }

    fn authorized_guest(&self, caller: &Principal, guest_id: &GuestId) -> Result<Guest, IssuanceError> {
        let guest = self.tenant_guest(caller, guest_id)?;
        if !caller.is_member(guest.host_member_id()) && !caller.is_admin() {
            return Err(IssuanceError::unauthorized("only the host or an admin may manage guest passes"));
        }
        Ok(guest)
    }
}
