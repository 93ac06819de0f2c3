//! Member credential issuance.

use std::sync::Arc;

use chrono::Duration;

use gatepass_auth::{Principal, ensure_tenant};
use gatepass_core::{Clock, MemberId, TenantOwned};
use gatepass_credentials::{Credential, CredentialKey, CredentialOwner, IssuanceError, derive_member_hash};

use crate::StoreError;
use crate::store::MemberDirectory;

/// Derives and persists a member's display credential.
///
/// The hash is a pure function of identity, so concurrent or repeated
/// issuance converges on one value; only the expiry slides forward.
pub struct CredentialIssuer<D> {
    directory: D,
    key: CredentialKey,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<D> CredentialIssuer<D>
where
    D: MemberDirectory,
{
    pub fn new(directory: D, key: CredentialKey, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            directory,
            key,
            ttl,
            clock,
        }
    }

    /// Issue (or re-issue) the credential of `member_id` for `caller`.
    ///
    /// The caller must be the member or an admin of the member's
    /// organization. Exactly one write on success; none on failure.
    pub fn issue(&self, caller: &Principal, member_id: &MemberId) -> Result<Credential, IssuanceError> {
        let member = self
            .directory
            .member(member_id)
            .map_err(storage)?
            .ok_or_else(|| IssuanceError::owner_not_found(format!("member '{member_id}'")))?;

        if ensure_tenant(caller, member.organization_id()).is_err() {
            tracing::warn!(
                member_id = %member_id,
                caller_org = %caller.organization_id,
                "credential issuance attempted across organizations"
            );
            return Err(IssuanceError::unauthorized("member belongs to another organization"));
        }
        if !caller.is_member(member_id) && !caller.is_admin() {
            return Err(IssuanceError::unauthorized("only the member or an admin may issue"));
        }

        // Organization and email never change, so the hash read here matches
        // whatever the record holds at write time.
        let hash = derive_member_hash(&self.key, member.organization_id(), member_id, member.email());
        let expiry = self
            .clock
            .now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| IssuanceError::InvalidRequest("credential expiry is out of range".to_string()))?;

        self.directory
            .record_credential(member_id, hash.clone(), expiry)
            .map_err(storage)?;

        tracing::info!(member_id = %member_id, %expiry, "member credential issued");

        Ok(Credential {
            hash,
            expiry,
            owner: CredentialOwner::Member(member_id.clone()),
        })
    }
}

fn storage(err: StoreError) -> IssuanceError {
    match err {
        StoreError::NotFound(what) => IssuanceError::OwnerNotFound(what),
        other => IssuanceError::Storage(other.to_string()),
    }
}
