//! Credential derivation.
//!
//! Member credentials are a keyed hash of identity attributes, so re-issuing
//! for the same identity always yields the same value. Guest credentials are
//! random and carry a fixed prefix so a validator can route them without a
//! tenant lookup. Member hashes are lowercase hex and can never start with
//! the guest prefix.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use gatepass_core::{CredentialHash, GuestId, MemberId, OrganizationId};

use crate::error::CredentialKeyError;

/// Namespace prefix of every guest credential.
pub const GUEST_CREDENTIAL_PREFIX: &str = "gst_";

type HmacSha256 = Hmac<Sha256>;

/// Deployment secret keying member credential derivation.
#[derive(Clone)]
pub struct CredentialKey {
    mac: HmacSha256,
}

impl CredentialKey {
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, CredentialKeyError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(CredentialKeyError::Empty);
        }
        let mac = <HmacSha256 as Mac>::new_from_slice(secret)
            .map_err(|e| CredentialKeyError::Rejected(e.to_string()))?;
        Ok(Self { mac })
    }
}

impl core::fmt::Debug for CredentialKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("CredentialKey(<redacted>)")
    }
}

/// Who a credential authorizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "owner_type", content = "owner_id", rename_all = "lowercase")]
pub enum CredentialOwner {
    Member(MemberId),
    Guest(GuestId),
}

/// The hash + expiry pair handed to the display side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub hash: CredentialHash,
    pub expiry: DateTime<Utc>,
    #[serde(flatten)]
    pub owner: CredentialOwner,
}

/// Derive the member credential for an identity.
///
/// Depends only on `(organization, member, email)`; the email is expected in
/// normalized form (see `Member::email`). Fields are length-delimited so
/// `("ab", "c")` and `("a", "bc")` never collide.
pub fn derive_member_hash(
    key: &CredentialKey,
    organization_id: &OrganizationId,
    member_id: &MemberId,
    email: &str,
) -> CredentialHash {
    let mut mac = key.mac.clone();
    for field in [organization_id.as_str(), member_id.as_str(), email] {
        mac.update(&(field.len() as u64).to_be_bytes());
        mac.update(field.as_bytes());
    }
    let digest = hex::encode(mac.finalize().into_bytes());
    CredentialHash::minted(digest)
}

/// Mint a fresh, unguessable guest credential.
pub fn new_guest_hash() -> CredentialHash {
    CredentialHash::minted(format!("{GUEST_CREDENTIAL_PREFIX}{}", Uuid::new_v4().simple()))
}

/// Whether a presented value lives in the guest namespace.
pub fn is_guest_credential(presented: &str) -> bool {
    presented.trim_start().starts_with(GUEST_CREDENTIAL_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn key() -> CredentialKey {
        CredentialKey::new("test-secret").unwrap()
    }

    fn org(s: &str) -> OrganizationId {
        OrganizationId::parse(s).unwrap()
    }

    fn member(s: &str) -> MemberId {
        MemberId::parse(s).unwrap()
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(matches!(CredentialKey::new(""), Err(CredentialKeyError::Empty)));
    }

    #[test]
    fn member_hash_depends_on_every_identity_field() {
        let base = derive_member_hash(&key(), &org("org-1"), &member("m1"), "m1@x.com");
        assert_ne!(base, derive_member_hash(&key(), &org("org-2"), &member("m1"), "m1@x.com"));
        assert_ne!(base, derive_member_hash(&key(), &org("org-1"), &member("m2"), "m1@x.com"));
        assert_ne!(base, derive_member_hash(&key(), &org("org-1"), &member("m1"), "m2@x.com"));
        let other_key = CredentialKey::new("rotated").unwrap();
        assert_ne!(base, derive_member_hash(&other_key, &org("org-1"), &member("m1"), "m1@x.com"));
    }

    #[test]
    fn fields_are_length_delimited() {
        let a = derive_member_hash(&key(), &org("ab"), &member("c"), "e@x");
        let b = derive_member_hash(&key(), &org("a"), &member("bc"), "e@x");
        assert_ne!(a, b);
    }

    #[test]
    fn guest_hashes_are_prefixed_and_unique() {
        let a = new_guest_hash();
        let b = new_guest_hash();
        assert!(is_guest_credential(a.as_str()));
        assert_ne!(a, b);
    }

    #[test]
    fn credential_serializes_owner_fields() {
        let credential = Credential {
            hash: CredentialHash::parse("abc").unwrap(),
            expiry: Utc::now(),
            owner: CredentialOwner::Member(member("m1")),
        };
        let json = serde_json::to_value(&credential).unwrap();
        assert_eq!(json["owner_type"], "member");
        assert_eq!(json["owner_id"], "m1");
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: derivation is deterministic and never enters the guest namespace.
        #[test]
        fn member_hash_is_deterministic(
            o in "[a-z0-9-]{1,16}",
            m in "[a-zA-Z0-9]{1,24}",
            email in "[a-z]{1,8}@[a-z]{1,8}\\.com",
        ) {
            let first = derive_member_hash(&key(), &org(&o), &member(&m), &email);
            let second = derive_member_hash(&key(), &org(&o), &member(&m), &email);
            prop_assert_eq!(&first, &second);
            prop_assert!(!is_guest_credential(first.as_str()));
            prop_assert_eq!(first.as_str().len(), 64);
        }
    }
}
