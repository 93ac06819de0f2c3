//! `gatepass-credentials` — credential issuance and validation rules.
//!
//! Everything here is pure: no IO, no clocks, no locks. Callers pass `now`
//! and already-resolved records; the infra layer owns lookups and writes.

pub mod access_log;
pub mod credential;
pub mod decision;
pub mod error;
pub mod guest;
pub mod window;

pub use access_log::{AccessLogEntry, GuardContext, LogStream, SubjectType};
pub use credential::{
    Credential, CredentialKey, CredentialOwner, GUEST_CREDENTIAL_PREFIX, derive_member_hash,
    is_guest_credential, new_guest_hash,
};
pub use decision::{Decision, DenialReason, GrantPayload, Subject, evaluate};
pub use error::{CredentialKeyError, IssuanceError};
pub use guest::{Guest, GuestPass};
pub use window::{ValidityWindow, WindowPosition};
