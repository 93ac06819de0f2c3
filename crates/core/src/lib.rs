//! `gatepass-core` — shared domain building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod clock;
pub mod credential_hash;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use clock::{Clock, FixedClock, SystemClock};
pub use credential_hash::CredentialHash;
pub use entity::{Entity, TenantOwned};
pub use error::{DomainError, DomainResult};
pub use id::{AccessLogId, GuestId, MemberId, OrganizationId};
pub use value_object::ValueObject;
