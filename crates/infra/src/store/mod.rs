//! Tenant-isolated record storage abstractions.
//!
//! Every lookup on the validation path is an indexed point read keyed by
//! `(organization, credential hash)`. A second, global hash index exists
//! only to tell a cross-tenant credential apart from an unknown one.

pub mod access_logs;
pub mod guests;
pub mod members;

pub use access_logs::{AccessLogStore, InMemoryAccessLogStore, LogWriteError};
pub use guests::{GuestRepository, InMemoryGuestRepository};
pub use members::{InMemoryMemberDirectory, MemberDirectory};
