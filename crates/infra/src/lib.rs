//! Infrastructure layer: record stores, credential services, config.
//!
//! Services take their stores as generic parameters (usually `Arc<...>` of an
//! in-memory implementation) and an injected [`gatepass_core::Clock`].

pub mod access_logger;
pub mod config;
pub mod error;
pub mod guest_credentials;
pub mod issuer;
pub mod store;
pub mod validator;


pub use access_logger::AccessLogger;
pub use config::{ConfigError, GatepassConfig};
pub use error::StoreError;
pub use guest_credentials::{GuestCredentialService, GuestPassRequest, GuestRef, IssuedGuestPass};
pub use issuer::CredentialIssuer;
pub use validator::{CredentialValidator, guard_context};
