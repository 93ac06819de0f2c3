//! `gatepass-auth` — authenticated principal boundary.
//!
//! The identity provider is external: this crate only models what it hands
//! us (a principal bound to one organization) and checks tenant/role rules.
//! It is intentionally decoupled from HTTP and storage.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod principal;
pub mod roles;

pub use authorize::{AuthzError, ensure_tenant, require_any_role};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtValidator};
pub use principal::{Principal, PrincipalId};
pub use roles::Role;
