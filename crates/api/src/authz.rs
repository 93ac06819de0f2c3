//! API-side role guard.
//!
//! Route-level role checks run before any service call. Finer ownership
//! rules (member self-issue, host-only revocation) live in the services.

use axum::http::StatusCode;
use axum::response::Response;

use gatepass_auth::{Principal, Role, require_any_role};

use crate::app::errors;

/// Allow the request through when the principal holds one of `roles`
/// (admins always pass).
pub fn require_roles(principal: &Principal, roles: &[Role]) -> Result<(), Response> {
    require_any_role(principal, roles).map_err(|e| {
        tracing::debug!(principal_id = %principal.principal_id, error = %e, "role check failed");
        errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string())
    })
}

/// Guards and admins: scanning and audit queries.
pub fn require_gate_staff(principal: &Principal) -> Result<(), Response> {
    require_roles(principal, &[Role::GUARD])
}

pub fn require_admin(principal: &Principal) -> Result<(), Response> {
    require_roles(principal, &[Role::ADMIN])
}
