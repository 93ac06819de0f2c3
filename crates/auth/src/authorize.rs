use thiserror::Error;

use gatepass_core::OrganizationId;

use crate::{Principal, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("tenant mismatch")]
    TenantMismatch,

    #[error("forbidden: requires one of the roles {0}")]
    Forbidden(String),
}

/// Ensure the principal acts inside `organization_id`. Callers decide how a
/// mismatch surfaces (issuance reports it as unauthorized).
///
/// - No IO
/// - No panics
pub fn ensure_tenant(principal: &Principal, organization_id: &OrganizationId) -> Result<(), AuthzError> {
    if &principal.organization_id != organization_id {
        return Err(AuthzError::TenantMismatch);
    }
    Ok(())
}

/// Require at least one of `roles`. `admin` always passes.
pub fn require_any_role(principal: &Principal, roles: &[Role]) -> Result<(), AuthzError> {
    if principal.is_admin() || roles.iter().any(|r| principal.has_role(r)) {
        return Ok(());
    }
    let wanted = roles.iter().map(Role::as_str).collect::<Vec<_>>().join(", ");
    Err(AuthzError::Forbidden(format!("[{wanted}]")))
}
