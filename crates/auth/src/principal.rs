use core::str::FromStr;
use serde::{Deserialize, Serialize};

use gatepass_core::{DomainError, MemberId, OrganizationId};

use crate::Role;

/// Identity of an authenticated principal as issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    pub fn parse(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::invalid_id("PrincipalId: empty"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PrincipalId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// An authenticated principal acting within exactly one organization.
///
/// This is passed explicitly into every issuance/validation call. The
/// `organization_id` comes from the identity provider and is the only tenant
/// binding the core trusts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub principal_id: PrincipalId,
    pub organization_id: OrganizationId,
    pub display_name: String,
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn new(
        principal_id: PrincipalId,
        organization_id: OrganizationId,
        display_name: impl Into<String>,
        roles: Vec<Role>,
    ) -> Self {
        Self {
            principal_id,
            organization_id,
            display_name: display_name.into(),
            roles,
        }
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(&Role::ADMIN)
    }

    /// Whether this principal is the member identified by `member_id`.
    ///
    /// Members sign in with the same id their member record carries.
    pub fn is_member(&self, member_id: &MemberId) -> bool {
        self.principal_id.as_str() == member_id.as_str()
    }
}
