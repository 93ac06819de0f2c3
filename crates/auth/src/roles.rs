use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier carried in the principal's token.
///
/// Roles are opaque strings at this layer; the well-known ones used by the
/// access-control core are exposed as constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    /// Community administrator: may act on any record in its organization.
    pub const ADMIN: Role = Role(Cow::Borrowed("admin"));
    /// Security personnel operating a scanner at the gate.
    pub const GUARD: Role = Role(Cow::Borrowed("guard"));
    /// Resident holding a member credential.
    pub const MEMBER: Role = Role(Cow::Borrowed("member"));

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
