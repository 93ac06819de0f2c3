//! Entity trait: identity + continuity across state changes.

use crate::OrganizationId;

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// An entity that lives inside exactly one organization.
///
/// Stores use this to key records by `(organization, id)` and to reject
/// writes that would move a record across the tenant boundary.
pub trait TenantOwned: Entity {
    fn organization_id(&self) -> &OrganizationId;
}
