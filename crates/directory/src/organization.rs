use serde::{Deserialize, Serialize};

use gatepass_core::{DomainError, DomainResult, Entity, OrganizationId};

/// How dwellings are laid out in a community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommunityType {
    HouseBased,
    TowerBased,
    Mixed,
}

/// A gated community: the tenant boundary for every other record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    id: OrganizationId,
    name: String,
    community_type: CommunityType,
}

impl Organization {
    pub fn new(
        id: OrganizationId,
        name: impl Into<String>,
        community_type: CommunityType,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("organization name cannot be empty"));
        }
        Ok(Self {
            id,
            name: name.trim().to_string(),
            community_type,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn community_type(&self) -> CommunityType {
        self.community_type
    }
}

impl Entity for Organization {
    type Id = OrganizationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
