//! Opaque credential hash presented at the gate.

use serde::{Deserialize, Serialize};

use crate::{DomainError, ValueObject};

/// The opaque string encoded in a displayed credential.
///
/// Member and guest credentials share this type; which one a value refers
/// to is decided by its namespace (see `gatepass-credentials`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialHash(String);

impl CredentialHash {
    /// Wrap a presented or derived value. Surrounding whitespace from
    /// scanners and manual entry is stripped.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, DomainError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("credential hash cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Wrap a value minted by the issuer (hex digest or prefixed token).
    ///
    /// Minted values are never empty, so no validation is performed.
    pub fn minted(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for CredentialHash {}

impl core::fmt::Display for CredentialHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CredentialHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
