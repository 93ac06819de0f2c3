//! Gate-side credential validation.
//!
//! One call resolves the presented value inside the guard's organization,
//! decides, and hands exactly one audit entry to the [`AccessLogger`]. The
//! decision and the entry are built from the same resolved snapshot.

use std::sync::Arc;

use gatepass_auth::Principal;
use gatepass_core::{Clock, CredentialHash, OrganizationId};
use gatepass_credentials::{
    AccessLogEntry, Decision, DenialReason, GuardContext, Subject, SubjectType, evaluate, is_guest_credential,
};

use crate::StoreError;
use crate::access_logger::AccessLogger;
use crate::store::{AccessLogStore, GuestRepository, MemberDirectory};

/// Outcome of looking a credential up.
enum Resolution {
    Found(Subject),
    /// Known, but held by another organization.
    Foreign,
    Unknown,
}

/// Guard identity for a scan, from the authenticated principal.
pub fn guard_context(principal: &Principal) -> GuardContext {
    GuardContext {
        organization_id: principal.organization_id.clone(),
        guard_id: principal.principal_id.to_string(),
        guard_name: principal.display_name.clone(),
    }
}

/// A miss is cross-tenant only when another organization holds the hash. An
/// own-tenant index hit without a matching record reads as unknown.
fn classify_miss(holder: Option<OrganizationId>, guard: &GuardContext) -> Resolution {
    match holder {
        Some(org) if org != guard.organization_id => Resolution::Foreign,
        _ => Resolution::Unknown,
    }
}

pub struct CredentialValidator<D, G, L> {
    directory: D,
    guests: G,
    logger: Arc<AccessLogger<L>>,
    clock: Arc<dyn Clock>,
}

impl<D, G, L> CredentialValidator<D, G, L>
where
    D: MemberDirectory,
    G: GuestRepository,
    L: AccessLogStore,
{
    pub fn new(directory: D, guests: G, logger: Arc<AccessLogger<L>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            directory,
            guests,
            logger,
            clock,
        }
    }

    /// Decide whether `presented` admits entry at the guard's gate.
    ///
    /// Denials are ordinary `Ok` values. Only a failing record store yields
    /// `Err`; in that case no decision exists and nothing is logged. Audit
    /// write failures never surface here.
    pub fn validate(&self, presented: &str, guard: &GuardContext) -> Result<Decision, StoreError> {
        let now = self.clock.now();
        let subject_type = if is_guest_credential(presented) {
            SubjectType::Guest
        } else {
            SubjectType::Member
        };

        let resolution = match CredentialHash::parse(presented) {
            Ok(hash) => self.resolve(&hash, subject_type, guard)?,
            Err(_) => Resolution::Unknown,
        };

        let (subject, decision) = match resolution {
            Resolution::Found(subject) => {
                let decision = evaluate(&subject, now);
                (Some(subject), decision)
            }
            Resolution::Foreign => {
                tracing::warn!(
                    organization_id = %guard.organization_id,
                    guard_id = %guard.guard_id,
                    "credential from another organization presented"
                );
                (
                    None,
                    Decision::denied(
                        DenialReason::CrossTenantMismatch,
                        "credential belongs to another organization",
                    ),
                )
            }
            Resolution::Unknown => (None, Decision::denied(DenialReason::NotFound, "credential not recognized")),
        };

        let entry = AccessLogEntry::for_attempt(
            guard,
            presented.trim(),
            subject_type,
            subject.as_ref(),
            &decision,
            now,
        );
        self.logger.record(&entry);

        tracing::debug!(
            organization_id = %guard.organization_id,
            granted = decision.is_granted(),
            reason = ?decision.denial_reason(),
            "credential validated"
        );
        Ok(decision)
    }

    fn resolve(
        &self,
        hash: &CredentialHash,
        subject_type: SubjectType,
        guard: &GuardContext,
    ) -> Result<Resolution, StoreError> {
        let org = &guard.organization_id;
        match subject_type {
            SubjectType::Guest => {
                if let Some((guest, pass)) = self.guests.find_pass(org, hash)? {
                    return Ok(Resolution::Found(Subject::Guest { guest, pass }));
                }
                Ok(classify_miss(self.guests.pass_organization(hash)?, guard))
            }
            SubjectType::Member => {
                if let Some(member) = self.directory.member_by_credential(org, hash)? {
                    return Ok(Resolution::Found(Subject::Member(member)));
                }
                Ok(classify_miss(self.directory.credential_organization(hash)?, guard))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use gatepass_core::{FixedClock, OrganizationId};

    use crate::store::{InMemoryAccessLogStore, InMemoryGuestRepository, InMemoryMemberDirectory};
    use gatepass_credentials::LogStream;

    fn validator() -> (
        CredentialValidator<InMemoryMemberDirectory, InMemoryGuestRepository, InMemoryAccessLogStore>,
        Arc<AccessLogger<InMemoryAccessLogStore>>,
    ) {
        let logger = Arc::new(AccessLogger::new(InMemoryAccessLogStore::new()));
        let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()));
        let v = CredentialValidator::new(
            InMemoryMemberDirectory::new(),
            InMemoryGuestRepository::new(),
            logger.clone(),
            clock,
        );
        (v, logger)
    }

    fn guard() -> GuardContext {
        GuardContext {
            organization_id: OrganizationId::parse("org-1").unwrap(),
            guard_id: "g1".to_string(),
            guard_name: "Gate A".to_string(),
        }
    }

    #[test]
    fn blank_input_is_not_found_and_still_logged() {
        let (v, logger) = validator();
        let decision = v.validate("   ", &guard()).unwrap();
        assert_eq!(decision.denial_reason(), Some(DenialReason::NotFound));

        let logs = logger.list(&guard().organization_id, LogStream::AccessLogs, None).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].credential_hash, "");
    }

    #[test]
    fn unknown_guest_prefix_lands_in_guest_stream() {
        let (v, logger) = validator();
        let decision = v.validate("gst_nothing", &guard()).unwrap();
        assert_eq!(decision.denial_reason(), Some(DenialReason::NotFound));

        let org = &guard().organization_id;
        assert!(logger.list(org, LogStream::AccessLogs, None).unwrap().is_empty());
        let guest_logs = logger.list(org, LogStream::GuestAccessLogs, None).unwrap();
        assert_eq!(guest_logs.len(), 1);
        assert_eq!(guest_logs[0].subject_type, SubjectType::Guest);
        assert!(guest_logs[0].subject_id.is_none());
    }

    #[test]
    fn only_another_organization_makes_a_miss_cross_tenant() {
        let g = guard();
        assert!(matches!(classify_miss(None, &g), Resolution::Unknown));
        assert!(matches!(
            classify_miss(Some(g.organization_id.clone()), &g),
            Resolution::Unknown
        ));
        assert!(matches!(
            classify_miss(Some(OrganizationId::parse("org-2").unwrap()), &g),
            Resolution::Foreign
        ));
    }
}
