//! Grant/deny rules shared by the member and guest paths.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use gatepass_core::{Entity, GuestId, MemberId};
use gatepass_directory::{AccessLevel, Member};

use crate::{Guest, GuestPass, SubjectType, ValidityWindow, WindowPosition};

/// Why a scan was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// No credential matches anywhere.
    NotFound,
    /// The credential belongs to another organization.
    CrossTenantMismatch,
    Expired,
    NotYetValid,
    /// The subject or pass was deactivated; needs administrative action.
    Inactive,
}

impl DenialReason {
    pub fn code(&self) -> &'static str {
        match self {
            DenialReason::NotFound => "not_found",
            DenialReason::CrossTenantMismatch => "cross_tenant_mismatch",
            DenialReason::Expired => "expired",
            DenialReason::NotYetValid => "not_yet_valid",
            DenialReason::Inactive => "inactive",
        }
    }
}

impl core::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

/// What the guard sees on a granted scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "subject_type", rename_all = "lowercase")]
pub enum GrantPayload {
    Member {
        subject_id: MemberId,
        name: String,
        access_level: AccessLevel,
        home_address: Option<String>,
        vehicle_info: Option<String>,
    },
    Guest {
        subject_id: GuestId,
        name: String,
        host_member_id: MemberId,
        purpose: String,
        valid_until: DateTime<Utc>,
    },
}

/// The validator's typed output. Denial is an expected outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Decision {
    Granted { payload: GrantPayload },
    Denied { reason: DenialReason, message: String },
}

impl Decision {
    pub fn denied(reason: DenialReason, message: impl Into<String>) -> Self {
        Decision::Denied {
            reason,
            message: message.into(),
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, Decision::Granted { .. })
    }

    pub fn denial_reason(&self) -> Option<DenialReason> {
        match self {
            Decision::Granted { .. } => None,
            Decision::Denied { reason, .. } => Some(*reason),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Decision::Granted { .. } => None,
            Decision::Denied { message, .. } => Some(message),
        }
    }
}

/// A resolved credential owner, looked up once per scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Member(Member),
    Guest { guest: Guest, pass: GuestPass },
}

impl Subject {
    pub fn subject_type(&self) -> SubjectType {
        match self {
            Subject::Member(_) => SubjectType::Member,
            Subject::Guest { .. } => SubjectType::Guest,
        }
    }

    pub fn subject_id(&self) -> &str {
        match self {
            Subject::Member(m) => m.id().as_str(),
            Subject::Guest { guest, .. } => guest.id().as_str(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Subject::Member(m) => m.name(),
            Subject::Guest { guest, .. } => guest.name(),
        }
    }

    fn validity(&self) -> Validity {
        match self {
            Subject::Member(m) => Validity {
                active: m.is_active(),
                // A matched member always has an expiry; treat a missing one as lapsed.
                window: ValidityWindow::until(m.credential_expiry().unwrap_or(DateTime::<Utc>::MIN_UTC)),
            },
            Subject::Guest { pass, .. } => Validity {
                active: pass.is_active,
                window: pass.window,
            },
        }
    }

    fn grant_payload(&self) -> GrantPayload {
        match self {
            Subject::Member(m) => GrantPayload::Member {
                subject_id: m.id().clone(),
                name: m.name().to_string(),
                access_level: m.access_level(),
                home_address: m.profile().home_address.clone(),
                vehicle_info: m.profile().vehicle_info.clone(),
            },
            Subject::Guest { guest, pass } => GrantPayload::Guest {
                subject_id: guest.id().clone(),
                name: guest.name().to_string(),
                host_member_id: guest.host_member_id().clone(),
                purpose: pass.purpose.clone(),
                valid_until: pass.window.end(),
            },
        }
    }
}

struct Validity {
    active: bool,
    window: ValidityWindow,
}

/// Apply the active and time-window rules to a resolved subject.
///
/// Order: inactive, then not-yet-valid, then expired. Tenant scoping has
/// already happened by the time a `Subject` exists.
pub fn evaluate(subject: &Subject, now: DateTime<Utc>) -> Decision {
    let validity = subject.validity();
    let label = match subject.subject_type() {
        SubjectType::Member => "member credential",
        SubjectType::Guest => "guest pass",
    };

    if !validity.active {
        return Decision::denied(DenialReason::Inactive, format!("{label} is inactive"));
    }

    match validity.window.position(now) {
        WindowPosition::Before => {
            let start = validity.window.start();
            Decision::denied(
                DenialReason::NotYetValid,
                format!("{label} is not valid until {}", start.to_rfc3339_opts(SecondsFormat::Secs, true)),
            )
        }
        WindowPosition::After => Decision::denied(
            DenialReason::Expired,
            format!(
                "{label} expired at {}",
                validity.window.end().to_rfc3339_opts(SecondsFormat::Secs, true)
            ),
        ),
        WindowPosition::Within => Decision::Granted {
            payload: subject.grant_payload(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use gatepass_core::{CredentialHash, OrganizationId};
    use gatepass_directory::{MemberProfile, RegisterMember};

    use crate::new_guest_hash;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
    }

    fn member(active: bool, expiry: DateTime<Utc>) -> Subject {
        let mut m = Member::register(RegisterMember {
            member_id: MemberId::parse("m1").unwrap(),
            organization_id: OrganizationId::parse("org-1").unwrap(),
            name: "Member One".to_string(),
            email: "m1@x.com".to_string(),
            access_level: AccessLevel::Resident,
            profile: MemberProfile {
                home_address: Some("Tower B, 12F".to_string()),
                vehicle_info: Some("KA-01-1234".to_string()),
            },
        })
        .unwrap();
        m.record_credential(CredentialHash::parse("abc").unwrap(), expiry);
        if !active {
            m.deactivate();
        }
        Subject::Member(m)
    }

    fn guest(active: bool, start: DateTime<Utc>, end: DateTime<Utc>) -> Subject {
        let g = Guest::register(
            GuestId::parse("g-1").unwrap(),
            OrganizationId::parse("org-1").unwrap(),
            MemberId::parse("m1").unwrap(),
            "Visitor",
            "delivery",
        )
        .unwrap();
        let mut pass = GuestPass::new(new_guest_hash(), ValidityWindow::new(start, end).unwrap(), "delivery", start);
        pass.is_active = active;
        Subject::Guest { guest: g, pass }
    }

    #[test]
    fn active_member_before_expiry_is_granted_with_profile() {
        let d = evaluate(&member(true, t0() + Duration::hours(24)), t0());
        let Decision::Granted { payload: GrantPayload::Member { home_address, vehicle_info, access_level, .. } } = d else {
            panic!("expected member grant");
        };
        assert_eq!(home_address.as_deref(), Some("Tower B, 12F"));
        assert_eq!(vehicle_info.as_deref(), Some("KA-01-1234"));
        assert_eq!(access_level, AccessLevel::Resident);
    }

    #[test]
    fn member_at_exact_expiry_is_still_granted() {
        assert!(evaluate(&member(true, t0()), t0()).is_granted());
    }

    #[test]
    fn member_after_expiry_is_expired() {
        let d = evaluate(&member(true, t0()), t0() + Duration::seconds(1));
        assert_eq!(d.denial_reason(), Some(DenialReason::Expired));
    }

    #[test]
    fn inactive_wins_over_expired() {
        let d = evaluate(&member(false, t0() - Duration::hours(1)), t0());
        assert_eq!(d.denial_reason(), Some(DenialReason::Inactive));
    }

    #[test]
    fn guest_window_boundaries_are_inclusive() {
        let start = t0();
        let end = t0() + Duration::hours(2);
        let s = guest(true, start, end);
        assert!(evaluate(&s, start).is_granted());
        assert!(evaluate(&s, end).is_granted());
        assert_eq!(
            evaluate(&s, start - Duration::seconds(1)).denial_reason(),
            Some(DenialReason::NotYetValid)
        );
        assert_eq!(
            evaluate(&s, end + Duration::seconds(1)).denial_reason(),
            Some(DenialReason::Expired)
        );
    }

    #[test]
    fn not_yet_valid_message_names_the_start() {
        let s = guest(true, t0(), t0() + Duration::hours(2));
        let d = evaluate(&s, t0() - Duration::hours(1));
        assert!(d.message().unwrap().contains("2024-06-01T09:00:00Z"));
    }

    #[test]
    fn revoked_guest_pass_is_inactive() {
        let s = guest(false, t0(), t0() + Duration::hours(2));
        assert_eq!(evaluate(&s, t0()).denial_reason(), Some(DenialReason::Inactive));
    }

    #[test]
    fn guest_grant_identifies_guest_and_host() {
        let s = guest(true, t0(), t0() + Duration::hours(2));
        let Decision::Granted { payload: GrantPayload::Guest { subject_id, host_member_id, .. } } = evaluate(&s, t0()) else {
            panic!("expected guest grant");
        };
        assert_eq!(subject_id.as_str(), "g-1");
        assert_eq!(host_member_id.as_str(), "m1");
    }
}
