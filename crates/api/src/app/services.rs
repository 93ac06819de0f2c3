//! Service wiring: one set of in-memory stores shared by every service.

use std::sync::Arc;

use gatepass_core::Clock;
use gatepass_credentials::{CredentialKey, CredentialKeyError};
use gatepass_infra::store::{InMemoryAccessLogStore, InMemoryGuestRepository, InMemoryMemberDirectory};
use gatepass_infra::{AccessLogger, CredentialIssuer, CredentialValidator, GatepassConfig, GuestCredentialService};

pub type Directory = Arc<InMemoryMemberDirectory>;
pub type Guests = Arc<InMemoryGuestRepository>;
pub type AuditStore = Arc<InMemoryAccessLogStore>;

pub struct AppServices {
    pub directory: Directory,
    pub issuer: CredentialIssuer<Directory>,
    pub guest_passes: GuestCredentialService<Directory, Guests>,
    pub validator: CredentialValidator<Directory, Guests, AuditStore>,
    pub access_logger: Arc<AccessLogger<AuditStore>>,
}

pub fn build_services(config: &GatepassConfig, clock: Arc<dyn Clock>) -> Result<AppServices, CredentialKeyError> {
    let key = CredentialKey::new(config.credential_secret.as_bytes())?;

    let directory: Directory = Arc::new(InMemoryMemberDirectory::new());
    let guests: Guests = Arc::new(InMemoryGuestRepository::new());
    let access_logger = Arc::new(AccessLogger::new(Arc::new(InMemoryAccessLogStore::new())));

    Ok(AppServices {
        issuer: CredentialIssuer::new(directory.clone(), key, config.member_credential_ttl, clock.clone()),
        guest_passes: GuestCredentialService::new(directory.clone(), guests.clone(), clock.clone()),
        validator: CredentialValidator::new(directory.clone(), guests, access_logger.clone(), clock),
        directory,
        access_logger,
    })
}
