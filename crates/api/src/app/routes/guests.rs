use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use gatepass_auth::Principal;
use gatepass_core::{CredentialHash, GuestId, MemberId};
use gatepass_infra::GuestPassRequest;

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/guest-passes", post(issue_guest_pass))
        .route("/guests/:id/passes", get(list_active_passes))
        .route("/guests/:id/passes/:hash/revoke", post(revoke_pass))
}

pub async fn issue_guest_pass(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<GuestPassRequest>,
) -> axum::response::Response {
    match services.guest_passes.issue(&principal, body) {
        Ok(issued) => (StatusCode::CREATED, Json(issued)).into_response(),
        Err(e) => errors::issuance_error_to_response(e),
    }
}

pub async fn list_active_passes(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let guest_id = match GuestId::parse(id) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.guest_passes.list_active_for(&principal, &guest_id) {
        Ok(passes) => (StatusCode::OK, Json(passes)).into_response(),
        Err(e) => errors::issuance_error_to_response(e),
    }
}

pub async fn revoke_pass(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path((id, hash)): Path<(String, String)>,
) -> axum::response::Response {
    let guest_id = match GuestId::parse(id) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let hash = match CredentialHash::parse(&hash) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.guest_passes.revoke(&principal, &guest_id, &hash) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::issuance_error_to_response(e),
    }
}

pub async fn list_guests_for_host(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let host = match MemberId::parse(id) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.guest_passes.guests_for(&principal, &host) {
        Ok(guests) => (StatusCode::OK, Json(guests)).into_response(),
        Err(e) => errors::issuance_error_to_response(e),
    }
}
