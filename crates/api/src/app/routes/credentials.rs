use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};

use gatepass_auth::Principal;
use gatepass_core::MemberId;

use crate::app::errors;
use crate::app::services::AppServices;

/// Issue (or refresh) a member's display credential.
pub async fn issue_member_credential(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let member_id = match MemberId::parse(id) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.issuer.issue(&principal, &member_id) {
        Ok(credential) => (StatusCode::OK, Json(credential)).into_response(),
        Err(e) => errors::issuance_error_to_response(e),
    }
}
