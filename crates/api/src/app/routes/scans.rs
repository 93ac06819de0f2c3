use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use gatepass_auth::Principal;
use gatepass_infra::guard_context;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;

/// Validate a scanned or typed credential at the caller's gate.
///
/// Denials are `200` with `granted: false`; only store failures are errors.
pub async fn scan(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<dto::ScanRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_gate_staff(&principal) {
        return resp;
    }

    let guard = guard_context(&principal);
    match services.validator.validate(&body.credential, &guard) {
        Ok(decision) => (StatusCode::OK, Json(dto::ScanResponse::from(decision))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
