use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
};

use gatepass_auth::Principal;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;

pub async fn list_access_logs(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<dto::AccessLogQuery>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_gate_staff(&principal) {
        return resp;
    }

    match services
        .access_logger
        .list(&principal.organization_id, query.stream.into(), query.subject.as_deref())
    {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
