use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use gatepass_core::DomainError;
use gatepass_credentials::IssuanceError;
use gatepass_infra::StoreError;

pub fn issuance_error_to_response(err: IssuanceError) -> axum::response::Response {
    match err {
        IssuanceError::OwnerNotFound(msg) => json_error(StatusCode::NOT_FOUND, "owner_not_found", msg),
        IssuanceError::Unauthorized(msg) => json_error(StatusCode::FORBIDDEN, "unauthorized", msg),
        e @ IssuanceError::InvalidWindow { .. } => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_window", e.to_string())
        }
        IssuanceError::InvalidRequest(msg) => json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_request", msg),
        IssuanceError::Storage(msg) => {
            tracing::error!(error = %msg, "store failure during issuance");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        StoreError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        StoreError::TenantIsolation(msg) => json_error(StatusCode::FORBIDDEN, "tenant_isolation", msg),
        StoreError::Unavailable(msg) => {
            tracing::error!(error = %msg, "store unavailable");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        e => json_error(StatusCode::UNPROCESSABLE_ENTITY, "validation_error", e.to_string()),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
