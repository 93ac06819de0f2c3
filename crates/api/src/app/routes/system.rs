use axum::{Extension, Json, http::StatusCode, response::IntoResponse};

use gatepass_auth::Principal;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(principal): Extension<Principal>) -> impl IntoResponse {
    Json(serde_json::json!({
        "organization_id": principal.organization_id.to_string(),
        "principal_id": principal.principal_id.to_string(),
        "name": principal.display_name,
        "roles": principal.roles.iter().map(|r| r.as_str()).collect::<Vec<_>>(),
    }))
}
