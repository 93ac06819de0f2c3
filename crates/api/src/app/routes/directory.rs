//! Roster seeding for the caller's organization (admin only).

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use gatepass_auth::Principal;
use gatepass_core::{MemberId, TenantOwned};
use gatepass_directory::{Member, Organization, RegisterMember};
use gatepass_infra::store::MemberDirectory;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;

pub fn router() -> Router {
    Router::new()
        .route("/members", get(list_members).post(register_member))
        .route("/members/:id/deactivate", post(deactivate_member))
        .route("/members/:id/activate", post(activate_member))
}

pub async fn upsert_organization(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<dto::UpsertOrganizationRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(&principal) {
        return resp;
    }

    let org = match Organization::new(principal.organization_id.clone(), body.name, body.community_type) {
        Ok(o) => o,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.directory.upsert_organization(org.clone()) {
        return errors::store_error_to_response(e);
    }

    (StatusCode::OK, Json(org)).into_response()
}

pub async fn register_member(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<dto::RegisterMemberRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(&principal) {
        return resp;
    }

    let member_id = match body.member_id {
        Some(raw) => match MemberId::parse(raw) {
            Ok(id) => id,
            Err(e) => return errors::domain_error_to_response(e),
        },
        None => MemberId::new(),
    };

    let member = match Member::register(RegisterMember {
        member_id,
        organization_id: principal.organization_id.clone(),
        name: body.name,
        email: body.email,
        access_level: body.access_level,
        profile: body.profile,
    }) {
        Ok(m) => m,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let view = dto::MemberView::from(&member);
    if let Err(e) = services.directory.insert_member(member) {
        return errors::store_error_to_response(e);
    }

    tracing::info!(member_id = %view.id, organization_id = %view.organization_id, "member registered");
    (StatusCode::CREATED, Json(view)).into_response()
}

pub async fn deactivate_member(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    set_member_active(&services, &principal, id, false)
}

pub async fn activate_member(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    set_member_active(&services, &principal, id, true)
}

fn set_member_active(
    services: &AppServices,
    principal: &Principal,
    id: String,
    active: bool,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(principal) {
        return resp;
    }

    let member_id = match MemberId::parse(id) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.directory.member(&member_id) {
        Ok(Some(m)) if m.organization_id() == &principal.organization_id => {}
        Ok(_) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "member not found"),
        Err(e) => return errors::store_error_to_response(e),
    }

    let member = match services.directory.set_active(&member_id, active) {
        Ok(m) => m,
        Err(e) => return errors::store_error_to_response(e),
    };

    tracing::info!(member_id = %member_id, active, "member activation changed");
    (StatusCode::OK, Json(dto::MemberView::from(&member))).into_response()
}

pub async fn list_members(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(&principal) {
        return resp;
    }

    match services.directory.list_members(&principal.organization_id) {
        Ok(members) => {
            let views: Vec<dto::MemberView> = members.iter().map(dto::MemberView::from).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
