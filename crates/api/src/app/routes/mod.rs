use axum::{
    Router,
    routing::{get, post, put},
};

pub mod access_logs;
pub mod credentials;
pub mod directory;
pub mod guests;
pub mod scans;
pub mod system;

/// Router for all authenticated (tenant-scoped) endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/organization", put(directory::upsert_organization))
        .nest("/directory", directory::router())
        .route("/members/:id/credential", post(credentials::issue_member_credential))
        .route("/members/:id/guests", get(guests::list_guests_for_host))
        .merge(guests::router())
        .route("/scans", post(scans::scan))
        .route("/access-logs", get(access_logs::list_access_logs))
}
