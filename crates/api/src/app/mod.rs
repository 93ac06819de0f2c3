//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: stores and credential services shared by all handlers
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use gatepass_core::{Clock, SystemClock};
use gatepass_credentials::CredentialKeyError;
use gatepass_infra::GatepassConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &GatepassConfig) -> Result<Router, CredentialKeyError> {
    build_app_with_clock(config, Arc::new(SystemClock))
}

/// Same as [`build_app`] with an explicit time source.
pub fn build_app_with_clock(config: &GatepassConfig, clock: Arc<dyn Clock>) -> Result<Router, CredentialKeyError> {
    let jwt = Arc::new(gatepass_auth::Hs256JwtValidator::new(config.jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState { jwt };

    let services = Arc::new(services::build_services(config, clock)?);

    // Protected routes: require a valid bearer token.
    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(auth_state, middleware::auth_middleware));

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(ServiceBuilder::new()))
}
