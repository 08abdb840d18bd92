//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: adapter selection (repository, verdict generator)
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request DTOs and extraction helpers
//! - `errors.rs`: the response envelope and error mapping

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use arbitra_auth::{Hs256IdentityProvider, IdentityProvider};

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router from configuration (entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let identity = Arc::new(Hs256IdentityProvider::new(config.jwt_secret.as_bytes()));
    let services = Arc::new(services::build_services(config).await?);
    Ok(build_router(services, identity))
}

/// Build the router around already-wired services.
pub fn build_router(services: Arc<AppServices>, identity: Arc<dyn IdentityProvider>) -> Router {
    let auth_state = middleware::AuthState { identity };

    // Protected routes: require a resolved caller.
    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(ServiceBuilder::new())
}
