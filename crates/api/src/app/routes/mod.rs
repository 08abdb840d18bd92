use axum::{routing::get, Router};

pub mod cases;
pub mod judge;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/cases", cases::router())
        .nest("/judge", judge::router())
}
