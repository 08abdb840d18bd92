use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use arbitra_auth::IdentityProvider;

use crate::app::errors::json_error;
use crate::context::CallerContext;

#[derive(Clone)]
pub struct AuthState {
    pub identity: Arc<dyn IdentityProvider>,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = match extract_bearer(req.headers()) {
        Ok(token) => token,
        Err(status) => return unauthorized(status, "missing or malformed bearer token"),
    };

    let identity = match state.identity.resolve(token, Utc::now()) {
        Ok(identity) => identity,
        Err(e) => {
            tracing::debug!(error = %e, "rejected bearer token");
            return unauthorized(StatusCode::UNAUTHORIZED, "invalid bearer token");
        }
    };

    req.extensions_mut().insert(CallerContext::from(identity));

    next.run(req).await
}

fn unauthorized(status: StatusCode, message: &'static str) -> Response {
    json_error(status, "unauthorized", message).into_response()
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}
