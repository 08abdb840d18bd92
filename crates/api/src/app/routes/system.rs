use axum::{extract::Extension, http::StatusCode, response::Response};
use serde_json::json;

use crate::app::errors;
use crate::context::CallerContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(caller): Extension<CallerContext>) -> Response {
    let party = caller.party();
    errors::data(
        StatusCode::OK,
        json!({
            "party_id": party.party_id.to_string(),
            "display_name": party.display_name,
        }),
    )
}
