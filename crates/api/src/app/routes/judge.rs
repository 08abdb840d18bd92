use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::Response,
    routing::post,
    Json, Router,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::CallerContext;

pub fn router() -> Router {
    Router::new()
        .route("/:id/argument", post(submit_argument))
        .route("/:id/verdict", post(request_verdict))
}

pub async fn submit_argument(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    body: Result<Json<dto::SubmitArgumentRequest>, JsonRejection>,
) -> Response {
    let case_id = match dto::parse_case_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let body = match dto::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    match services
        .submit_argument(case_id, caller.party(), body.side, body.text)
        .await
    {
        Ok(receipt) => errors::data(StatusCode::CREATED, receipt),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn request_verdict(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
) -> Response {
    let case_id = match dto::parse_case_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.request_verdict(case_id, caller.party()).await {
        Ok(receipt) => errors::data(StatusCode::OK, receipt),
        Err(e) => errors::service_error_to_response(e),
    }
}
