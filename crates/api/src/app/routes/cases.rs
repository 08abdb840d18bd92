use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::Response,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::CallerContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_case).get(list_my_cases))
        .route("/public", get(list_open_cases))
        .route("/:id", get(get_case))
        .route("/:id/join", post(join_case))
        .route("/:id/status", put(change_status))
}

pub async fn create_case(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    body: Result<Json<dto::CreateCaseRequest>, JsonRejection>,
) -> Response {
    let body = match dto::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    match services.open_case(caller.party(), body.into()).await {
        Ok(view) => errors::data(StatusCode::CREATED, view),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_my_cases(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
) -> Response {
    match services.list_my_cases(caller.party()).await {
        Ok(items) => errors::data(StatusCode::OK, json!({ "items": items })),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_open_cases(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.list_open_cases().await {
        Ok(items) => errors::data(StatusCode::OK, json!({ "items": items })),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_case(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
) -> Response {
    let case_id = match dto::parse_case_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.get_hearing_view(case_id, caller.party()).await {
        Ok(view) => errors::data(StatusCode::OK, view),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn join_case(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
) -> Response {
    let case_id = match dto::parse_case_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.join_as_side_b(case_id, caller.party()).await {
        Ok(view) => errors::data(StatusCode::OK, view),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn change_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    body: Result<Json<dto::ChangeStatusRequest>, JsonRejection>,
) -> Response {
    let case_id = match dto::parse_case_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let body = match dto::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    match services.change_status(case_id, caller.party(), body.status).await {
        Ok(view) => errors::data(StatusCode::OK, view),
        Err(e) => errors::service_error_to_response(e),
    }
}
