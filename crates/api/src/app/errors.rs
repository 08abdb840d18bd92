use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;

use arbitra_hearing::ErrorKind;
use arbitra_infra::ServiceError;

/// Success envelope: `{"data": <payload>}`.
pub fn data(status: StatusCode, payload: impl Serialize) -> Response {
    (status, axum::Json(json!({ "data": payload }))).into_response()
}

/// Failure envelope: `{"error": "<code>", "message": "<text>"}`.
pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn service_error_to_response(err: ServiceError) -> Response {
    let status = status_for(&err);
    if status.is_server_error() {
        tracing::error!(error = %err, code = err.code(), "request failed");
    }
    json_error(status, err.code(), err.to_string())
}

fn status_for(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::Hearing(e) => match e.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Authorization => StatusCode::FORBIDDEN,
            ErrorKind::StateConflict => StatusCode::CONFLICT,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
        },
        ServiceError::NotFound => StatusCode::NOT_FOUND,
        ServiceError::Conflict(_) => StatusCode::CONFLICT,
        ServiceError::VerdictGeneratorUnavailable(_) => StatusCode::BAD_GATEWAY,
        ServiceError::VerdictGeneratorTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        ServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use arbitra_hearing::{CaseStatus, HearingError, Side};

    use super::*;

    #[test]
    fn hearing_errors_map_by_kind() {
        let cases = [
            (HearingError::EmptyArgument, StatusCode::BAD_REQUEST),
            (HearingError::InvalidCase("x".into()), StatusCode::BAD_REQUEST),
            (HearingError::NotYourSide(Side::B), StatusCode::FORBIDDEN),
            (HearingError::SelfAssignment, StatusCode::FORBIDDEN),
            (HearingError::AlreadyAssigned, StatusCode::CONFLICT),
            (HearingError::NotInHearing(CaseStatus::Closed), StatusCode::CONFLICT),
            (
                HearingError::RoundLimitExceeded { side: Side::A, limit: 5 },
                StatusCode::CONFLICT,
            ),
        ];
        for (e, status) in cases {
            assert_eq!(status_for(&ServiceError::Hearing(e)), status);
        }
    }

    #[test]
    fn infrastructure_errors_have_distinct_statuses() {
        assert_eq!(status_for(&ServiceError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&ServiceError::Conflict("v".into())), StatusCode::CONFLICT);
        assert_eq!(
            status_for(&ServiceError::VerdictGeneratorUnavailable("down".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&ServiceError::VerdictGeneratorTimeout(Duration::from_secs(1))),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_for(&ServiceError::Repository("io".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
