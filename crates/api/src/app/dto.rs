use std::str::FromStr;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use arbitra_core::CaseId;
use arbitra_hearing::{CaseDetails, CaseStatus, Side};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateCaseRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub jurisdiction: String,
}

impl From<CreateCaseRequest> for CaseDetails {
    fn from(body: CreateCaseRequest) -> Self {
        CaseDetails {
            title: body.title,
            description: body.description,
            category: body.category,
            jurisdiction: body.jurisdiction,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: CaseStatus,
}

#[derive(Debug, Deserialize)]
pub struct SubmitArgumentRequest {
    /// Missing text is treated like blank text (rejected as empty).
    #[serde(default)]
    pub text: String,
    pub side: Side,
}

// -------------------------
// Extraction helpers
// -------------------------

pub fn parse_case_id(raw: &str) -> Result<CaseId, Response> {
    CaseId::from_str(raw)
        .map_err(|e| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()))
}

/// Unwrap a JSON body, reporting malformed input in the error envelope.
pub fn body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    body.map(|Json(v)| v).map_err(|rejection| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_request", rejection.body_text())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_request_reads_side_letters() {
        let req: SubmitArgumentRequest =
            serde_json::from_str(r#"{"text":"hello","side":"B"}"#).unwrap();
        assert_eq!(req.side, Side::B);
        assert_eq!(req.text, "hello");

        let bad_side = r#"{"text":"x","side":"C"}"#;
        assert!(serde_json::from_str::<SubmitArgumentRequest>(bad_side).is_err());
    }

    #[test]
    fn status_request_uses_snake_case() {
        let req: ChangeStatusRequest = serde_json::from_str(r#"{"status":"in_hearing"}"#).unwrap();
        assert_eq!(req.status, CaseStatus::InHearing);
    }

    #[test]
    fn bad_case_id_is_invalid_id() {
        let response = parse_case_id("not-a-uuid").unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(parse_case_id(&CaseId::new().to_string()).is_ok());
    }
}
