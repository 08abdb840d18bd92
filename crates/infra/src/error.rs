//! Orchestration-level error.

use std::time::Duration;

use thiserror::Error;

use arbitra_hearing::{ErrorKind, HearingError};

use crate::case_repository::RepositoryError;
use crate::verdict::GeneratorError;

/// Failure of a hearing service operation.
///
/// External-dependency failures (`VerdictGenerator*`) never leave a partial
/// write behind and are safe for the caller to retry.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A hearing rule rejected the command.
    #[error(transparent)]
    Hearing(HearingError),

    #[error("case not found")]
    NotFound,

    /// Version conflict that survived every retry (or a verdict raced a write).
    #[error("concurrent modification: {0}")]
    Conflict(String),

    #[error("verdict generator unavailable: {0}")]
    VerdictGeneratorUnavailable(String),

    #[error("verdict generator timed out after {0:?}")]
    VerdictGeneratorTimeout(Duration),

    #[error("repository failure: {0}")]
    Repository(String),
}

impl ServiceError {
    /// Stable machine-readable code (used on the wire).
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Hearing(e) => e.code(),
            ServiceError::NotFound => "not_found",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::VerdictGeneratorUnavailable(_) => "verdict_generator_unavailable",
            ServiceError::VerdictGeneratorTimeout(_) => "verdict_generator_timeout",
            ServiceError::Repository(_) => "repository_error",
        }
    }

    pub fn hearing_kind(&self) -> Option<ErrorKind> {
        match self {
            ServiceError::Hearing(e) => Some(e.kind()),
            _ => None,
        }
    }
}

impl From<HearingError> for ServiceError {
    fn from(value: HearingError) -> Self {
        match value {
            HearingError::NotFound => ServiceError::NotFound,
            other => ServiceError::Hearing(other),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Conflict(msg) => ServiceError::Conflict(msg),
            RepositoryError::AlreadyExists => ServiceError::Hearing(HearingError::AlreadyExists),
            RepositoryError::Storage(msg) => ServiceError::Repository(msg),
        }
    }
}

impl From<GeneratorError> for ServiceError {
    fn from(value: GeneratorError) -> Self {
        ServiceError::VerdictGeneratorUnavailable(value.to_string())
    }
}
