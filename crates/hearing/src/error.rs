//! Hearing rule violations.

use thiserror::Error;

use crate::case::{CaseStatus, Side};

/// Broad category of a rule violation, used by callers to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input; nothing changed.
    Validation,
    /// The caller may not perform this action on this case.
    Authorization,
    /// The case is not in a state that allows the action. Refresh and retry
    /// with corrected intent.
    StateConflict,
    /// The case does not exist.
    NotFound,
}

/// A rejected hearing command. No state change accompanies any of these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HearingError {
    #[error("invalid case: {0}")]
    InvalidCase(String),

    #[error("case already exists")]
    AlreadyExists,

    #[error("case not found")]
    NotFound,

    #[error("argument content must not be empty")]
    EmptyArgument,

    #[error("only the side A party may change the case status")]
    Forbidden,

    #[error("side {0} is not assigned to the caller")]
    NotYourSide(Side),

    #[error("the side A party cannot also join as side B")]
    SelfAssignment,

    #[error("side B is already assigned")]
    AlreadyAssigned,

    #[error("cannot enter the hearing until both sides are assigned")]
    InvalidTransition,

    #[error("side {side} has used all {limit} rounds")]
    RoundLimitExceeded { side: Side, limit: u32 },

    #[error("case is not in hearing (status: {0})")]
    NotInHearing(CaseStatus),
}

impl HearingError {
    /// Stable machine-readable code (used on the wire).
    pub fn code(&self) -> &'static str {
        match self {
            HearingError::InvalidCase(_) => "invalid_case",
            HearingError::AlreadyExists => "already_exists",
            HearingError::NotFound => "not_found",
            HearingError::EmptyArgument => "empty_argument",
            HearingError::Forbidden => "forbidden",
            HearingError::NotYourSide(_) => "not_your_side",
            HearingError::SelfAssignment => "self_assignment",
            HearingError::AlreadyAssigned => "already_assigned",
            HearingError::InvalidTransition => "invalid_transition",
            HearingError::RoundLimitExceeded { .. } => "round_limit_exceeded",
            HearingError::NotInHearing(_) => "not_in_hearing",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            HearingError::InvalidCase(_) | HearingError::EmptyArgument => ErrorKind::Validation,
            HearingError::Forbidden
            | HearingError::NotYourSide(_)
            | HearingError::SelfAssignment => ErrorKind::Authorization,
            HearingError::AlreadyExists
            | HearingError::AlreadyAssigned
            | HearingError::InvalidTransition
            | HearingError::RoundLimitExceeded { .. }
            | HearingError::NotInHearing(_) => ErrorKind::StateConflict,
            HearingError::NotFound => ErrorKind::NotFound,
        }
    }
}
