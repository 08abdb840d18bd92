//! Infrastructure layer: case storage, the verdict oracle, and the hearing
//! orchestrator that composes them.

pub mod case_repository;
pub mod error;
pub mod hearing_service;
pub mod verdict;

mod integration_tests;

pub use error::ServiceError;
pub use hearing_service::{
    ArgumentReceipt, HearingService, HearingServiceConfig, VerdictReceipt,
    DEFAULT_MAX_WRITE_ATTEMPTS,
};
