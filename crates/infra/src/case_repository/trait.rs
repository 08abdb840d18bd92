use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use arbitra_core::{CaseId, ExpectedVersion, PartyId};
use arbitra_hearing::Case;

/// Case repository operation error.
///
/// Infrastructure failures (storage, concurrency) as opposed to hearing rule
/// violations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("case not found")]
    NotFound,

    /// Stored version differs from the expected one.
    #[error("optimistic concurrency check failed: {0}")]
    Conflict(String),

    #[error("case already exists")]
    AlreadyExists,

    #[error("storage failure: {0}")]
    Storage(String),
}

/// Store of hearing cases, keyed by [`CaseId`].
///
/// Implementations must:
/// - persist the full case (details, sides, arguments in order, verdict, version)
/// - on `update`, write only if the stored version matches `expected`
/// - return listings newest first
#[async_trait]
pub trait CaseRepository: Send + Sync {
    /// Store a freshly opened case. Fails with `AlreadyExists` on id collision.
    async fn insert(&self, case: &Case) -> Result<(), RepositoryError>;

    async fn get(&self, id: CaseId) -> Result<Option<Case>, RepositoryError>;

    /// Replace the stored case if its version still matches `expected`.
    async fn update(&self, case: &Case, expected: ExpectedVersion) -> Result<(), RepositoryError>;

    /// Cases where `party` holds side A or side B.
    async fn list_for_party(&self, party: PartyId) -> Result<Vec<Case>, RepositoryError>;

    /// Cases still waiting for a side B party, excluding closed ones.
    async fn list_open(&self) -> Result<Vec<Case>, RepositoryError>;
}

#[async_trait]
impl<R> CaseRepository for Arc<R>
where
    R: CaseRepository + ?Sized,
{
    async fn insert(&self, case: &Case) -> Result<(), RepositoryError> {
        (**self).insert(case).await
    }

    async fn get(&self, id: CaseId) -> Result<Option<Case>, RepositoryError> {
        (**self).get(id).await
    }

    async fn update(&self, case: &Case, expected: ExpectedVersion) -> Result<(), RepositoryError> {
        (**self).update(case, expected).await
    }

    async fn list_for_party(&self, party: PartyId) -> Result<Vec<Case>, RepositoryError> {
        (**self).list_for_party(party).await
    }

    async fn list_open(&self) -> Result<Vec<Case>, RepositoryError> {
        (**self).list_open().await
    }
}
