use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use arbitra_core::{AggregateRoot, CaseId, ExpectedVersion, PartyId};
use arbitra_hearing::{Case, CaseRecord, CaseStatus};

use super::r#trait::{CaseRepository, RepositoryError};

/// In-memory case repository.
///
/// Intended for tests/dev. Records are cloned in and out so callers never
/// share state with the store.
#[derive(Debug, Default)]
pub struct InMemoryCaseRepository {
    cases: RwLock<HashMap<CaseId, CaseRecord>>,
}

impl InMemoryCaseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn select(&self, keep: impl Fn(&CaseRecord) -> bool) -> Result<Vec<Case>, RepositoryError> {
        let cases = self.cases.read().map_err(|_| poisoned())?;

        let mut selected: Vec<CaseRecord> = cases.values().filter(|r| keep(r)).cloned().collect();
        selected.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(selected.into_iter().map(Case::from_record).collect())
    }
}

fn poisoned() -> RepositoryError {
    RepositoryError::Storage("lock poisoned".to_string())
}

fn holds_side(record: &CaseRecord, party: PartyId) -> bool {
    [&record.side_a, &record.side_b]
        .into_iter()
        .flatten()
        .any(|p| p.party_id == party)
}

#[async_trait]
impl CaseRepository for InMemoryCaseRepository {
    async fn insert(&self, case: &Case) -> Result<(), RepositoryError> {
        let mut cases = self.cases.write().map_err(|_| poisoned())?;
        let id = *case.id();
        if cases.contains_key(&id) {
            return Err(RepositoryError::AlreadyExists);
        }
        cases.insert(id, case.to_record());
        Ok(())
    }

    async fn get(&self, id: CaseId) -> Result<Option<Case>, RepositoryError> {
        let cases = self.cases.read().map_err(|_| poisoned())?;
        Ok(cases.get(&id).cloned().map(Case::from_record))
    }

    async fn update(&self, case: &Case, expected: ExpectedVersion) -> Result<(), RepositoryError> {
        let mut cases = self.cases.write().map_err(|_| poisoned())?;
        let stored = cases.get_mut(case.id()).ok_or(RepositoryError::NotFound)?;

        if !expected.matches(stored.version) {
            return Err(RepositoryError::Conflict(format!(
                "expected {expected:?}, found {}",
                stored.version
            )));
        }

        *stored = case.to_record();
        Ok(())
    }

    async fn list_for_party(&self, party: PartyId) -> Result<Vec<Case>, RepositoryError> {
        self.select(|r| holds_side(r, party))
    }

    async fn list_open(&self) -> Result<Vec<Case>, RepositoryError> {
        self.select(|r| r.side_b.is_none() && r.status != CaseStatus::Closed)
    }
}
