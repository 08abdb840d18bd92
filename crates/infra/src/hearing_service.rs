//! Hearing orchestration (application-level façade).
//!
//! Every mutation is one read-modify-write cycle:
//!
//! ```text
//! Command
//!   ↓
//! 1. Load case from the repository (NotFound if absent)
//!   ↓
//! 2. Handle command (pure decision, produces events)
//!   ↓
//! 3. Apply events to the loaded case
//!   ↓
//! 4. Persist with ExpectedVersion::Exact(loaded version)
//! ```
//!
//! A version conflict in step 4 re-runs the whole cycle for domain commands,
//! so preconditions are always evaluated against the state actually
//! overwritten. Verdict writes are not retried: the oracle is never invoked
//! twice for one request.
//!
//! This module holds no business rules of its own.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use arbitra_core::{Aggregate, AggregateRoot, ArgumentId, CaseId, Event, ExpectedVersion};
use arbitra_hearing::{
    Argument, AssignSecondParty, Case, CaseCommand, CaseDetails, CaseEvent, CaseStatus,
    CaseSummary, HearingView, OpenCase, Outcome, OutcomeClassifier, PartyRef, RecordVerdict, Side,
    SubmitArgument, TransitionStatus, Verdict,
};

use crate::case_repository::{CaseRepository, RepositoryError};
use crate::error::ServiceError;
use crate::verdict::{VerdictArbiter, VerdictGenerator, DEFAULT_VERDICT_TIMEOUT};

pub const DEFAULT_MAX_WRITE_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HearingServiceConfig {
    /// Bound on one verdict oracle call.
    pub verdict_timeout: Duration,
    /// Read-decide-write attempts per domain command before giving up.
    pub max_write_attempts: u32,
}

impl Default for HearingServiceConfig {
    fn default() -> Self {
        Self {
            verdict_timeout: DEFAULT_VERDICT_TIMEOUT,
            max_write_attempts: DEFAULT_MAX_WRITE_ATTEMPTS,
        }
    }
}

/// Result of a successful argument submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentReceipt {
    pub argument: Argument,
    /// Rounds the submitting side has left.
    pub remaining: u32,
}

/// Result of a successful verdict request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictReceipt {
    pub verdict: Verdict,
    pub outcome: Outcome,
}

pub struct HearingService<R, G> {
    repo: R,
    arbiter: VerdictArbiter<G>,
    max_write_attempts: u32,
}

impl<R, G> HearingService<R, G> {
    pub fn new(repo: R, generator: G, config: HearingServiceConfig) -> Self {
        Self {
            repo,
            arbiter: VerdictArbiter::new(generator).with_timeout(config.verdict_timeout),
            max_write_attempts: config.max_write_attempts.max(1),
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn OutcomeClassifier>) -> Self {
        self.arbiter = self.arbiter.with_classifier(classifier);
        self
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn view(&self, case: &Case, caller: &PartyRef) -> HearingView {
        HearingView::assemble(case, caller, self.arbiter.classifier())
    }

    fn summaries(&self, cases: &[Case]) -> Vec<CaseSummary> {
        cases
            .iter()
            .map(|c| CaseSummary::from_case(c, self.arbiter.classifier()))
            .collect()
    }
}

impl<R, G> HearingService<R, G>
where
    R: CaseRepository,
    G: VerdictGenerator,
{
    /// Open a new case in `draft` with `creator` as side A.
    #[instrument(skip(self, creator, details), fields(party_id = %creator.party_id))]
    pub async fn open_case(
        &self,
        creator: &PartyRef,
        details: CaseDetails,
    ) -> Result<HearingView, ServiceError> {
        let case_id = CaseId::new();
        let mut case = Case::empty(case_id);

        let events = case.handle(&CaseCommand::OpenCase(OpenCase {
            case_id,
            details,
            creator: creator.clone(),
            occurred_at: Utc::now(),
        }))?;
        apply_all(&mut case, &events);

        self.repo.insert(&case).await?;
        log_committed(&case, &events);

        Ok(self.view(&case, creator))
    }

    #[instrument(skip(self, caller), fields(case_id = %case_id))]
    pub async fn get_hearing_view(
        &self,
        case_id: CaseId,
        caller: &PartyRef,
    ) -> Result<HearingView, ServiceError> {
        let case = self.load(case_id).await?;
        Ok(self.view(&case, caller))
    }

    /// Cases where the caller holds either side, newest first.
    #[instrument(skip(self, caller), fields(party_id = %caller.party_id))]
    pub async fn list_my_cases(&self, caller: &PartyRef) -> Result<Vec<CaseSummary>, ServiceError> {
        let cases = self.repo.list_for_party(caller.party_id).await?;
        Ok(self.summaries(&cases))
    }

    /// Cases still waiting for a side B party (not closed), newest first.
    #[instrument(skip(self))]
    pub async fn list_open_cases(&self) -> Result<Vec<CaseSummary>, ServiceError> {
        let cases = self.repo.list_open().await?;
        Ok(self.summaries(&cases))
    }

    #[instrument(skip(self, caller), fields(case_id = %case_id, party_id = %caller.party_id))]
    pub async fn join_as_side_b(
        &self,
        case_id: CaseId,
        caller: &PartyRef,
    ) -> Result<HearingView, ServiceError> {
        let (case, _) = self
            .execute(case_id, |_| {
                CaseCommand::AssignSecondParty(AssignSecondParty {
                    case_id,
                    caller: caller.clone(),
                    occurred_at: Utc::now(),
                })
            })
            .await?;
        Ok(self.view(&case, caller))
    }

    #[instrument(
        skip(self, caller),
        fields(case_id = %case_id, party_id = %caller.party_id, new_status = %new_status)
    )]
    pub async fn change_status(
        &self,
        case_id: CaseId,
        caller: &PartyRef,
        new_status: CaseStatus,
    ) -> Result<HearingView, ServiceError> {
        let (case, _) = self
            .execute(case_id, |_| {
                CaseCommand::TransitionStatus(TransitionStatus {
                    case_id,
                    caller: caller.clone(),
                    new_status,
                    occurred_at: Utc::now(),
                })
            })
            .await?;
        Ok(self.view(&case, caller))
    }

    #[instrument(
        skip(self, caller, content),
        fields(case_id = %case_id, party_id = %caller.party_id, side = %side)
    )]
    pub async fn submit_argument(
        &self,
        case_id: CaseId,
        caller: &PartyRef,
        side: Side,
        content: String,
    ) -> Result<ArgumentReceipt, ServiceError> {
        let argument_id = ArgumentId::new();
        let (case, events) = self
            .execute(case_id, |_| {
                CaseCommand::SubmitArgument(SubmitArgument {
                    case_id,
                    argument_id,
                    side,
                    caller: caller.clone(),
                    content: content.clone(),
                    occurred_at: Utc::now(),
                })
            })
            .await?;

        let argument = events
            .into_iter()
            .find_map(|e| match e {
                CaseEvent::ArgumentSubmitted(e) => Some(e.argument),
                _ => None,
            })
            .ok_or_else(|| {
                ServiceError::Repository("committed submission carried no argument".to_string())
            })?;

        Ok(ArgumentReceipt {
            argument,
            remaining: case.remaining_rounds(side),
        })
    }

    /// Generate and record a verdict.
    ///
    /// The oracle runs without holding anything; the verdict is then written
    /// against the version observed before the call. If only another verdict
    /// landed in the meantime, the write is repeated once against fresh state.
    /// Any other change (arguments, details, status) fails with `Conflict` and
    /// nothing is written. The oracle is never called twice.
    #[instrument(skip(self, caller), fields(case_id = %case_id, party_id = %caller.party_id))]
    pub async fn request_verdict(
        &self,
        case_id: CaseId,
        caller: &PartyRef,
    ) -> Result<VerdictReceipt, ServiceError> {
        let mut case = self.load(case_id).await?;
        let expected = ExpectedVersion::Exact(case.version());

        let verdict = self.arbiter.generate_verdict(&case).await?;

        let record = CaseCommand::RecordVerdict(RecordVerdict {
            case_id,
            text: verdict.text.clone(),
            generated_at: verdict.generated_at,
        });
        let heard = case.clone();
        let mut events = case.handle(&record)?;
        apply_all(&mut case, &events);

        match self.repo.update(&case, expected).await {
            Ok(()) => {}
            Err(RepositoryError::Conflict(msg)) => {
                (case, events) = self.record_over_rival_verdict(&heard, &record, msg).await?;
            }
            Err(other) => return Err(other.into()),
        }
        log_committed(&case, &events);

        Ok(VerdictReceipt {
            verdict,
            outcome: self.arbiter.derive_outcome(&case),
        })
    }

    /// Second and last attempt at recording a verdict decided on `heard`.
    async fn record_over_rival_verdict(
        &self,
        heard: &Case,
        record: &CaseCommand,
        conflict: String,
    ) -> Result<(Case, Vec<CaseEvent>), ServiceError> {
        let mut fresh = self.load(heard.id_typed()).await?;
        let unchanged = fresh.status() == heard.status()
            && fresh.details() == heard.details()
            && fresh.arguments() == heard.arguments();
        if !unchanged {
            return Err(ServiceError::Conflict(conflict));
        }

        debug!(%conflict, "only the verdict changed; recording over it");
        let expected = ExpectedVersion::Exact(fresh.version());
        let events = fresh.handle(record)?;
        apply_all(&mut fresh, &events);
        self.repo.update(&fresh, expected).await?;
        Ok((fresh, events))
    }

    async fn load(&self, case_id: CaseId) -> Result<Case, ServiceError> {
        self.repo
            .get(case_id)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    /// Read-decide-write with bounded retry on version conflicts.
    async fn execute<F>(
        &self,
        case_id: CaseId,
        decide: F,
    ) -> Result<(Case, Vec<CaseEvent>), ServiceError>
    where
        F: Fn(&Case) -> CaseCommand + Send + Sync,
    {
        let mut last_conflict = String::new();

        for attempt in 1..=self.max_write_attempts {
            let mut case = self.load(case_id).await?;
            let expected = ExpectedVersion::Exact(case.version());

            let events = case.handle(&decide(&case))?;
            if events.is_empty() {
                return Ok((case, events));
            }
            apply_all(&mut case, &events);

            match self.repo.update(&case, expected).await {
                Ok(()) => {
                    log_committed(&case, &events);
                    return Ok((case, events));
                }
                Err(RepositoryError::Conflict(msg)) => {
                    debug!(attempt, %msg, "version conflict; retrying against fresh state");
                    last_conflict = msg;
                }
                Err(other) => return Err(other.into()),
            }
        }

        Err(ServiceError::Conflict(format!(
            "gave up after {} attempts: {last_conflict}",
            self.max_write_attempts
        )))
    }
}

fn apply_all(case: &mut Case, events: &[CaseEvent]) {
    for e in events {
        case.apply(e);
    }
}

fn log_committed(case: &Case, events: &[CaseEvent]) {
    for e in events {
        info!(
            case_id = %case.id_typed(),
            event_type = e.event_type(),
            version = case.version(),
            "hearing event committed"
        );
    }
}
