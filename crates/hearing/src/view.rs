//! Read-side projections of a case.

use arbitra_core::{AggregateRoot, CaseId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::case::{Argument, Case, CaseDetails, CaseStatus, PartyRef, Side};
use crate::outcome::{Outcome, OutcomeClassifier};
use crate::verdict::Verdict;

/// A value held once per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerSide<T> {
    #[serde(rename = "A")]
    pub a: T,
    #[serde(rename = "B")]
    pub b: T,
}

impl<T> PerSide<T> {
    pub fn from_fn(mut f: impl FnMut(Side) -> T) -> Self {
        Self {
            a: f(Side::A),
            b: f(Side::B),
        }
    }

    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }
}

/// Everything a participant needs to render a hearing.
///
/// `can_submit` is specific to the caller the view was assembled for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HearingView {
    pub case_id: CaseId,
    pub details: CaseDetails,
    pub created_at: DateTime<Utc>,
    pub status: CaseStatus,
    pub side_a: Option<PartyRef>,
    pub side_b: Option<PartyRef>,
    pub arguments: Vec<Argument>,
    pub verdict: Option<Verdict>,
    pub outcome: Outcome,
    pub remaining_rounds: PerSide<u32>,
    pub can_submit: PerSide<bool>,
    pub version: u64,
}

impl HearingView {
    pub fn assemble(case: &Case, caller: &PartyRef, classifier: &dyn OutcomeClassifier) -> Self {
        Self {
            case_id: case.id_typed(),
            details: case.details().clone(),
            created_at: case.created_at(),
            status: case.status(),
            side_a: case.side_a().cloned(),
            side_b: case.side_b().cloned(),
            arguments: case.arguments().to_vec(),
            verdict: case.verdict().cloned(),
            outcome: case.outcome(classifier),
            remaining_rounds: PerSide::from_fn(|side| case.remaining_rounds(side)),
            can_submit: PerSide::from_fn(|side| case.can_submit(side, caller)),
            version: case.version(),
        }
    }
}

/// Listing row for a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseSummary {
    pub case_id: CaseId,
    pub title: String,
    pub category: String,
    pub jurisdiction: String,
    pub status: CaseStatus,
    pub side_a: Option<PartyRef>,
    pub side_b: Option<PartyRef>,
    pub created_at: DateTime<Utc>,
    pub outcome: Outcome,
}

impl CaseSummary {
    pub fn from_case(case: &Case, classifier: &dyn OutcomeClassifier) -> Self {
        let details = case.details();
        Self {
            case_id: case.id_typed(),
            title: details.title.clone(),
            category: details.category.clone(),
            jurisdiction: details.jurisdiction.clone(),
            status: case.status(),
            side_a: case.side_a().cloned(),
            side_b: case.side_b().cloned(),
            created_at: case.created_at(),
            outcome: case.outcome(classifier),
        }
    }
}
