use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use arbitra_core::{Aggregate, AggregateRoot, ArgumentId, CaseId, DomainError, Event, PartyId};

use crate::error::HearingError;
use crate::verdict::Verdict;

/// Case status lifecycle.
///
/// Transitions are deliberately unordered: the side A party may move a case to
/// any status, backwards included. Only entering `InHearing` is guarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Draft,
    Submitted,
    InHearing,
    Closed,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Draft => "draft",
            CaseStatus::Submitted => "submitted",
            CaseStatus::InHearing => "in_hearing",
            CaseStatus::Closed => "closed",
        }
    }
}

impl core::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(CaseStatus::Draft),
            "submitted" => Ok(CaseStatus::Submitted),
            "in_hearing" => Ok(CaseStatus::InHearing),
            "closed" => Ok(CaseStatus::Closed),
            other => Err(DomainError::validation(format!(
                "unknown case status '{other}' (expected draft, submitted, in_hearing or closed)"
            ))),
        }
    }
}

/// One of the two opposing sides of a hearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl core::fmt::Display for Side {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Side::A => f.write_str("A"),
            Side::B => f.write_str("B"),
        }
    }
}

/// A party holding (or acting on) a side.
///
/// Two references denote the same party when their ids match; display names
/// are informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyRef {
    pub party_id: PartyId,
    pub display_name: String,
}

impl PartyRef {
    pub fn new(party_id: PartyId, display_name: impl Into<String>) -> Self {
        Self {
            party_id,
            display_name: display_name.into(),
        }
    }

    pub fn is(&self, other: &PartyRef) -> bool {
        self.party_id == other.party_id
    }
}

/// Descriptive material of a dispute, handed to the verdict oracle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseDetails {
    pub title: String,
    pub description: String,
    pub category: String,
    pub jurisdiction: String,
}

impl CaseDetails {
    pub fn validate(&self) -> Result<(), HearingError> {
        if self.title.trim().is_empty() {
            return Err(HearingError::InvalidCase("title must not be empty".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(HearingError::InvalidCase(
                "description must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// A submitted argument (one round for one side).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub id: ArgumentId,
    pub side: Side,
    /// 1-based position of this argument among its side's arguments.
    pub round: u32,
    pub content: String,
    pub submitted_at: DateTime<Utc>,
    pub submitted_by: PartyRef,
}

/// Aggregate root: Case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    pub(crate) id: CaseId,
    pub(crate) details: CaseDetails,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) status: CaseStatus,
    pub(crate) side_a: Option<PartyRef>,
    pub(crate) side_b: Option<PartyRef>,
    pub(crate) arguments: Vec<Argument>,
    pub(crate) verdict: Option<Verdict>,
    version: u64,
    pub(crate) created: bool,
}

impl Case {
    /// Create an empty, not-yet-opened aggregate instance.
    pub fn empty(id: CaseId) -> Self {
        Self {
            id,
            details: CaseDetails::default(),
            created_at: DateTime::<Utc>::default(),
            status: CaseStatus::Draft,
            side_a: None,
            side_b: None,
            arguments: Vec::new(),
            verdict: None,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> CaseId {
        self.id
    }

    pub fn details(&self) -> &CaseDetails {
        &self.details
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn status(&self) -> CaseStatus {
        self.status
    }

    pub fn side_a(&self) -> Option<&PartyRef> {
        self.side_a.as_ref()
    }

    pub fn side_b(&self) -> Option<&PartyRef> {
        self.side_b.as_ref()
    }

    /// The party currently holding `side`, if any.
    pub fn holder(&self, side: Side) -> Option<&PartyRef> {
        match side {
            Side::A => self.side_a.as_ref(),
            Side::B => self.side_b.as_ref(),
        }
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }

    pub fn is_opened(&self) -> bool {
        self.created
    }

    /// Whether `party` holds either side of this case.
    pub fn is_participant(&self, party: &PartyRef) -> bool {
        Side::BOTH
            .iter()
            .any(|side| self.holder(*side).is_some_and(|h| h.is(party)))
    }

    pub(crate) fn ensure_case_id(&self, case_id: CaseId) -> Result<(), HearingError> {
        if !self.created || self.id != case_id {
            return Err(HearingError::NotFound);
        }
        Ok(())
    }

    /// Snapshot of the persisted fields.
    pub fn to_record(&self) -> CaseRecord {
        CaseRecord {
            id: self.id,
            details: self.details.clone(),
            created_at: self.created_at,
            status: self.status,
            side_a: self.side_a.clone(),
            side_b: self.side_b.clone(),
            arguments: self.arguments.clone(),
            verdict: self.verdict.clone(),
            version: self.version,
        }
    }

    /// Restore an opened case from a persisted snapshot.
    pub fn from_record(record: CaseRecord) -> Self {
        Self {
            id: record.id,
            details: record.details,
            created_at: record.created_at,
            status: record.status,
            side_a: record.side_a,
            side_b: record.side_b,
            arguments: record.arguments,
            verdict: record.verdict,
            version: record.version,
            created: true,
        }
    }
}

/// Persisted shape of a case.
///
/// Outcome is intentionally absent: it is derived on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub id: CaseId,
    pub details: CaseDetails,
    pub created_at: DateTime<Utc>,
    pub status: CaseStatus,
    pub side_a: Option<PartyRef>,
    pub side_b: Option<PartyRef>,
    pub arguments: Vec<Argument>,
    pub verdict: Option<Verdict>,
    pub version: u64,
}

impl AggregateRoot for Case {
    type Id = CaseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: OpenCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenCase {
    pub case_id: CaseId,
    pub details: CaseDetails,
    pub creator: PartyRef,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AssignSecondParty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignSecondParty {
    pub case_id: CaseId,
    pub caller: PartyRef,
    pub occurred_at: DateTime<Utc>,
}

/// Command: TransitionStatus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionStatus {
    pub case_id: CaseId,
    pub caller: PartyRef,
    pub new_status: CaseStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SubmitArgument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitArgument {
    pub case_id: CaseId,
    pub argument_id: ArgumentId,
    pub side: Side,
    pub caller: PartyRef,
    pub content: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordVerdict (carries text already produced by the oracle).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordVerdict {
    pub case_id: CaseId,
    pub text: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseCommand {
    OpenCase(OpenCase),
    AssignSecondParty(AssignSecondParty),
    TransitionStatus(TransitionStatus),
    SubmitArgument(SubmitArgument),
    RecordVerdict(RecordVerdict),
}

/// Event: CaseOpened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseOpened {
    pub case_id: CaseId,
    pub details: CaseDetails,
    pub side_a: PartyRef,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SecondPartyAssigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondPartyAssigned {
    pub case_id: CaseId,
    pub side_b: PartyRef,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StatusChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChanged {
    pub case_id: CaseId,
    pub from: CaseStatus,
    pub to: CaseStatus,
    pub changed_by: PartyId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ArgumentSubmitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentSubmitted {
    pub case_id: CaseId,
    pub argument: Argument,
}

/// Event: VerdictRecorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictRecorded {
    pub case_id: CaseId,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseEvent {
    CaseOpened(CaseOpened),
    SecondPartyAssigned(SecondPartyAssigned),
    StatusChanged(StatusChanged),
    ArgumentSubmitted(ArgumentSubmitted),
    VerdictRecorded(VerdictRecorded),
}

impl Event for CaseEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CaseEvent::CaseOpened(_) => "hearing.case.opened",
            CaseEvent::SecondPartyAssigned(_) => "hearing.case.second_party_assigned",
            CaseEvent::StatusChanged(_) => "hearing.case.status_changed",
            CaseEvent::ArgumentSubmitted(_) => "hearing.case.argument_submitted",
            CaseEvent::VerdictRecorded(_) => "hearing.case.verdict_recorded",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CaseEvent::CaseOpened(e) => e.occurred_at,
            CaseEvent::SecondPartyAssigned(e) => e.occurred_at,
            CaseEvent::StatusChanged(e) => e.occurred_at,
            CaseEvent::ArgumentSubmitted(e) => e.argument.submitted_at,
            CaseEvent::VerdictRecorded(e) => e.verdict.generated_at,
        }
    }
}

impl Aggregate for Case {
    type Command = CaseCommand;
    type Event = CaseEvent;
    type Error = HearingError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CaseEvent::CaseOpened(e) => {
                self.id = e.case_id;
                self.details = e.details.clone();
                self.created_at = e.occurred_at;
                self.status = CaseStatus::Draft;
                self.side_a = Some(e.side_a.clone());
                self.side_b = None;
                self.arguments.clear();
                self.verdict = None;
                self.created = true;
            }
            CaseEvent::SecondPartyAssigned(e) => {
                self.side_b = Some(e.side_b.clone());
            }
            CaseEvent::StatusChanged(e) => {
                self.status = e.to;
            }
            CaseEvent::ArgumentSubmitted(e) => {
                self.arguments.push(e.argument.clone());
            }
            CaseEvent::VerdictRecorded(e) => {
                self.verdict = Some(e.verdict.clone());
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CaseCommand::OpenCase(cmd) => self.handle_open(cmd),
            CaseCommand::AssignSecondParty(cmd) => self.handle_assign_second_party(cmd),
            CaseCommand::TransitionStatus(cmd) => self.handle_transition_status(cmd),
            CaseCommand::SubmitArgument(cmd) => self.handle_submit_argument(cmd),
            CaseCommand::RecordVerdict(cmd) => self.handle_record_verdict(cmd),
        }
    }
}
