//! Hearing domain module (case lifecycle, argument exchange, verdict arbitration).
//!
//! This crate contains the business rules of a hearing, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage). Adapters for
//! persistence and the verdict oracle live in `arbitra-infra`.

pub mod case;
pub mod error;
pub mod exchange;
pub mod lifecycle;
pub mod outcome;
pub mod verdict;
pub mod view;

pub use case::{
    Argument, ArgumentSubmitted, AssignSecondParty, Case, CaseCommand, CaseDetails, CaseEvent,
    CaseOpened, CaseRecord, CaseStatus, OpenCase, PartyRef, RecordVerdict, SecondPartyAssigned,
    Side, StatusChanged, SubmitArgument, TransitionStatus, VerdictRecorded,
};
pub use error::{ErrorKind, HearingError};
pub use exchange::MAX_ROUNDS_PER_SIDE;
pub use outcome::{derive_outcome, Outcome, OutcomeClassifier, PhraseClassifier};
pub use verdict::Verdict;
pub use view::{CaseSummary, HearingView, PerSide};
