//! Case lifecycle: opening, party assignment and status transitions.

use crate::case::{
    AssignSecondParty, Case, CaseEvent, CaseOpened, CaseStatus, OpenCase, PartyRef,
    SecondPartyAssigned, StatusChanged, TransitionStatus,
};
use crate::error::HearingError;

impl Case {
    pub fn is_side_a(&self, party: &PartyRef) -> bool {
        self.side_a.as_ref().is_some_and(|a| a.is(party))
    }

    pub fn both_sides_assigned(&self) -> bool {
        self.side_a.is_some() && self.side_b.is_some()
    }

    pub(crate) fn handle_open(&self, cmd: &OpenCase) -> Result<Vec<CaseEvent>, HearingError> {
        if self.created {
            return Err(HearingError::AlreadyExists);
        }
        cmd.details.validate()?;

        Ok(vec![CaseEvent::CaseOpened(CaseOpened {
            case_id: cmd.case_id,
            details: cmd.details.clone(),
            side_a: cmd.creator.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    pub(crate) fn handle_assign_second_party(
        &self,
        cmd: &AssignSecondParty,
    ) -> Result<Vec<CaseEvent>, HearingError> {
        self.ensure_case_id(cmd.case_id)?;

        // Occupied seat wins over identity, so a repeated join always reads the same.
        if self.side_b.is_some() {
            return Err(HearingError::AlreadyAssigned);
        }
        if self.is_side_a(&cmd.caller) {
            return Err(HearingError::SelfAssignment);
        }

        Ok(vec![CaseEvent::SecondPartyAssigned(SecondPartyAssigned {
            case_id: cmd.case_id,
            side_b: cmd.caller.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    pub(crate) fn handle_transition_status(
        &self,
        cmd: &TransitionStatus,
    ) -> Result<Vec<CaseEvent>, HearingError> {
        self.ensure_case_id(cmd.case_id)?;

        if !self.is_side_a(&cmd.caller) {
            return Err(HearingError::Forbidden);
        }
        if cmd.new_status == CaseStatus::InHearing && !self.both_sides_assigned() {
            return Err(HearingError::InvalidTransition);
        }

        Ok(vec![CaseEvent::StatusChanged(StatusChanged {
            case_id: cmd.case_id,
            from: self.status,
            to: cmd.new_status,
            changed_by: cmd.caller.party_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}
