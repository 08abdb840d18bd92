//! Round-bounded argument exchange.

use crate::case::{
    Argument, ArgumentSubmitted, Case, CaseEvent, CaseStatus, PartyRef, Side, SubmitArgument,
};
use crate::error::HearingError;

/// Maximum number of arguments each side may submit.
pub const MAX_ROUNDS_PER_SIDE: u32 = 5;

impl Case {
    /// Number of arguments already submitted for `side`.
    pub fn rounds_used(&self, side: Side) -> u32 {
        self.arguments.iter().filter(|a| a.side == side).count() as u32
    }

    pub fn remaining_rounds(&self, side: Side) -> u32 {
        MAX_ROUNDS_PER_SIDE.saturating_sub(self.rounds_used(side))
    }

    pub fn rounds_exhausted(&self, side: Side) -> bool {
        self.remaining_rounds(side) == 0
    }

    /// Capability check shared by submission and the read view.
    ///
    /// Order matters: hearing status, then side ownership, then the round cap.
    pub fn check_submission(&self, side: Side, caller: &PartyRef) -> Result<(), HearingError> {
        if self.status != CaseStatus::InHearing {
            return Err(HearingError::NotInHearing(self.status));
        }
        if !self.holder(side).is_some_and(|h| h.is(caller)) {
            return Err(HearingError::NotYourSide(side));
        }
        if self.rounds_exhausted(side) {
            return Err(HearingError::RoundLimitExceeded {
                side,
                limit: MAX_ROUNDS_PER_SIDE,
            });
        }
        Ok(())
    }

    pub fn can_submit(&self, side: Side, caller: &PartyRef) -> bool {
        self.check_submission(side, caller).is_ok()
    }

    pub(crate) fn handle_submit_argument(
        &self,
        cmd: &SubmitArgument,
    ) -> Result<Vec<CaseEvent>, HearingError> {
        self.ensure_case_id(cmd.case_id)?;

        if cmd.content.trim().is_empty() {
            return Err(HearingError::EmptyArgument);
        }
        self.check_submission(cmd.side, &cmd.caller)?;

        let argument = Argument {
            id: cmd.argument_id,
            side: cmd.side,
            round: self.rounds_used(cmd.side) + 1,
            content: cmd.content.clone(),
            submitted_at: cmd.occurred_at,
            submitted_by: cmd.caller.clone(),
        };

        Ok(vec![CaseEvent::ArgumentSubmitted(ArgumentSubmitted {
            case_id: cmd.case_id,
            argument,
        })])
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::case::test_support::*;

    use super::*;

    #[test]
    fn rounds_are_numbered_per_side() {
        let a = party("A");
        let b = party("B");
        let mut case = case_in_hearing(&a, &b);

        submit(&mut case, Side::A, &a, "opening").unwrap();
        submit(&mut case, Side::A, &a, "second").unwrap();
        submit(&mut case, Side::B, &b, "response").unwrap();

        let rounds: Vec<(Side, u32)> = case.arguments().iter().map(|a| (a.side, a.round)).collect();
        assert_eq!(rounds, vec![(Side::A, 1), (Side::A, 2), (Side::B, 1)]);
        assert_eq!(case.remaining_rounds(Side::A), 3);
        assert_eq!(case.remaining_rounds(Side::B), 4);
    }

    #[test]
    fn sixth_argument_is_rejected_and_nothing_changes() {
        let a = party("A");
        let b = party("B");
        let mut case = case_in_hearing(&a, &b);
        for i in 0..MAX_ROUNDS_PER_SIDE {
            submit(&mut case, Side::A, &a, &format!("point {i}")).unwrap();
        }
        let before = case.clone();

        let err = submit(&mut case, Side::A, &a, "one more").unwrap_err();
        assert_eq!(
            err,
            HearingError::RoundLimitExceeded {
                side: Side::A,
                limit: MAX_ROUNDS_PER_SIDE
            }
        );
        assert_eq!(case, before);

        // The other side keeps its own budget.
        let events = submit(&mut case, Side::B, &b, "reply").unwrap();
        let CaseEvent::ArgumentSubmitted(submitted) = &events[0] else {
            panic!("expected ArgumentSubmitted, got {events:?}");
        };
        assert_eq!(submitted.argument.side, Side::B);
        assert_eq!(submitted.argument.round, 1);
        assert_eq!(case.rounds_used(Side::A), MAX_ROUNDS_PER_SIDE);
        assert_eq!(case.remaining_rounds(Side::B), MAX_ROUNDS_PER_SIDE - 1);
    }

    #[test]
    fn empty_content_is_checked_before_status() {
        let a = party("A");
        let mut case = opened_case(&a);
        assert_eq!(
            submit(&mut case, Side::A, &a, "   ").unwrap_err(),
            HearingError::EmptyArgument
        );
        assert_eq!(
            submit(&mut case, Side::A, &a, "real content").unwrap_err(),
            HearingError::NotInHearing(CaseStatus::Draft)
        );
    }

    #[test]
    fn caller_must_hold_the_side() {
        let a = party("A");
        let b = party("B");
        let stranger = party("C");
        let mut case = case_in_hearing(&a, &b);

        assert_eq!(
            submit(&mut case, Side::B, &a, "posing as B").unwrap_err(),
            HearingError::NotYourSide(Side::B)
        );
        assert_eq!(
            submit(&mut case, Side::A, &stranger, "intruding").unwrap_err(),
            HearingError::NotYourSide(Side::A)
        );
    }

    #[test]
    fn not_your_side_is_reported_before_round_limit() {
        let a = party("A");
        let b = party("B");
        let mut case = case_in_hearing(&a, &b);
        for _ in 0..MAX_ROUNDS_PER_SIDE {
            submit(&mut case, Side::A, &a, "point").unwrap();
        }
        assert_eq!(
            submit(&mut case, Side::A, &b, "point").unwrap_err(),
            HearingError::NotYourSide(Side::A)
        );
    }

    #[test]
    fn can_submit_mirrors_the_capability_check() {
        let a = party("A");
        let b = party("B");
        let case = case_in_hearing(&a, &b);

        assert!(case.can_submit(Side::A, &a));
        assert!(!case.can_submit(Side::B, &a));
        assert!(case.can_submit(Side::B, &b));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            .. ProptestConfig::default()
        })]

        #[test]
        fn per_side_count_never_exceeds_limit(
            sides in proptest::collection::vec(any::<bool>(), 0..24)
        ) {
            let a = party("A");
            let b = party("B");
            let mut case = case_in_hearing(&a, &b);

            for pick_a in sides {
                let (side, caller) = if pick_a { (Side::A, &a) } else { (Side::B, &b) };
                let used = case.rounds_used(side);
                let result = submit(&mut case, side, caller, "argument");

                if used < MAX_ROUNDS_PER_SIDE {
                    prop_assert!(result.is_ok());
                } else {
                    let is_limit = matches!(result, Err(HearingError::RoundLimitExceeded { .. }));
                    prop_assert!(is_limit);
                }
            }

            for side in Side::BOTH {
                prop_assert!(case.rounds_used(side) <= MAX_ROUNDS_PER_SIDE);
                let rounds: Vec<u32> = case
                    .arguments()
                    .iter()
                    .filter(|a| a.side == side)
                    .map(|a| a.round)
                    .collect();
                let expected: Vec<u32> = (1..=rounds.len() as u32).collect();
                prop_assert_eq!(rounds, expected);
            }
        }
    }
}
