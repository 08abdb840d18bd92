use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::case::{Case, CaseEvent, CaseStatus, RecordVerdict, VerdictRecorded};
use crate::error::HearingError;

/// Verdict text as produced by the oracle, stamped at generation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub text: String,
    pub generated_at: DateTime<Utc>,
}

impl Case {
    /// Verdicts are only produced while the hearing is running.
    pub fn ensure_in_hearing(&self) -> Result<(), HearingError> {
        if self.status != CaseStatus::InHearing {
            return Err(HearingError::NotInHearing(self.status));
        }
        Ok(())
    }

    pub(crate) fn handle_record_verdict(
        &self,
        cmd: &RecordVerdict,
    ) -> Result<Vec<CaseEvent>, HearingError> {
        self.ensure_case_id(cmd.case_id)?;
        self.ensure_in_hearing()?;

        Ok(vec![CaseEvent::VerdictRecorded(VerdictRecorded {
            case_id: cmd.case_id,
            verdict: Verdict {
                text: cmd.text.clone(),
                generated_at: cmd.generated_at,
            },
        })])
    }
}

#[cfg(test)]
mod tests {
    use crate::case::test_support::*;
    use crate::case::{CaseCommand, Side, TransitionStatus};

    use super::*;

    fn record(case: &mut Case, text: &str) -> Result<Vec<CaseEvent>, HearingError> {
        let case_id = case.id_typed();
        execute(
            case,
            CaseCommand::RecordVerdict(RecordVerdict {
                case_id,
                text: text.to_string(),
                generated_at: Utc::now(),
            }),
        )
    }

    #[test]
    fn verdict_requires_hearing() {
        let a = party("A");
        let mut case = opened_case(&a);
        assert_eq!(
            record(&mut case, "anything").unwrap_err(),
            HearingError::NotInHearing(CaseStatus::Draft)
        );
        assert!(case.verdict().is_none());
    }

    #[test]
    fn new_verdict_overwrites_and_keeps_arguments() {
        let a = party("A");
        let b = party("B");
        let mut case = case_in_hearing(&a, &b);
        submit(&mut case, Side::A, &a, "point").unwrap();

        record(&mut case, "first").unwrap();
        record(&mut case, "second").unwrap();

        assert_eq!(case.verdict().map(|v| v.text.as_str()), Some("second"));
        assert_eq!(case.arguments().len(), 1);
        assert_eq!(case.status(), CaseStatus::InHearing);
    }

    #[test]
    fn verdict_survives_leaving_the_hearing() {
        let a = party("A");
        let b = party("B");
        let mut case = case_in_hearing(&a, &b);
        record(&mut case, "final").unwrap();

        let case_id = case.id_typed();
        execute(
            &mut case,
            CaseCommand::TransitionStatus(TransitionStatus {
                case_id,
                caller: a.clone(),
                new_status: CaseStatus::Closed,
                occurred_at: Utc::now(),
            }),
        )
        .unwrap();

        assert!(case.verdict().is_some());
        assert_eq!(
            record(&mut case, "late").unwrap_err(),
            HearingError::NotInHearing(CaseStatus::Closed)
        );
    }
}
