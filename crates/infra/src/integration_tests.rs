//! Integration tests for the hearing pipeline.
//!
//! Tests: HearingService → CaseRepository → VerdictArbiter → HearingView
//!
//! Verifies:
//! - A full hearing runs from draft to verdict
//! - Racing submissions never exceed the round limit
//! - Version conflicts are retried for commands and surfaced for verdicts

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use arbitra_core::{CaseId, ExpectedVersion, PartyId};
    use arbitra_hearing::{
        Case, CaseDetails, CaseStatus, HearingError, Outcome, PartyRef, Side, MAX_ROUNDS_PER_SIDE,
    };

    use crate::case_repository::{CaseRepository, InMemoryCaseRepository, RepositoryError};
    use crate::error::ServiceError;
    use crate::hearing_service::{HearingService, HearingServiceConfig};
    use crate::verdict::{CannedVerdictGenerator, GeneratorError, VerdictGenerator, VerdictRequest};

    fn party(name: &str) -> PartyRef {
        PartyRef::new(PartyId::new(), name)
    }

    fn details() -> CaseDetails {
        CaseDetails {
            title: "Smith vs. Johnson Property Dispute".to_string(),
            description: "Dispute over the boundary between two lots.".to_string(),
            category: "Civil".to_string(),
            jurisdiction: "California".to_string(),
        }
    }

    fn service<G: VerdictGenerator>(
        generator: G,
    ) -> HearingService<Arc<InMemoryCaseRepository>, G> {
        HearingService::new(
            Arc::new(InMemoryCaseRepository::new()),
            generator,
            HearingServiceConfig::default(),
        )
    }

    async fn hearing_ready<R: CaseRepository, G: VerdictGenerator>(
        svc: &HearingService<R, G>,
        a: &PartyRef,
        b: &PartyRef,
    ) -> CaseId {
        let view = svc.open_case(a, details()).await.unwrap();
        svc.join_as_side_b(view.case_id, b).await.unwrap();
        svc.change_status(view.case_id, a, CaseStatus::InHearing)
            .await
            .unwrap();
        view.case_id
    }

    struct Scripted(&'static str);

    #[async_trait]
    impl VerdictGenerator for Scripted {
        async fn generate(&self, _: &VerdictRequest) -> Result<String, GeneratorError> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn full_hearing_runs_to_a_verdict() {
        let svc = service(Scripted("After five rounds, Side B prevails."));
        let a = party("Side A counsel");
        let b = party("Side B counsel");
        let case_id = hearing_ready(&svc, &a, &b).await;

        for round in 1..=MAX_ROUNDS_PER_SIDE {
            let ra = svc
                .submit_argument(case_id, &a, Side::A, format!("A round {round}"))
                .await
                .unwrap();
            assert_eq!(ra.argument.round, round);
            assert_eq!(ra.remaining, MAX_ROUNDS_PER_SIDE - round);

            svc.submit_argument(case_id, &b, Side::B, format!("B round {round}"))
                .await
                .unwrap();
        }

        let err = svc
            .submit_argument(case_id, &a, Side::A, "one too many".to_string())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Hearing(HearingError::RoundLimitExceeded { side: Side::A, .. })
        ));

        let receipt = svc.request_verdict(case_id, &a).await.unwrap();
        assert_eq!(receipt.outcome, Outcome::SideB);

        let view = svc.get_hearing_view(case_id, &b).await.unwrap();
        assert_eq!(view.arguments.len(), 10);
        assert_eq!(view.outcome, Outcome::SideB);
        assert_eq!(view.status, CaseStatus::InHearing);
        assert!(!view.can_submit.a && !view.can_submit.b);
    }

    #[tokio::test]
    async fn canned_verdict_with_both_sides_exhausted_is_a_tie() {
        let svc = service(CannedVerdictGenerator);
        let a = party("A");
        let b = party("B");
        let case_id = hearing_ready(&svc, &a, &b).await;

        for _ in 0..MAX_ROUNDS_PER_SIDE {
            svc.submit_argument(case_id, &a, Side::A, "a".to_string()).await.unwrap();
            svc.submit_argument(case_id, &b, Side::B, "b".to_string()).await.unwrap();
        }

        let receipt = svc.request_verdict(case_id, &b).await.unwrap();
        assert_eq!(receipt.outcome, Outcome::Tie);
    }

    #[tokio::test]
    async fn verdict_before_any_rounds_is_undecided() {
        let svc = service(Scripted("Side A wins."));
        let a = party("A");
        let b = party("B");
        let case_id = hearing_ready(&svc, &a, &b).await;

        let receipt = svc.request_verdict(case_id, &a).await.unwrap();
        assert_eq!(receipt.outcome, Outcome::Undecided);
        assert_eq!(receipt.verdict.text, "Side A wins.");
    }

    #[tokio::test]
    async fn unknown_case_is_not_found() {
        let svc = service(CannedVerdictGenerator);
        let a = party("A");
        assert!(matches!(
            svc.get_hearing_view(CaseId::new(), &a).await,
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(
            svc.join_as_side_b(CaseId::new(), &a).await,
            Err(ServiceError::NotFound)
        ));
    }

    #[tokio::test]
    async fn listings_reflect_participation_and_openness() {
        let svc = service(CannedVerdictGenerator);
        let a = party("A");
        let b = party("B");

        let first = svc.open_case(&a, details()).await.unwrap();
        let second = svc.open_case(&a, details()).await.unwrap();
        svc.join_as_side_b(first.case_id, &b).await.unwrap();

        let mine = svc.list_my_cases(&b).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].case_id, first.case_id);

        let open: Vec<CaseId> = svc
            .list_open_cases()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.case_id)
            .collect();
        assert_eq!(open, vec![second.case_id]);

        svc.change_status(second.case_id, &a, CaseStatus::Closed)
            .await
            .unwrap();
        assert!(svc.list_open_cases().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_submissions_at_the_limit_yield_one_success() {
        let svc = Arc::new(service(CannedVerdictGenerator));
        let a = party("A");
        let b = party("B");
        let case_id = hearing_ready(&*svc, &a, &b).await;

        for _ in 0..MAX_ROUNDS_PER_SIDE - 1 {
            svc.submit_argument(case_id, &a, Side::A, "point".to_string())
                .await
                .unwrap();
        }

        let (s1, s2) = (svc.clone(), svc.clone());
        let (a1, a2) = (a.clone(), a.clone());
        let first = tokio::spawn(async move {
            s1.submit_argument(case_id, &a1, Side::A, "first".to_string()).await
        });
        let second = tokio::spawn(async move {
            s2.submit_argument(case_id, &a2, Side::A, "second".to_string()).await
        });

        let results = [first.await.unwrap(), second.await.unwrap()];
        let ok = results.iter().filter(|r| r.is_ok()).count();
        let limited = results
            .iter()
            .filter(|r| {
                matches!(
                    r,
                    Err(ServiceError::Hearing(HearingError::RoundLimitExceeded { .. }))
                )
            })
            .count();
        assert_eq!((ok, limited), (1, 1));

        let view = svc.get_hearing_view(case_id, &a).await.unwrap();
        assert_eq!(view.remaining_rounds.a, 0);
        assert_eq!(
            view.arguments.iter().filter(|x| x.side == Side::A).count() as u32,
            MAX_ROUNDS_PER_SIDE
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_joins_assign_side_b_once() {
        let svc = Arc::new(service(CannedVerdictGenerator));
        let a = party("A");
        let case_id = svc.open_case(&a, details()).await.unwrap().case_id;

        let mut handles = Vec::new();
        for i in 0..4 {
            let svc = svc.clone();
            let joiner = party(&format!("B{i}"));
            handles.push(tokio::spawn(async move {
                svc.join_as_side_b(case_id, &joiner).await
            }));
        }

        let mut ok = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(_) => ok += 1,
                Err(ServiceError::Hearing(HearingError::AlreadyAssigned)) => {}
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(ok, 1);
    }

    /// Fails the first `failures` updates with a version conflict.
    struct Contended {
        inner: InMemoryCaseRepository,
        failures: AtomicU32,
    }

    #[async_trait]
    impl CaseRepository for Contended {
        async fn insert(&self, case: &Case) -> Result<(), RepositoryError> {
            self.inner.insert(case).await
        }

        async fn get(&self, id: CaseId) -> Result<Option<Case>, RepositoryError> {
            self.inner.get(id).await
        }

        async fn update(
            &self,
            case: &Case,
            expected: ExpectedVersion,
        ) -> Result<(), RepositoryError> {
            let left = self.failures.load(Ordering::SeqCst);
            if left > 0 {
                self.failures.store(left - 1, Ordering::SeqCst);
                return Err(RepositoryError::Conflict("simulated".to_string()));
            }
            self.inner.update(case, expected).await
        }

        async fn list_for_party(&self, party: PartyId) -> Result<Vec<Case>, RepositoryError> {
            self.inner.list_for_party(party).await
        }

        async fn list_open(&self) -> Result<Vec<Case>, RepositoryError> {
            self.inner.list_open().await
        }
    }

    fn contended_service(
        failures: u32,
        max_write_attempts: u32,
    ) -> HearingService<Contended, CannedVerdictGenerator> {
        HearingService::new(
            Contended {
                inner: InMemoryCaseRepository::new(),
                failures: AtomicU32::new(failures),
            },
            CannedVerdictGenerator,
            HearingServiceConfig {
                verdict_timeout: Duration::from_secs(5),
                max_write_attempts,
            },
        )
    }

    #[tokio::test]
    async fn transient_conflicts_are_retried() {
        let svc = contended_service(2, 3);
        let a = party("A");
        let b = party("B");
        let view = svc.open_case(&a, details()).await.unwrap();

        let joined = svc.join_as_side_b(view.case_id, &b).await.unwrap();
        assert_eq!(joined.side_b, Some(b));
    }

    #[tokio::test]
    async fn persistent_conflicts_surface_after_max_attempts() {
        let svc = contended_service(10, 3);
        let a = party("A");
        let b = party("B");
        let view = svc.open_case(&a, details()).await.unwrap();

        let err = svc.join_as_side_b(view.case_id, &b).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let stored = svc.get_hearing_view(view.case_id, &a).await.unwrap();
        assert!(stored.side_b.is_none());
    }

    /// Oracle that lets a concurrent write land while it "thinks".
    struct Interleaving {
        repo: Arc<InMemoryCaseRepository>,
        side_b: PartyRef,
    }

    #[async_trait]
    impl VerdictGenerator for Interleaving {
        async fn generate(&self, request: &VerdictRequest) -> Result<String, GeneratorError> {
            let svc = HearingService::new(
                self.repo.clone(),
                CannedVerdictGenerator,
                HearingServiceConfig::default(),
            );
            svc.submit_argument(request.case_id, &self.side_b, Side::B, "late rebuttal".to_string())
                .await
                .map_err(|e| GeneratorError::Unavailable(e.to_string()))?;
            Ok("Side A wins.".to_string())
        }
    }

    #[tokio::test]
    async fn verdict_racing_a_submission_is_a_conflict_without_partial_write() {
        let repo = Arc::new(InMemoryCaseRepository::new());
        let a = party("A");
        let b = party("B");

        let setup = HearingService::new(
            repo.clone(),
            CannedVerdictGenerator,
            HearingServiceConfig::default(),
        );
        let case_id = hearing_ready(&setup, &a, &b).await;

        let svc = HearingService::new(
            repo.clone(),
            Interleaving {
                repo: repo.clone(),
                side_b: b.clone(),
            },
            HearingServiceConfig::default(),
        );

        let err = svc.request_verdict(case_id, &a).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let view = setup.get_hearing_view(case_id, &a).await.unwrap();
        assert!(view.verdict.is_none());
        assert_eq!(view.arguments.len(), 1);
    }

    /// Oracle that lets a rival verdict be recorded while it "thinks".
    struct RivalVerdict {
        repo: Arc<InMemoryCaseRepository>,
        rival: PartyRef,
    }

    #[async_trait]
    impl VerdictGenerator for RivalVerdict {
        async fn generate(&self, request: &VerdictRequest) -> Result<String, GeneratorError> {
            let svc = HearingService::new(
                self.repo.clone(),
                CannedVerdictGenerator,
                HearingServiceConfig::default(),
            );
            svc.request_verdict(request.case_id, &self.rival)
                .await
                .map_err(|e| GeneratorError::Unavailable(e.to_string()))?;
            Ok("Side A wins.".to_string())
        }
    }

    #[tokio::test]
    async fn concurrent_verdicts_are_both_accepted_and_the_last_write_wins() {
        let repo = Arc::new(InMemoryCaseRepository::new());
        let a = party("A");
        let b = party("B");

        let setup = HearingService::new(
            repo.clone(),
            CannedVerdictGenerator,
            HearingServiceConfig::default(),
        );
        let case_id = hearing_ready(&setup, &a, &b).await;
        let before = setup.get_hearing_view(case_id, &a).await.unwrap();

        let svc = HearingService::new(
            repo.clone(),
            RivalVerdict {
                repo: repo.clone(),
                rival: b.clone(),
            },
            HearingServiceConfig::default(),
        );

        let receipt = svc.request_verdict(case_id, &a).await.unwrap();
        assert_eq!(receipt.verdict.text, "Side A wins.");

        let view = setup.get_hearing_view(case_id, &a).await.unwrap();
        assert_eq!(view.verdict.map(|v| v.text).as_deref(), Some("Side A wins."));
        assert_eq!(view.arguments, before.arguments);
        // Rival verdict and this one: two writes on top of the starting version.
        assert_eq!(view.version, before.version + 2);
    }
}
