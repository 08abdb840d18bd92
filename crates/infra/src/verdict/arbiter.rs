use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{instrument, warn};

use arbitra_hearing::{Case, Outcome, OutcomeClassifier, PhraseClassifier, Verdict};

use super::generator::{GeneratorError, VerdictGenerator, VerdictRequest};
use crate::error::ServiceError;

pub const DEFAULT_VERDICT_TIMEOUT: Duration = Duration::from_secs(30);

/// Produces verdicts through the oracle and derives outcomes from them.
///
/// Every oracle call is bounded by `timeout`. The arbiter never writes; the
/// caller records the returned [`Verdict`].
pub struct VerdictArbiter<G> {
    generator: G,
    timeout: Duration,
    classifier: Arc<dyn OutcomeClassifier>,
}

impl<G> VerdictArbiter<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            timeout: DEFAULT_VERDICT_TIMEOUT,
            classifier: Arc::new(PhraseClassifier),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn OutcomeClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn classifier(&self) -> &dyn OutcomeClassifier {
        self.classifier.as_ref()
    }

    pub fn derive_outcome(&self, case: &Case) -> Outcome {
        case.outcome(self.classifier())
    }
}

impl<G> VerdictArbiter<G>
where
    G: VerdictGenerator,
{
    /// Ask the oracle for a verdict on `case`.
    ///
    /// The case must be in hearing. Argument counts are not checked: a verdict
    /// may be requested before any rounds are used.
    #[instrument(skip(self, case), fields(case_id = %case.id_typed()))]
    pub async fn generate_verdict(&self, case: &Case) -> Result<Verdict, ServiceError> {
        case.ensure_in_hearing()?;

        let request = VerdictRequest::from_case(case);
        let call = self.generator.generate(&request);
        let text = match tokio::time::timeout(self.timeout, call).await {
            Err(_elapsed) => {
                warn!(timeout = ?self.timeout, "verdict generator timed out");
                return Err(ServiceError::VerdictGeneratorTimeout(self.timeout));
            }
            Ok(Err(e)) => {
                warn!(error = %e, "verdict generator failed");
                return Err(e.into());
            }
            Ok(Ok(text)) => text,
        };

        if text.trim().is_empty() {
            warn!("verdict generator returned blank text");
            return Err(GeneratorError::InvalidResponse("blank verdict text".to_string()).into());
        }

        Ok(Verdict {
            text,
            generated_at: Utc::now(),
        })
    }
}
