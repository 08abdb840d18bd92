use async_trait::async_trait;

use super::generator::{GeneratorError, VerdictGenerator, VerdictRequest};

/// Deterministic oracle for local runs and tests.
///
/// Always suggests mediation, so the phrase classifier finds no favoured side.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedVerdictGenerator;

impl CannedVerdictGenerator {
    pub fn verdict_for(request: &VerdictRequest) -> String {
        format!(
            "Preliminary verdict for case {}: The court suggests mediation and split costs.",
            request.case_id
        )
    }
}

#[async_trait]
impl VerdictGenerator for CannedVerdictGenerator {
    async fn generate(&self, request: &VerdictRequest) -> Result<String, GeneratorError> {
        Ok(Self::verdict_for(request))
    }
}
