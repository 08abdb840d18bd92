use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use arbitra_core::CaseId;
use arbitra_hearing::{Case, Side};

/// One argument as presented to the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentBrief {
    pub side: Side,
    pub round: u32,
    pub content: String,
}

/// Case material handed to the verdict oracle.
///
/// Arguments keep submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictRequest {
    pub case_id: CaseId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub jurisdiction: String,
    pub arguments: Vec<ArgumentBrief>,
}

impl VerdictRequest {
    pub fn from_case(case: &Case) -> Self {
        let details = case.details();
        Self {
            case_id: case.id_typed(),
            title: details.title.clone(),
            description: details.description.clone(),
            category: details.category.clone(),
            jurisdiction: details.jurisdiction.clone(),
            arguments: case
                .arguments()
                .iter()
                .map(|a| ArgumentBrief {
                    side: a.side,
                    round: a.round,
                    content: a.content.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// Transport failure or non-success response.
    #[error("verdict generator unavailable: {0}")]
    Unavailable(String),

    /// The oracle answered, but not with usable verdict text.
    #[error("invalid verdict generator response: {0}")]
    InvalidResponse(String),
}

/// Opaque verdict oracle: case material in, verdict text out.
///
/// Implementations should not enforce their own deadline; the arbiter bounds
/// every call.
#[async_trait]
pub trait VerdictGenerator: Send + Sync {
    async fn generate(&self, request: &VerdictRequest) -> Result<String, GeneratorError>;
}

#[async_trait]
impl<G> VerdictGenerator for Arc<G>
where
    G: VerdictGenerator + ?Sized,
{
    async fn generate(&self, request: &VerdictRequest) -> Result<String, GeneratorError> {
        (**self).generate(request).await
    }
}
