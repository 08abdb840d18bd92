//! Verdict oracle boundary and the arbiter that bounds calls to it.

pub mod arbiter;
pub mod canned;
pub mod generator;
pub mod http;

pub use arbiter::{VerdictArbiter, DEFAULT_VERDICT_TIMEOUT};
pub use canned::CannedVerdictGenerator;
pub use generator::{ArgumentBrief, GeneratorError, VerdictGenerator, VerdictRequest};
pub use http::{HttpVerdictGenerator, HttpVerdictGeneratorConfig};
