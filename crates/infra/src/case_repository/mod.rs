//! Case Repository boundary.
//!
//! Durable store of case records with read-modify-write semantics guarded by
//! the aggregate version (compare-and-swap on update).

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryCaseRepository;
pub use postgres::PostgresCaseRepository;
pub use r#trait::{CaseRepository, RepositoryError};
