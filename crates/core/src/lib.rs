//! `arbitra-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the hearing engine
//! and its adapters (no infrastructure concerns).

pub mod aggregate;
pub mod error;
pub mod event;
pub mod id;

pub use aggregate::{Aggregate, AggregateRoot, ExpectedVersion};
pub use error::DomainError;
pub use event::Event;
pub use id::{ArgumentId, CaseId, PartyId};
