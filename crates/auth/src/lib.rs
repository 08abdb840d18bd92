//! `arbitra-auth`: identity boundary for hearing participants.
//!
//! Turns a bearer token into an [`Identity`]. This crate knows nothing about
//! HTTP or storage; the API layer decides what to do with a failed resolution.

pub mod claims;
pub mod jwt;
pub mod principal;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256IdentityProvider, IdentityError, IdentityProvider};
pub use principal::Identity;
