//! Shared types and models for the retail POS backend
//!
//! This crate contains the domain model, the closed sets of payment/status
//! enums, and the pure validation and money helpers used by the backend
//! services and their tests. It has no I/O dependencies.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
