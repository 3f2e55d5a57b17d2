//! Shared types and models for the Procurement Management Platform
//!
//! This crate contains the pure domain layer shared between the backend
//! and other components of the system: document status machines, the
//! budget ledger arithmetic, order total calculations, and validation
//! helpers. No I/O lives here.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
