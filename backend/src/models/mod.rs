//! Database models for the Procurement Management Platform
//!
//! Re-exports the shared domain layer for use by services and handlers

pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;
