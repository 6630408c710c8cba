//! VitalGuard Shared Library
//!
//! This crate contains the pure domain core shared by the backend service:
//! the data model, the rule-based health analyzer, error taxonomy, API
//! types, and input validation. No I/O lives here.

pub mod analyzer;
pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use analyzer::analyze;
pub use errors::*;
pub use models::*;
pub use types::*;
