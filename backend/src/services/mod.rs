//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and external systems.

pub mod alerts;
pub mod analysis;

pub use alerts::{
    AlertService, AlertStore, ContactDirectory, PgAlertStore, PgContactDirectory,
    PgUserDirectory, TriggeredAlert, UserDirectory,
};
pub use analysis::AnalysisService;
