//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod alerts;
pub mod contacts;
pub mod user;

pub use alerts::{EmergencyAlertRecord, EmergencyAlertRepository};
pub use contacts::{EmergencyContactRecord, EmergencyContactRepository};
pub use user::UserRepository;
