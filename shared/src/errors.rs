//! Error types for the VitalGuard application

use thiserror::Error;

/// Service layer error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("External service error: {0}")]
    External(String),
}

/// Per-channel delivery error
///
/// Always caught and recorded as a per-contact result; never propagated out
/// of a broadcast.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Provider rejected the message: {0}")]
    Rejected(String),

    #[error("Contact unreachable on this channel: {0}")]
    Unreachable(String),
}
