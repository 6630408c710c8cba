//! VitalGuard Backend Library
//!
//! This library exposes the backend modules for use in tests and other crates.

pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod notifications;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
