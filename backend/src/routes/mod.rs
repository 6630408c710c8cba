//! Route definitions for the VitalGuard API
//!
//! This module organizes all API routes and applies middleware.

use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod alerts;
mod health;
mod vitals;

pub use alerts::alert_routes;
pub use vitals::vitals_routes;

/// Request timeout for everything except the alert subtree
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .nest("/api/v1", api_routes())
        // Apply middleware layers
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API v1 routes
///
/// The alert subtree carries no request timeout: dropping an in-flight
/// trigger would cancel a dispatch that must run to the slowest channel,
/// and would turn an already-durable alert into an error response. Every
/// other route gets the standard timeout.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "VitalGuard API v1" }))
        .nest("/alerts", alerts::alert_routes())
        .nest(
            "/vitals",
            vitals::vitals_routes().layer(TimeoutLayer::new(REQUEST_TIMEOUT)),
        )
}
