//! Health check endpoints
//!
//! Kubernetes-style probes. Liveness succeeds whenever the process is up;
//! readiness additionally requires a working database round-trip, since an
//! alert trigger cannot be accepted without durable storage.

use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct ProbeResponse {
    pub status: String,
    pub service: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<CheckStatus>,
}

/// Status of an individual dependency check
#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn probe(status: &str, database: Option<CheckStatus>) -> ProbeResponse {
    ProbeResponse {
        status: status.to_string(),
        service: "vitalguard",
        version: env!("CARGO_PKG_VERSION"),
        database,
    }
}

/// Basic health check endpoint
pub async fn health_check() -> Json<ProbeResponse> {
    Json(probe("healthy", None))
}

/// Readiness probe; returns 503 while the database is unreachable
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<ProbeResponse>, (StatusCode, Json<ProbeResponse>)> {
    match db::health_check(&state.db).await {
        Ok(()) => Ok(Json(probe(
            "ready",
            Some(CheckStatus {
                status: "healthy".to_string(),
                message: None,
            }),
        ))),
        Err(e) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(probe(
                "not_ready",
                Some(CheckStatus {
                    status: "unhealthy".to_string(),
                    message: Some(e.to_string()),
                }),
            )),
        )),
    }
}

/// Liveness probe; always OK while the server is running
pub async fn liveness_check() -> Json<ProbeResponse> {
    Json(probe("alive", None))
}
