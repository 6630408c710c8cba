//! Vitals analysis API routes

use crate::error::ApiError;
use crate::services::AnalysisService;
use crate::state::AppState;
use axum::{routing::post, Json, Router};
use vitalguard_shared::models::{AnalysisResult, VitalsSnapshot};

/// Create vitals routes
pub fn vitals_routes() -> Router<AppState> {
    Router::new().route("/analyze", post(analyze_snapshot))
}

/// POST /api/v1/vitals/analyze - Analyze a vitals snapshot
///
/// Pure computation: validates the snapshot for physiological plausibility,
/// runs the rule analyzer, and returns the result without persisting
/// anything.
async fn analyze_snapshot(
    Json(snapshot): Json<VitalsSnapshot>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let result = AnalysisService::analyze(&snapshot)?;
    Ok(Json(result))
}
