//! Emergency alert API routes

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;
use vitalguard_shared::models::EmergencyAlert;
use vitalguard_shared::types::{
    ActiveAlertsQuery, ActiveAlertsResponse, ResolveAlertRequest, ResolveAlertResponse,
    TriggerAlertRequest, TriggerAlertResponse,
};

/// Create alert routes
pub fn alert_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(trigger_alert))
        .route("/active", get(get_active_alerts))
        .route("/:alert_id", get(get_alert))
        .route("/:alert_id/resolve", post(resolve_alert))
}

/// POST /api/v1/alerts - Trigger an emergency alert
///
/// Persists the alert, then fans notifications out to the user's emergency
/// contacts. Returns 201 once the alert row is durable; notification
/// failures never fail this call.
async fn trigger_alert(
    State(state): State<AppState>,
    Json(req): Json<TriggerAlertRequest>,
) -> Result<(StatusCode, Json<TriggerAlertResponse>), ApiError> {
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let triggered = state
        .alerts
        .trigger(req.user_id, req.cause, req.location)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TriggerAlertResponse {
            alert_id: triggered.alert.alert_id,
            status: triggered.alert.status,
            triggered_at: triggered.alert.triggered_at,
            contacts_notified: triggered.contacts_notified,
        }),
    ))
}

/// POST /api/v1/alerts/:alert_id/resolve - Resolve a triggered alert
///
/// The body is optional; an empty resolve defaults to the `resolved` status
/// with no note. Resolving an already-terminal alert returns 409.
async fn resolve_alert(
    State(state): State<AppState>,
    Path(alert_id): Path<Uuid>,
    body: Option<Json<ResolveAlertRequest>>,
) -> Result<Json<ResolveAlertResponse>, ApiError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let alert = state.alerts.resolve(alert_id, req.status, req.note).await?;

    Ok(Json(ResolveAlertResponse {
        alert_id: alert.alert_id,
        status: alert.status,
        resolved_at: alert.resolved_at,
    }))
}

/// GET /api/v1/alerts/active?user_id= - List a user's active alerts
async fn get_active_alerts(
    State(state): State<AppState>,
    Query(query): Query<ActiveAlertsQuery>,
) -> Result<Json<ActiveAlertsResponse>, ApiError> {
    let alerts = state.alerts.list_active(query.user_id).await?;
    let count = alerts.len();

    Ok(Json(ActiveAlertsResponse { alerts, count }))
}

/// GET /api/v1/alerts/:alert_id - Fetch one alert
async fn get_alert(
    State(state): State<AppState>,
    Path(alert_id): Path<Uuid>,
) -> Result<Json<EmergencyAlert>, ApiError> {
    let alert = state.alerts.get(alert_id).await?;
    Ok(Json(alert))
}
