//! API request and response types

use crate::models::{AlertStatus, EmergencyAlert, GeoPoint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request to trigger an emergency alert
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TriggerAlertRequest {
    pub user_id: Uuid,
    /// Cause tag; defaults to `manual_sos` when omitted
    #[validate(length(min = 1, max = 64))]
    pub cause: Option<String>,
    #[validate(custom(function = crate::validation::validate_location))]
    pub location: Option<GeoPoint>,
}

/// Response after triggering an alert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerAlertResponse {
    pub alert_id: Uuid,
    pub status: AlertStatus,
    pub triggered_at: DateTime<Utc>,
    /// Best-effort count of contacts a notification was attempted for.
    /// Channel-level failures are logged, not surfaced here.
    pub contacts_notified: usize,
}

/// Request to resolve an alert
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ResolveAlertRequest {
    /// Target status; defaults to `resolved`
    pub status: Option<AlertStatus>,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

/// Response after resolving an alert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveAlertResponse {
    pub alert_id: Uuid,
    pub status: AlertStatus,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Query parameters for listing active alerts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveAlertsQuery {
    pub user_id: Uuid,
}

/// List of a user's currently active alerts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveAlertsResponse {
    pub alerts: Vec<EmergencyAlert>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_request_accepts_valid_location() {
        let request = TriggerAlertRequest {
            user_id: Uuid::new_v4(),
            cause: Some("manual_sos".to_string()),
            location: Some(GeoPoint { lat: 12.97, lng: 77.59 }),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_trigger_request_rejects_bad_latitude() {
        let request = TriggerAlertRequest {
            user_id: Uuid::new_v4(),
            cause: None,
            location: Some(GeoPoint { lat: 123.0, lng: 77.59 }),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_trigger_request_rejects_empty_cause() {
        let request = TriggerAlertRequest {
            user_id: Uuid::new_v4(),
            cause: Some(String::new()),
            location: None,
        };
        assert!(request.validate().is_err());
    }
}
