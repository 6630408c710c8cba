//! Core domain model for vitals monitoring and emergency alerting
//!
//! These types are shared between the analyzer (pure domain logic) and the
//! backend service layer. Everything here is plain data: no I/O, no clocks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Vitals Snapshot (produced by the wearable, consumed by the analyzer)
// ============================================================================

/// Blood pressure reading in mmHg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: i32,
    pub diastolic: i32,
}

/// Physiological measurements from one reading
///
/// Every field is optional: a missing measurement is treated as "no finding"
/// for that dimension, so the analyzer stays total over partial snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    /// Heart rate in beats per minute
    pub heart_rate: Option<i32>,
    pub blood_pressure: Option<BloodPressure>,
    /// Oxygen saturation (SpO2) as a percentage
    pub oxygen_saturation: Option<f64>,
    /// Body temperature in degrees Celsius
    pub temperature: Option<f64>,
    /// Breaths per minute
    pub respiratory_rate: Option<i32>,
}

/// Activity measurements accumulated for the current day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub steps: Option<i32>,
    pub active_minutes: Option<i32>,
}

/// Sleep summary from the previous night, when the device reports one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sleep {
    /// Sleep quality score, 0-100
    pub quality_percent: Option<i32>,
    pub duration_minutes: Option<i32>,
}

/// One timestamped reading of a user's physiological and activity state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsSnapshot {
    pub user_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub vitals: Vitals,
    #[serde(default)]
    pub activity: Activity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep: Option<Sleep>,
}

// ============================================================================
// Analysis Output
// ============================================================================

/// Clinical finding classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Bradycardia,
    Tachycardia,
    ElevatedHr,
    HypertensiveCrisis,
    Hypertension,
    Hypoxemia,
    LowSpo2,
    Fever,
    HighFever,
    Hypothermia,
    AnomalyDetected,
}

/// Recommended response tier for an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertAction {
    Monitor,
    Rest,
    Consult,
    Emergency,
}

/// Overall status derived from the worst alert in a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Normal,
    Caution,
    Warning,
    Critical,
}

/// A single scored clinical finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    /// Clinical urgency, 0-10
    pub severity: u8,
    pub title: String,
    pub message: String,
    pub action: AlertAction,
}

impl Alert {
    /// Construct an alert, checking the severity/action invariant.
    ///
    /// Invariant: `action == Emergency` implies `severity >= 9`, and
    /// severity never exceeds 10.
    pub fn new(
        alert_type: AlertType,
        severity: u8,
        title: impl Into<String>,
        message: impl Into<String>,
        action: AlertAction,
    ) -> Self {
        debug_assert!(severity <= 10, "severity must be within 0-10");
        debug_assert!(
            action != AlertAction::Emergency || severity >= 9,
            "emergency action requires severity >= 9"
        );
        Self {
            alert_type,
            severity,
            title: title.into(),
            message: message.into(),
            action,
        }
    }

    pub fn is_emergency(&self) -> bool {
        self.action == AlertAction::Emergency
    }
}

/// Result of the short-term statistical deviation heuristic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub detected: bool,
    /// Cumulative deviation score, 0-10
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub algorithm: String,
}

impl AnomalyReport {
    pub fn none() -> Self {
        Self {
            detected: false,
            score: 0.0,
            reason: None,
            algorithm: crate::analyzer::ANOMALY_ALGORITHM.to_string(),
        }
    }
}

/// Category of a lifestyle/medical recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    Emergency,
    Medical,
    Activity,
    Sleep,
    Hydration,
}

/// Priority of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationPriority {
    Low,
    Medium,
    High,
    Critical,
}

/// An actionable suggestion generated alongside the alerts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: RecommendationCategory,
    pub priority: RecommendationPriority,
    pub message: String,
}

/// Full output of one analyzer pass over a snapshot
///
/// Regenerated per snapshot; never persisted by this system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub timestamp: DateTime<Utc>,
    /// Composite wellbeing score, 0-100
    pub health_score: u8,
    pub status: HealthStatus,
    /// Findings sorted by severity descending (stable for ties)
    pub alerts: Vec<Alert>,
    pub insights: Vec<String>,
    pub anomalies: AnomalyReport,
    pub recommendations: Vec<Recommendation>,
}

// ============================================================================
// Emergency Alert Lifecycle
// ============================================================================

/// Well-known cause tags for emergency alerts
///
/// The cause is a free-form tag (new device firmware may introduce new
/// causes without a backend release); these are the ones we render
/// specially in notifications.
pub mod cause {
    pub const MANUAL_SOS: &str = "manual_sos";
    pub const FALL_DETECTED: &str = "fall_detected";
    pub const HEART_RATE_ABNORMAL: &str = "heart_rate_abnormal";
}

/// Lifecycle state of a persistent emergency alert
///
/// `Triggered` is the unique initial state, `Resolved` is terminal.
/// Re-alerting creates a new row; there is no transition back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Triggered,
    Resolved,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Triggered => "triggered",
            AlertStatus::Resolved => "resolved",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AlertStatus::Resolved)
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "triggered" => Ok(AlertStatus::Triggered),
            "resolved" => Ok(AlertStatus::Resolved),
            other => Err(format!("unknown alert status: {other}")),
        }
    }
}

/// Geographic coordinates attached to an alert
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// A persistent emergency alert row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyAlert {
    pub alert_id: Uuid,
    pub user_id: Uuid,
    /// Free-form cause tag, e.g. `manual_sos`, `fall_detected`
    pub cause: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    pub status: AlertStatus,
    pub triggered_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// An emergency contact, consumed read-only by the dispatch engine
///
/// `phone` is stored encrypted at rest and decrypted on read; a contact
/// whose phone failed to decrypt is treated as unreachable by SMS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub contact_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub relation: String,
    /// Lower value means contacted first (display/logging order only;
    /// dispatch is concurrent across contacts)
    pub priority: i32,
}
