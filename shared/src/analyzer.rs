//! Rule-based health risk analyzer
//!
//! Turns one vitals snapshot into a scored, prioritized set of alerts plus
//! insights, recommendations, and a composite health score.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: deterministic, side-effect-free, safe to call from
//!    any thread without locking
//! 2. **Total**: never fails; a missing measurement is "no finding" for that
//!    dimension
//! 3. **Fixed Clinical Constants**: thresholds are compile-time constants,
//!    not configuration

use crate::models::{
    Alert, AlertAction, AlertType, AnalysisResult, AnomalyReport, HealthStatus, Recommendation,
    RecommendationCategory, RecommendationPriority, VitalsSnapshot,
};
use chrono::Timelike;

/// Identifier reported in [`AnomalyReport::algorithm`]
pub const ANOMALY_ALGORITHM: &str = "statistical_deviation_v1";

// ============================================================================
// Clinical Thresholds
// ============================================================================

/// Heart rate below this is bradycardia (severity 8)
const HR_BRADYCARDIA_BELOW: i32 = 50;
/// Resting heart rate normal range
const HR_NORMAL_LOW: i32 = 60;
const HR_NORMAL_HIGH: i32 = 100;
/// Heart rate above this is elevated (severity 6)
const HR_ELEVATED_ABOVE: i32 = 120;
/// Heart rate above this is severe tachycardia (severity 9, emergency)
const HR_TACHYCARDIA_ABOVE: i32 = 140;

/// Stage-2 hypertension cutoffs (severity 7)
const BP_HYPERTENSION_SYSTOLIC: i32 = 140;
const BP_HYPERTENSION_DIASTOLIC: i32 = 90;
/// Hypertensive crisis cutoffs (severity 10, emergency)
const BP_CRISIS_SYSTOLIC: i32 = 180;
const BP_CRISIS_DIASTOLIC: i32 = 120;

/// SpO2 below this is severe hypoxemia (severity 10, emergency)
const SPO2_CRITICAL_BELOW: f64 = 90.0;
/// SpO2 below this is low (severity 7)
const SPO2_LOW_BELOW: f64 = 94.0;
/// SpO2 at or above this is normal
const SPO2_NORMAL: f64 = 95.0;

/// Temperature below this is hypothermia (severity 9, emergency)
const TEMP_HYPOTHERMIA_BELOW: f64 = 35.0;
/// Temperature at or above this is a fever (severity 5)
const TEMP_FEVER_AT: f64 = 37.8;
/// Temperature at or above this is a high fever (severity 8)
const TEMP_HIGH_FEVER_AT: f64 = 39.0;
const TEMP_NORMAL_LOW: f64 = 36.5;
const TEMP_NORMAL_HIGH: f64 = 37.5;

/// Typical adult respiratory rate range, breaths per minute
const RESP_NORMAL_LOW: i32 = 12;
const RESP_NORMAL_HIGH: i32 = 20;

// Anomaly heuristic: heart rate spike without movement, or low oxygen
const ANOMALY_RESTING_HR_ABOVE: i32 = 110;
const ANOMALY_RESTING_STEPS_BELOW: i32 = 100;
const ANOMALY_SPO2_BELOW: f64 = 92.0;
const ANOMALY_RESTING_SPIKE_SCORE: f64 = 4.0;
const ANOMALY_LOW_SPO2_SCORE: f64 = 5.0;
/// Anomaly score above this upgrades the synthesized alert to Consult
const ANOMALY_CONSULT_ABOVE: f64 = 3.0;

// Recommendation gates
const STEPS_ACTIVITY_RECOMMENDATION_BELOW: i32 = 3000;
const SLEEP_QUALITY_RECOMMENDATION_BELOW: i32 = 70;
const HYDRATION_HOUR_START: u32 = 10;
const HYDRATION_HOUR_END: u32 = 18;

// Health score bonuses
const STEPS_BONUS_AT: i32 = 10_000;
const ACTIVE_MINUTES_BONUS_AT: i32 = 60;

/// Analyze one snapshot against clinical thresholds and the deviation
/// heuristic.
///
/// Exactly one band fires per metric; metrics with no finding contribute an
/// insight string instead of an alert. The returned alerts are sorted by
/// severity descending, stable for ties.
pub fn analyze(snapshot: &VitalsSnapshot) -> AnalysisResult {
    let mut alerts = Vec::new();
    let mut insights = Vec::new();

    check_heart_rate(snapshot, &mut alerts, &mut insights);
    check_blood_pressure(snapshot, &mut alerts, &mut insights);
    check_oxygen_saturation(snapshot, &mut alerts, &mut insights);
    check_temperature(snapshot, &mut alerts, &mut insights);
    check_respiratory_rate(snapshot, &mut insights);

    let anomalies = detect_anomalies(snapshot);
    if anomalies.detected {
        alerts.push(anomaly_alert(&anomalies));
    }

    // Stable sort keeps encounter order for equal severities
    alerts.sort_by(|a, b| b.severity.cmp(&a.severity));

    let health_score = health_score(&alerts, snapshot);
    let status = derive_status(&alerts);
    let recommendations = build_recommendations(&alerts, snapshot);

    AnalysisResult {
        timestamp: snapshot.timestamp,
        health_score,
        status,
        alerts,
        insights,
        anomalies,
        recommendations,
    }
}

fn check_heart_rate(snapshot: &VitalsSnapshot, alerts: &mut Vec<Alert>, insights: &mut Vec<String>) {
    let Some(hr) = snapshot.vitals.heart_rate else {
        return;
    };

    if hr > HR_TACHYCARDIA_ABOVE {
        alerts.push(Alert::new(
            AlertType::Tachycardia,
            9,
            "Severe Tachycardia",
            format!("Heart rate of {hr} bpm is critically elevated"),
            AlertAction::Emergency,
        ));
    } else if hr > HR_ELEVATED_ABOVE {
        alerts.push(Alert::new(
            AlertType::ElevatedHr,
            6,
            "Elevated Heart Rate",
            format!("Heart rate of {hr} bpm is above the expected range"),
            AlertAction::Monitor,
        ));
    } else if hr < HR_BRADYCARDIA_BELOW {
        alerts.push(Alert::new(
            AlertType::Bradycardia,
            8,
            "Bradycardia",
            format!("Heart rate of {hr} bpm is abnormally low"),
            AlertAction::Consult,
        ));
    } else if (HR_NORMAL_LOW..=HR_NORMAL_HIGH).contains(&hr) {
        insights.push(format!("Heart rate of {hr} bpm is within the normal resting range"));
    } else {
        insights.push(format!("Heart rate of {hr} bpm is slightly outside the normal resting range"));
    }
}

fn check_blood_pressure(
    snapshot: &VitalsSnapshot,
    alerts: &mut Vec<Alert>,
    insights: &mut Vec<String>,
) {
    let Some(bp) = snapshot.vitals.blood_pressure else {
        return;
    };

    if bp.systolic >= BP_CRISIS_SYSTOLIC || bp.diastolic >= BP_CRISIS_DIASTOLIC {
        alerts.push(Alert::new(
            AlertType::HypertensiveCrisis,
            10,
            "Hypertensive Crisis",
            format!(
                "Blood pressure of {}/{} mmHg requires immediate attention",
                bp.systolic, bp.diastolic
            ),
            AlertAction::Emergency,
        ));
    } else if bp.systolic >= BP_HYPERTENSION_SYSTOLIC || bp.diastolic >= BP_HYPERTENSION_DIASTOLIC {
        alerts.push(Alert::new(
            AlertType::Hypertension,
            7,
            "Hypertension",
            format!(
                "Blood pressure of {}/{} mmHg is in the hypertensive range",
                bp.systolic, bp.diastolic
            ),
            AlertAction::Consult,
        ));
    } else {
        insights.push(format!(
            "Blood pressure of {}/{} mmHg is within the normal range",
            bp.systolic, bp.diastolic
        ));
    }
}

fn check_oxygen_saturation(
    snapshot: &VitalsSnapshot,
    alerts: &mut Vec<Alert>,
    insights: &mut Vec<String>,
) {
    let Some(spo2) = snapshot.vitals.oxygen_saturation else {
        return;
    };

    if spo2 < SPO2_CRITICAL_BELOW {
        alerts.push(Alert::new(
            AlertType::Hypoxemia,
            10,
            "Severe Hypoxemia",
            format!("Oxygen saturation of {spo2:.1}% is dangerously low"),
            AlertAction::Emergency,
        ));
    } else if spo2 < SPO2_LOW_BELOW {
        alerts.push(Alert::new(
            AlertType::LowSpo2,
            7,
            "Low Oxygen Saturation",
            format!("Oxygen saturation of {spo2:.1}% is below the expected range"),
            AlertAction::Consult,
        ));
    } else if spo2 >= SPO2_NORMAL {
        insights.push(format!("Oxygen saturation of {spo2:.1}% is normal"));
    } else {
        insights.push(format!("Oxygen saturation of {spo2:.1}% is borderline"));
    }
}

fn check_temperature(
    snapshot: &VitalsSnapshot,
    alerts: &mut Vec<Alert>,
    insights: &mut Vec<String>,
) {
    let Some(temp) = snapshot.vitals.temperature else {
        return;
    };

    if temp < TEMP_HYPOTHERMIA_BELOW {
        alerts.push(Alert::new(
            AlertType::Hypothermia,
            9,
            "Hypothermia",
            format!("Body temperature of {temp:.1}\u{b0}C is dangerously low"),
            AlertAction::Emergency,
        ));
    } else if temp >= TEMP_HIGH_FEVER_AT {
        alerts.push(Alert::new(
            AlertType::HighFever,
            8,
            "High Fever",
            format!("Body temperature of {temp:.1}\u{b0}C indicates a high fever"),
            AlertAction::Consult,
        ));
    } else if temp >= TEMP_FEVER_AT {
        alerts.push(Alert::new(
            AlertType::Fever,
            5,
            "Fever",
            format!("Body temperature of {temp:.1}\u{b0}C indicates a mild fever"),
            AlertAction::Rest,
        ));
    } else if (TEMP_NORMAL_LOW..=TEMP_NORMAL_HIGH).contains(&temp) {
        insights.push(format!("Body temperature of {temp:.1}\u{b0}C is normal"));
    } else {
        insights.push(format!("Body temperature of {temp:.1}\u{b0}C is slightly outside the normal range"));
    }
}

// No alert band for respiratory rate; it only informs.
fn check_respiratory_rate(snapshot: &VitalsSnapshot, insights: &mut Vec<String>) {
    let Some(rate) = snapshot.vitals.respiratory_rate else {
        return;
    };

    if (RESP_NORMAL_LOW..=RESP_NORMAL_HIGH).contains(&rate) {
        insights.push(format!("Respiratory rate of {rate}/min is within the typical range"));
    } else {
        insights.push(format!(
            "Respiratory rate of {rate}/min is outside the typical {RESP_NORMAL_LOW}-{RESP_NORMAL_HIGH}/min range"
        ));
    }
}

/// Short-term deviation heuristic, supplementing the threshold table.
///
/// Both rules can fire in one snapshot; the oxygen reason takes precedence.
fn detect_anomalies(snapshot: &VitalsSnapshot) -> AnomalyReport {
    let mut score = 0.0;
    let mut reason = None;

    if let (Some(hr), Some(steps)) = (snapshot.vitals.heart_rate, snapshot.activity.steps) {
        if hr > ANOMALY_RESTING_HR_ABOVE && steps < ANOMALY_RESTING_STEPS_BELOW {
            score += ANOMALY_RESTING_SPIKE_SCORE;
            reason = Some("heart rate spike while resting".to_string());
        }
    }

    if let Some(spo2) = snapshot.vitals.oxygen_saturation {
        if spo2 < ANOMALY_SPO2_BELOW {
            score += ANOMALY_LOW_SPO2_SCORE;
            reason = Some("oxygen saturation below expected resting level".to_string());
        }
    }

    AnomalyReport {
        detected: score > 0.0,
        score,
        reason,
        algorithm: ANOMALY_ALGORITHM.to_string(),
    }
}

fn anomaly_alert(report: &AnomalyReport) -> Alert {
    let severity = ((report.score * 2.0).ceil() as u8).min(10);
    let action = if report.score > ANOMALY_CONSULT_ABOVE {
        AlertAction::Consult
    } else {
        AlertAction::Monitor
    };
    let reason = report.reason.as_deref().unwrap_or("unspecified deviation");

    Alert::new(
        AlertType::AnomalyDetected,
        severity,
        "Anomalous Reading Detected",
        format!("Short-term deviation detected: {reason}"),
        action,
    )
}

/// Composite score: start at 100, subtract raw alert severities, add
/// activity bonuses, clamp to [0, 100].
fn health_score(alerts: &[Alert], snapshot: &VitalsSnapshot) -> u8 {
    let penalty: i32 = alerts.iter().map(|a| i32::from(a.severity)).sum();
    let mut score = 100 - penalty;

    if snapshot.activity.steps.is_some_and(|s| s >= STEPS_BONUS_AT) {
        score += 5;
    }
    if snapshot
        .activity
        .active_minutes
        .is_some_and(|m| m >= ACTIVE_MINUTES_BONUS_AT)
    {
        score += 5;
    }
    if snapshot
        .vitals
        .heart_rate
        .is_some_and(|hr| (HR_NORMAL_LOW..=HR_NORMAL_HIGH).contains(&hr))
    {
        score += 3;
    }

    score.clamp(0, 100) as u8
}

fn derive_status(alerts: &[Alert]) -> HealthStatus {
    let max_severity = alerts.iter().map(|a| a.severity).max().unwrap_or(0);
    match max_severity {
        9..=u8::MAX => HealthStatus::Critical,
        7..=8 => HealthStatus::Warning,
        5..=6 => HealthStatus::Caution,
        _ => HealthStatus::Normal,
    }
}

/// Build the recommendation list.
///
/// An emergency finding suppresses everything else: one critical
/// call-emergency-services entry is the whole list.
fn build_recommendations(alerts: &[Alert], snapshot: &VitalsSnapshot) -> Vec<Recommendation> {
    if alerts.iter().any(Alert::is_emergency) {
        return vec![Recommendation {
            category: RecommendationCategory::Emergency,
            priority: RecommendationPriority::Critical,
            message: "Call emergency services immediately".to_string(),
        }];
    }

    let mut recommendations = Vec::new();

    if alerts.iter().any(|a| a.action == AlertAction::Consult) {
        recommendations.push(Recommendation {
            category: RecommendationCategory::Medical,
            priority: RecommendationPriority::High,
            message: "Consult a medical professional about the flagged readings".to_string(),
        });
    }

    if snapshot
        .activity
        .steps
        .is_some_and(|s| s < STEPS_ACTIVITY_RECOMMENDATION_BELOW)
    {
        recommendations.push(Recommendation {
            category: RecommendationCategory::Activity,
            priority: RecommendationPriority::Medium,
            message: "Activity is low today; a short walk would help".to_string(),
        });
    }

    if let Some(sleep) = snapshot.sleep {
        if sleep
            .quality_percent
            .is_some_and(|q| q < SLEEP_QUALITY_RECOMMENDATION_BELOW)
        {
            recommendations.push(Recommendation {
                category: RecommendationCategory::Sleep,
                priority: RecommendationPriority::Medium,
                message: "Sleep quality was poor last night; consider an earlier bedtime".to_string(),
            });
        }
    }

    // Gated on the snapshot's own hour so the result stays deterministic
    let hour = snapshot.timestamp.hour();
    if (HYDRATION_HOUR_START..=HYDRATION_HOUR_END).contains(&hour) {
        recommendations.push(Recommendation {
            category: RecommendationCategory::Hydration,
            priority: RecommendationPriority::Low,
            message: "Remember to stay hydrated through the day".to_string(),
        });
    }

    recommendations
}
