//! Input validation functions
//!
//! Plausibility checks for snapshots and alert requests. These reject
//! malformed input before analysis; a plausible-but-abnormal reading is the
//! analyzer's job, not validation's.

use crate::models::{GeoPoint, VitalsSnapshot};
use validator::ValidationError;

/// Validate that a snapshot's measurements are physically plausible
pub fn validate_snapshot(snapshot: &VitalsSnapshot) -> Result<(), String> {
    if let Some(hr) = snapshot.vitals.heart_rate {
        if !(20..=300).contains(&hr) {
            return Err(format!("Heart rate {hr} bpm is outside the plausible range"));
        }
    }
    if let Some(bp) = snapshot.vitals.blood_pressure {
        if !(50..=300).contains(&bp.systolic) || !(30..=200).contains(&bp.diastolic) {
            return Err(format!(
                "Blood pressure {}/{} mmHg is outside the plausible range",
                bp.systolic, bp.diastolic
            ));
        }
        if bp.diastolic >= bp.systolic {
            return Err("Diastolic pressure must be below systolic".to_string());
        }
    }
    if let Some(spo2) = snapshot.vitals.oxygen_saturation {
        if !(0.0..=100.0).contains(&spo2) || spo2.is_nan() {
            return Err("Oxygen saturation must be a percentage".to_string());
        }
    }
    if let Some(temp) = snapshot.vitals.temperature {
        if !(25.0..=45.0).contains(&temp) || temp.is_nan() {
            return Err(format!("Temperature {temp} \u{b0}C is outside the plausible range"));
        }
    }
    if let Some(rate) = snapshot.vitals.respiratory_rate {
        if !(4..=60).contains(&rate) {
            return Err(format!("Respiratory rate {rate}/min is outside the plausible range"));
        }
    }
    if let Some(steps) = snapshot.activity.steps {
        if steps < 0 {
            return Err("Step count cannot be negative".to_string());
        }
    }
    if let Some(minutes) = snapshot.activity.active_minutes {
        if minutes < 0 {
            return Err("Active minutes cannot be negative".to_string());
        }
    }
    if let Some(sleep) = snapshot.sleep {
        if let Some(quality) = sleep.quality_percent {
            if !(0..=100).contains(&quality) {
                return Err("Sleep quality must be between 0 and 100".to_string());
            }
        }
    }
    Ok(())
}

/// Validate geographic coordinates (used by the `validator` derive)
pub fn validate_location(location: &GeoPoint) -> Result<(), ValidationError> {
    if !(-90.0..=90.0).contains(&location.lat) || location.lat.is_nan() {
        return Err(ValidationError::new("latitude_out_of_range"));
    }
    if !(-180.0..=180.0).contains(&location.lng) || location.lng.is_nan() {
        return Err(ValidationError::new("longitude_out_of_range"));
    }
    Ok(())
}

/// Validate a raw phone number before normalization
pub fn validate_phone(phone: &str) -> Result<(), String> {
    if phone.is_empty() {
        return Err("Phone number cannot be empty".to_string());
    }
    let phone_regex = regex_lite::Regex::new(r"^\+?[0-9 ()\-]{8,20}$").unwrap();
    if !phone_regex.is_match(phone) {
        return Err("Invalid phone number format".to_string());
    }
    Ok(())
}
