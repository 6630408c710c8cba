//! Emergency message composition
//!
//! Subjects come from a fixed cause-to-label mapping; unknown causes fall
//! back to a generic label. When both coordinates are present a map link is
//! embedded, otherwise the message says the location is unavailable.

use chrono::{DateTime, Utc};
use vitalguard_shared::models::{cause, GeoPoint};

/// Everything the dispatcher needs to render messages for one alert
#[derive(Debug, Clone)]
pub struct AlertPayload {
    /// Display name of the user the alert is about
    pub user_name: String,
    /// Free-form cause tag (`manual_sos`, `fall_detected`, ...)
    pub cause: String,
    pub location: Option<GeoPoint>,
    pub triggered_at: DateTime<Utc>,
}

/// Rendered message bodies for one contact
#[derive(Debug, Clone)]
pub struct AlertMessage {
    pub subject: String,
    pub email_html: String,
    pub sms_body: String,
}

/// Fixed mapping from cause tag to human-readable subject
pub fn subject_for_cause(cause_tag: &str) -> &'static str {
    match cause_tag {
        cause::MANUAL_SOS => "MANUAL SOS BUTTON PRESSED",
        cause::FALL_DETECTED => "FALL DETECTED",
        cause::HEART_RATE_ABNORMAL => "ABNORMAL HEART RATE DETECTED",
        _ => "EMERGENCY ALERT",
    }
}

/// Map link for the alert location, when both coordinates are known
pub fn map_link(location: Option<GeoPoint>) -> Option<String> {
    location.map(|p| format!("https://www.google.com/maps?q={},{}", p.lat, p.lng))
}

/// Render the email and SMS bodies for one contact
pub fn compose(payload: &AlertPayload, contact_name: &str) -> AlertMessage {
    let subject = subject_for_cause(&payload.cause).to_string();
    let location_line = match map_link(payload.location) {
        Some(link) => format!("Last known location: {link}"),
        None => "Last known location is unavailable".to_string(),
    };

    let email_html = format!(
        "<h2>{subject}</h2>\
         <p>Dear {contact_name},</p>\
         <p><strong>{user}</strong> may need your help. An emergency alert \
         was triggered at {time} UTC.</p>\
         <p>{location_line}</p>\
         <p>Please try to reach them immediately. If you cannot, contact \
         local emergency services.</p>",
        user = payload.user_name,
        time = payload.triggered_at.format("%Y-%m-%d %H:%M:%S"),
    );

    let sms_body = format!(
        "{subject}: {user} may need help ({time} UTC). {location_line}",
        user = payload.user_name,
        time = payload.triggered_at.format("%H:%M"),
    );

    AlertMessage {
        subject,
        email_html,
        sms_body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn payload(location: Option<GeoPoint>) -> AlertPayload {
        AlertPayload {
            user_name: "Asha Rao".to_string(),
            cause: cause::MANUAL_SOS.to_string(),
            location,
            triggered_at: Utc.with_ymd_and_hms(2026, 3, 1, 10, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_subject_mapping() {
        assert_eq!(subject_for_cause("manual_sos"), "MANUAL SOS BUTTON PRESSED");
        assert_eq!(subject_for_cause("fall_detected"), "FALL DETECTED");
        assert_eq!(
            subject_for_cause("heart_rate_abnormal"),
            "ABNORMAL HEART RATE DETECTED"
        );
        assert_eq!(subject_for_cause("low_battery"), "EMERGENCY ALERT");
    }

    #[test]
    fn test_map_link_embedded_when_location_known() {
        let message = compose(&payload(Some(GeoPoint { lat: 12.97, lng: 77.59 })), "Ravi");
        assert!(message
            .email_html
            .contains("https://www.google.com/maps?q=12.97,77.59"));
        assert!(message
            .sms_body
            .contains("https://www.google.com/maps?q=12.97,77.59"));
    }

    #[test]
    fn test_location_unavailable_text() {
        let message = compose(&payload(None), "Ravi");
        assert!(message.email_html.contains("unavailable"));
        assert!(message.sms_body.contains("unavailable"));
        assert!(!message.email_html.contains("maps?q="));
    }

    #[test]
    fn test_contact_and_user_names_rendered() {
        let message = compose(&payload(None), "Ravi");
        assert!(message.email_html.contains("Dear Ravi"));
        assert!(message.email_html.contains("Asha Rao"));
        assert!(message.sms_body.contains("Asha Rao"));
    }
}
