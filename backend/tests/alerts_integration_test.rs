//! Integration tests for the emergency alert endpoints
//!
//! These exercise the full stack against a real database. Notification
//! gateways point at unroutable local ports, so every channel attempt fails;
//! the alert lifecycle must be unaffected by that.

mod common;

use axum::http::StatusCode;
use serde_json::Value;
use uuid::Uuid;
use vitalguard_backend::crypto::PhoneCipher;

async fn seed_contact(app: &common::TestApp, user_id: Uuid, name: &str, priority: i32) {
    let cipher = PhoneCipher::new("test-secret-key-for-testing-only-32chars");
    let phone = cipher.encrypt("+919876543210").unwrap();
    sqlx::query(
        "INSERT INTO emergency_contacts (contact_id, user_id, name, email, phone_encrypted, relation, priority)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(name)
    .bind(format!("{name}@example.com"))
    .bind(phone)
    .bind("family")
    .bind(priority)
    .execute(&app.pool)
    .await
    .expect("Failed to seed contact");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_trigger_alert_with_contacts() {
    let app = common::TestApp::new().await;
    app.cleanup().await;
    let user_id = app.seed_user("Asha").await;
    seed_contact(&app, user_id, "Ravi", 1).await;
    seed_contact(&app, user_id, "Meera", 2).await;

    let body = format!(
        r#"{{"user_id":"{user_id}","cause":"fall_detected","location":{{"lat":12.97,"lng":77.59}}}}"#
    );
    let (status, response) = app.post("/api/v1/alerts", &body).await;

    assert_eq!(status, StatusCode::CREATED);
    let json: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(json["status"], "triggered");
    assert_eq!(json["contacts_notified"], 2);
    assert!(json["alert_id"].as_str().is_some());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_trigger_defaults_cause_to_manual_sos() {
    let app = common::TestApp::new().await;
    app.cleanup().await;
    let user_id = app.seed_user("Asha").await;

    let body = format!(r#"{{"user_id":"{user_id}"}}"#);
    let (status, response) = app.post("/api/v1/alerts", &body).await;
    assert_eq!(status, StatusCode::CREATED);

    let json: Value = serde_json::from_str(&response).unwrap();
    let alert_id = json["alert_id"].as_str().unwrap();
    let (status, response) = app.get(&format!("/api/v1/alerts/{alert_id}")).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(json["cause"], "manual_sos");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_trigger_rejects_invalid_location() {
    let app = common::TestApp::new().await;
    app.cleanup().await;
    let user_id = app.seed_user("Asha").await;

    let body = format!(r#"{{"user_id":"{user_id}","location":{{"lat":123.0,"lng":77.59}}}}"#);
    let (status, _) = app.post("/api/v1/alerts", &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_resolve_alert_lifecycle() {
    let app = common::TestApp::new().await;
    app.cleanup().await;
    let user_id = app.seed_user("Asha").await;

    let body = format!(r#"{{"user_id":"{user_id}"}}"#);
    let (_, response) = app.post("/api/v1/alerts", &body).await;
    let json: Value = serde_json::from_str(&response).unwrap();
    let alert_id = json["alert_id"].as_str().unwrap().to_string();

    // Resolve with a note
    let (status, response) = app
        .post(
            &format!("/api/v1/alerts/{alert_id}/resolve"),
            r#"{"note":"false alarm"}"#,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(json["status"], "resolved");
    assert!(json["resolved_at"].as_str().is_some());

    // Second resolve is a conflict, not a no-op
    let (status, _) = app
        .post_empty(&format!("/api/v1/alerts/{alert_id}/resolve"))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_resolve_unknown_alert_returns_404() {
    let app = common::TestApp::new().await;
    app.cleanup().await;

    let (status, _) = app
        .post_empty(&format!("/api/v1/alerts/{}/resolve", Uuid::new_v4()))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_active_alerts_listing() {
    let app = common::TestApp::new().await;
    app.cleanup().await;
    let user_id = app.seed_user("Asha").await;

    let body = format!(r#"{{"user_id":"{user_id}"}}"#);
    let (_, first) = app.post("/api/v1/alerts", &body).await;
    let (_, _second) = app.post("/api/v1/alerts", &body).await;

    let (status, response) = app
        .get(&format!("/api/v1/alerts/active?user_id={user_id}"))
        .await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(json["count"], 2);

    // Resolving one drops it from the active list
    let first: Value = serde_json::from_str(&first).unwrap();
    let alert_id = first["alert_id"].as_str().unwrap();
    let (status, _) = app
        .post_empty(&format!("/api/v1/alerts/{alert_id}/resolve"))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, response) = app
        .get(&format!("/api/v1/alerts/active?user_id={user_id}"))
        .await;
    let json: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(json["count"], 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_get_unknown_alert_returns_404() {
    let app = common::TestApp::new().await;
    app.cleanup().await;

    let (status, _) = app.get(&format!("/api/v1/alerts/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
