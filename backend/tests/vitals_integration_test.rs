//! Integration tests for the vitals analysis endpoint

mod common;

use axum::http::StatusCode;
use serde_json::Value;
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires database"]
async fn test_analyze_healthy_snapshot() {
    let app = common::TestApp::new().await;
    let user_id = Uuid::new_v4();

    let body = format!(
        r#"{{
            "user_id": "{user_id}",
            "timestamp": "2026-08-20T09:00:00Z",
            "vitals": {{"heart_rate": 72, "oxygen_saturation": 98.0, "temperature": 36.6}},
            "activity": {{"steps": 12000, "active_minutes": 75}}
        }}"#
    );
    let (status, response) = app.post("/api/v1/vitals/analyze", &body).await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(json["status"], "normal");
    assert_eq!(json["health_score"], 100);
    assert_eq!(json["alerts"].as_array().unwrap().len(), 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_analyze_critical_snapshot() {
    let app = common::TestApp::new().await;
    let user_id = Uuid::new_v4();

    let body = format!(
        r#"{{
            "user_id": "{user_id}",
            "timestamp": "2026-08-20T09:00:00Z",
            "vitals": {{"heart_rate": 150, "oxygen_saturation": 88.0}},
            "activity": {{"steps": 50, "active_minutes": 0}}
        }}"#
    );
    let (status, response) = app.post("/api/v1/vitals/analyze", &body).await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(json["status"], "critical");
    assert!(json["alerts"].as_array().unwrap().len() >= 2);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_analyze_rejects_implausible_vitals() {
    let app = common::TestApp::new().await;
    let user_id = Uuid::new_v4();

    let body = format!(
        r#"{{
            "user_id": "{user_id}",
            "timestamp": "2026-08-20T09:00:00Z",
            "vitals": {{"heart_rate": 1000}},
            "activity": {{"steps": 0, "active_minutes": 0}}
        }}"#
    );
    let (status, _) = app.post("/api/v1/vitals/analyze", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
