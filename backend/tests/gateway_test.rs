//! HTTP gateway adapter tests against a mock relay
//!
//! These run fully in-process (no database, no network beyond loopback).

use serde_json::json;
use std::sync::Arc;
use vitalguard_backend::config::{EmailGatewayConfig, SmsGatewayConfig};
use vitalguard_backend::notifications::{
    EmailSender, HttpEmailGateway, HttpSmsGateway, RateGate, SmsSender,
};
use vitalguard_shared::errors::ChannelError;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn email_config(server: &MockServer) -> EmailGatewayConfig {
    EmailGatewayConfig {
        endpoint: format!("{}/api/send", server.uri()),
        api_key: "email-key".to_string(),
        from_address: "alerts@vitalguard.local".to_string(),
        timeout_secs: 5,
    }
}

fn sms_config(server: &MockServer) -> SmsGatewayConfig {
    SmsGatewayConfig {
        endpoint: format!("{}/api/sms", server.uri()),
        api_key: "sms-key".to_string(),
        default_country_code: "91".to_string(),
    }
}

#[tokio::test]
async fn test_email_send_returns_receipt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/send"))
        .and(header("authorization", "Bearer email-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "msg-42"})))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = HttpEmailGateway::new(&email_config(&server)).unwrap();
    let receipt = gateway
        .send("ravi@example.com", "EMERGENCY ALERT", "<p>help</p>")
        .await
        .unwrap();

    assert_eq!(receipt.message_id, "msg-42");
}

#[tokio::test]
async fn test_email_provider_error_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/send"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": "unknown recipient"})),
        )
        .mount(&server)
        .await;

    let gateway = HttpEmailGateway::new(&email_config(&server)).unwrap();
    let result = gateway.send("nobody@example.com", "subject", "body").await;

    assert!(matches!(result, Err(ChannelError::Rejected(msg)) if msg.contains("unknown recipient")));
}

#[tokio::test]
async fn test_email_http_error_status_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/send"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let gateway = HttpEmailGateway::new(&email_config(&server)).unwrap();
    let result = gateway.send("ravi@example.com", "subject", "body").await;

    assert!(matches!(result, Err(ChannelError::Rejected(_))));
}

#[tokio::test]
async fn test_sms_send_normalizes_number() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/sms"))
        .and(body_partial_json(json!({"to": "+919876543210"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "sms-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let gate = Arc::new(RateGate::new(10));
    let gateway = HttpSmsGateway::new(&sms_config(&server), gate).unwrap();
    let receipt = gateway.send("98765 43210", "SOS", false).await.unwrap();

    assert_eq!(receipt.message_id, "sms-1");
}

#[tokio::test]
async fn test_sms_rate_limit_blocks_before_dialing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/sms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "sms-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let gate = Arc::new(RateGate::new(1));
    let gateway = HttpSmsGateway::new(&sms_config(&server), gate).unwrap();

    gateway.send("+919876543210", "first", false).await.unwrap();
    let second = gateway.send("+919876543210", "second", false).await;

    // The provider is never dialed for the limited send (expect(1) above)
    assert!(matches!(second, Err(ChannelError::RateLimited(_))));
}

#[tokio::test]
async fn test_sms_emergency_bypasses_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/sms"))
        .and(body_partial_json(json!({"priority": "emergency"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "sms-1"})))
        .expect(1)
        .mount(&server)
        .await;

    // A zero-entry window rejects every normal send
    let gate = Arc::new(RateGate::new(0));
    let gateway = HttpSmsGateway::new(&sms_config(&server), gate).unwrap();

    let normal = gateway.send("+919876543210", "ping", false).await;
    assert!(matches!(normal, Err(ChannelError::RateLimited(_))));

    let emergency = gateway.send("+919876543210", "SOS", true).await;
    assert!(emergency.is_ok());
}

#[tokio::test]
async fn test_sms_unreachable_gateway_is_transport_error() {
    // Nothing listens on this port
    let config = SmsGatewayConfig {
        endpoint: "http://127.0.0.1:1/api/sms".to_string(),
        api_key: "sms-key".to_string(),
        default_country_code: "91".to_string(),
    };
    let gate = Arc::new(RateGate::new(10));
    let gateway = HttpSmsGateway::new(&config, gate).unwrap();

    let result = gateway.send("+919876543210", "SOS", false).await;
    assert!(matches!(result, Err(ChannelError::Transport(_))));
}
