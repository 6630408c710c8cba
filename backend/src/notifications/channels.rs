//! Delivery channel contracts and HTTP gateway adapters
//!
//! The engine only depends on the [`EmailSender`] / [`SmsSender`] traits;
//! the structs here adapt them onto JSON-over-HTTP relay providers. Each
//! client governs its own timeouts, the dispatcher imposes none of its own.

use crate::config::{EmailGatewayConfig, SmsGatewayConfig};
use crate::notifications::rate_gate::{normalize_phone, RateGate};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use vitalguard_shared::errors::ChannelError;

/// Provider acknowledgement for one accepted message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub message_id: String,
}

/// Electronic mail delivery channel
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str)
        -> Result<DeliveryReceipt, ChannelError>;
}

/// SMS delivery channel
///
/// Implementations must consult the rate gate before dialing the provider
/// unless `emergency` is set.
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, to: &str, body: &str, emergency: bool)
        -> Result<DeliveryReceipt, ChannelError>;
}

#[derive(Serialize)]
struct EmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

#[derive(Serialize)]
struct SmsRequest<'a> {
    to: &'a str,
    body: &'a str,
    priority: &'a str,
}

/// Relay response body; `error` set means the provider rejected the message
#[derive(Deserialize, Default)]
struct GatewayResponse {
    id: Option<String>,
    error: Option<String>,
}

/// Email relay speaking JSON over HTTP
pub struct HttpEmailGateway {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from_address: String,
}

impl HttpEmailGateway {
    pub fn new(config: &EmailGatewayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl EmailSender for HttpEmailGateway {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        html: &str,
    ) -> Result<DeliveryReceipt, ChannelError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&EmailRequest {
                from: &self.from_address,
                to,
                subject,
                html,
            })
            .send()
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChannelError::Rejected(format!(
                "email relay returned {status}"
            )));
        }

        let body: GatewayResponse = response.json().await.unwrap_or_default();
        if let Some(error) = body.error {
            return Err(ChannelError::Rejected(error));
        }
        Ok(DeliveryReceipt {
            message_id: body.id.unwrap_or_default(),
        })
    }
}

/// SMS gateway speaking JSON over HTTP, guarded by the process-wide
/// [`RateGate`]
pub struct HttpSmsGateway {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    default_country_code: String,
    rate_gate: Arc<RateGate>,
}

impl HttpSmsGateway {
    pub fn new(config: &SmsGatewayConfig, rate_gate: Arc<RateGate>) -> Result<Self> {
        // No explicit timeout: the SMS provider's defaults apply
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            default_country_code: config.default_country_code.clone(),
            rate_gate,
        })
    }
}

#[async_trait]
impl SmsSender for HttpSmsGateway {
    async fn send(
        &self,
        to: &str,
        body: &str,
        emergency: bool,
    ) -> Result<DeliveryReceipt, ChannelError> {
        // Normalize before the gate lookup so every representation of a
        // number shares one window
        let to = normalize_phone(to, &self.default_country_code);
        self.rate_gate.admit(&to, emergency)?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&SmsRequest {
                to: &to,
                body,
                priority: if emergency { "emergency" } else { "normal" },
            })
            .send()
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChannelError::Rejected(format!(
                "sms gateway returned {status}"
            )));
        }

        let body: GatewayResponse = response.json().await.unwrap_or_default();
        if let Some(error) = body.error {
            return Err(ChannelError::Rejected(error));
        }
        Ok(DeliveryReceipt {
            message_id: body.id.unwrap_or_default(),
        })
    }
}
