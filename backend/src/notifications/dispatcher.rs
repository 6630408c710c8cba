//! Concurrent multi-channel notification fan-out
//!
//! Every contact×channel attempt runs concurrently and settles
//! independently: a hung or failing channel for one contact never delays or
//! cancels the others. Channel errors are captured as values in the results,
//! never propagated out of [`NotificationDispatcher::broadcast`].

use crate::notifications::channels::{DeliveryReceipt, EmailSender, SmsSender};
use crate::notifications::message::{self, AlertPayload};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use vitalguard_shared::errors::ChannelError;
use vitalguard_shared::models::EmergencyContact;

/// Delivery channel identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Email,
    Sms,
}

/// Settled outcome of one channel attempt for one contact
#[derive(Debug)]
pub struct ChannelAttempt {
    pub channel: ChannelKind,
    pub outcome: Result<DeliveryReceipt, ChannelError>,
}

/// All channel attempts for one contact
#[derive(Debug)]
pub struct ContactDispatchResult {
    pub contact_id: Uuid,
    pub contact_name: String,
    pub priority: i32,
    pub attempts: Vec<ChannelAttempt>,
}

impl ContactDispatchResult {
    /// True when at least one channel accepted the message
    pub fn succeeded(&self) -> bool {
        self.attempts.iter().any(|a| a.outcome.is_ok())
    }

    pub fn attempt(&self, channel: ChannelKind) -> Option<&ChannelAttempt> {
        self.attempts.iter().find(|a| a.channel == channel)
    }
}

/// Fans one alert out to every contact across the configured channels
pub struct NotificationDispatcher {
    email: Arc<dyn EmailSender>,
    sms: Arc<dyn SmsSender>,
}

impl NotificationDispatcher {
    pub fn new(email: Arc<dyn EmailSender>, sms: Arc<dyn SmsSender>) -> Self {
        Self { email, sms }
    }

    /// Notify every contact, returning once all attempts have settled.
    ///
    /// Contacts arrive in ascending priority order; the results keep that
    /// order for display and logging, while delivery itself is concurrent
    /// with no ordering guarantee between contacts.
    pub async fn broadcast(
        &self,
        contacts: &[EmergencyContact],
        payload: &AlertPayload,
    ) -> Vec<ContactDispatchResult> {
        let results = join_all(
            contacts
                .iter()
                .map(|contact| self.notify_contact(contact, payload)),
        )
        .await;

        let delivered = results.iter().filter(|r| r.succeeded()).count();
        info!(
            cause = %payload.cause,
            contacts = contacts.len(),
            delivered,
            "emergency broadcast settled"
        );
        results
    }

    async fn notify_contact(
        &self,
        contact: &EmergencyContact,
        payload: &AlertPayload,
    ) -> ContactDispatchResult {
        let rendered = message::compose(payload, &contact.name);

        let email_attempt = async {
            match contact.email.as_deref() {
                Some(address) => {
                    self.email
                        .send(address, &rendered.subject, &rendered.email_html)
                        .await
                }
                None => Err(ChannelError::Unreachable("no email address on file".into())),
            }
        };
        // SMS is only attempted when the contact has a number at all
        let sms_attempt = async {
            match contact.phone.as_deref() {
                Some(number) => Some(self.sms.send(number, &rendered.sms_body, true).await),
                None => None,
            }
        };

        let (email_outcome, sms_outcome) = tokio::join!(email_attempt, sms_attempt);

        let mut attempts = vec![ChannelAttempt {
            channel: ChannelKind::Email,
            outcome: email_outcome,
        }];
        if let Some(outcome) = sms_outcome {
            attempts.push(ChannelAttempt {
                channel: ChannelKind::Sms,
                outcome,
            });
        }

        for attempt in &attempts {
            if let Err(error) = &attempt.outcome {
                warn!(
                    contact = %contact.name,
                    channel = ?attempt.channel,
                    %error,
                    "channel delivery failed"
                );
            }
        }

        ContactDispatchResult {
            contact_id: contact.contact_id,
            contact_name: contact.name.clone(),
            priority: contact.priority,
            attempts,
        }
    }
}
