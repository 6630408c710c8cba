//! Emergency alert lifecycle service
//!
//! Orchestrates the trigger/resolve state machine over the storage seams and
//! the notification fan-out. The write-before-dispatch ordering is
//! load-bearing: the alert row must be durable before any notification is
//! attempted, so a crash mid-dispatch never loses the alert.

use crate::crypto::PhoneCipher;
use crate::notifications::{AlertPayload, NotificationDispatcher};
use crate::repositories::{
    EmergencyAlertRepository, EmergencyContactRepository, UserRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use vitalguard_shared::errors::ServiceError;
use vitalguard_shared::models::{cause, AlertStatus, EmergencyAlert, EmergencyContact, GeoPoint};

/// Fallback display name when the user row is missing or unreadable
const UNKNOWN_USER_NAME: &str = "A VitalGuard user";

// ============================================================================
// Storage seams
// ============================================================================

/// Persistent storage for emergency alert rows
///
/// `update_status` must be conditional on the row still being triggered
/// and report zero rows affected otherwise; the service relies on that to
/// keep the terminal transition atomic under racing resolvers.
#[async_trait]
pub trait AlertStore: Send + Sync {
    async fn create(&self, alert: &EmergencyAlert) -> anyhow::Result<()>;
    async fn update_status(
        &self,
        alert_id: Uuid,
        status: AlertStatus,
        resolved_at: DateTime<Utc>,
        note: Option<&str>,
    ) -> anyhow::Result<u64>;
    async fn find_by_id(&self, alert_id: Uuid) -> anyhow::Result<Option<EmergencyAlert>>;
    async fn find_active_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<EmergencyAlert>>;
}

/// Read access to a user's emergency contacts, phones decrypted
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<EmergencyContact>>;
}

/// Display-name lookups
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn display_name(&self, user_id: Uuid) -> anyhow::Result<Option<String>>;
}

// ============================================================================
// Postgres implementations
// ============================================================================

pub struct PgAlertStore {
    pool: PgPool,
}

impl PgAlertStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertStore for PgAlertStore {
    async fn create(&self, alert: &EmergencyAlert) -> anyhow::Result<()> {
        EmergencyAlertRepository::create(&self.pool, alert).await
    }

    async fn update_status(
        &self,
        alert_id: Uuid,
        status: AlertStatus,
        resolved_at: DateTime<Utc>,
        note: Option<&str>,
    ) -> anyhow::Result<u64> {
        EmergencyAlertRepository::update_status(&self.pool, alert_id, status, resolved_at, note)
            .await
    }

    async fn find_by_id(&self, alert_id: Uuid) -> anyhow::Result<Option<EmergencyAlert>> {
        EmergencyAlertRepository::find_by_id(&self.pool, alert_id).await
    }

    async fn find_active_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<EmergencyAlert>> {
        EmergencyAlertRepository::find_active_by_user(&self.pool, user_id).await
    }
}

/// Contact directory over Postgres rows, decrypting phones on read.
///
/// A phone that fails to decrypt is dropped (with a warning) so the contact
/// is treated as unreachable by SMS rather than failing the dispatch.
pub struct PgContactDirectory {
    pool: PgPool,
    cipher: Arc<PhoneCipher>,
}

impl PgContactDirectory {
    pub fn new(pool: PgPool, cipher: Arc<PhoneCipher>) -> Self {
        Self { pool, cipher }
    }
}

#[async_trait]
impl ContactDirectory for PgContactDirectory {
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<EmergencyContact>> {
        let records = EmergencyContactRepository::list_by_user(&self.pool, user_id).await?;
        let contacts = records
            .into_iter()
            .map(|record| {
                let phone = record.phone_encrypted.as_deref().and_then(|envelope| {
                    let decrypted = self.cipher.decrypt(envelope);
                    if decrypted.is_none() {
                        warn!(
                            contact_id = %record.contact_id,
                            "contact phone failed to decrypt; treating as unreachable by SMS"
                        );
                    }
                    decrypted
                });
                EmergencyContact {
                    contact_id: record.contact_id,
                    user_id: record.user_id,
                    name: record.name,
                    email: record.email,
                    phone,
                    relation: record.relation,
                    priority: record.priority,
                }
            })
            .collect();
        Ok(contacts)
    }
}

pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn display_name(&self, user_id: Uuid) -> anyhow::Result<Option<String>> {
        UserRepository::get_display_name(&self.pool, user_id).await
    }
}

// ============================================================================
// Service
// ============================================================================

/// Result of a trigger call: the durable alert plus the best-effort count of
/// contacts a notification was attempted for
#[derive(Debug)]
pub struct TriggeredAlert {
    pub alert: EmergencyAlert,
    pub contacts_notified: usize,
}

/// Emergency alert orchestrator
///
/// State machine: `Triggered` is the only initial state (via [`trigger`]),
/// `Resolved` is terminal (via [`resolve`]); there is no transition back.
///
/// [`trigger`]: AlertService::trigger
/// [`resolve`]: AlertService::resolve
pub struct AlertService {
    store: Arc<dyn AlertStore>,
    contacts: Arc<dyn ContactDirectory>,
    users: Arc<dyn UserDirectory>,
    dispatcher: Arc<NotificationDispatcher>,
}

impl AlertService {
    pub fn new(
        store: Arc<dyn AlertStore>,
        contacts: Arc<dyn ContactDirectory>,
        users: Arc<dyn UserDirectory>,
        dispatcher: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            store,
            contacts,
            users,
            dispatcher,
        }
    }

    /// Trigger a new emergency alert and fan out notifications.
    ///
    /// The row is persisted first and is the operation's primary guarantee:
    /// a storage failure here fails the call, while every later step
    /// degrades instead of failing. The notified count reflects contacts
    /// attempted; per-channel failures are logged, not surfaced.
    pub async fn trigger(
        &self,
        user_id: Uuid,
        cause_tag: Option<String>,
        location: Option<GeoPoint>,
    ) -> Result<TriggeredAlert, ServiceError> {
        let cause_tag = cause_tag.unwrap_or_else(|| cause::MANUAL_SOS.to_string());
        let alert = EmergencyAlert {
            alert_id: Uuid::new_v4(),
            user_id,
            cause: cause_tag.clone(),
            location,
            status: AlertStatus::Triggered,
            triggered_at: Utc::now(),
            resolved_at: None,
            note: None,
        };

        self.store
            .create(&alert)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;
        info!(alert_id = %alert.alert_id, %user_id, cause = %cause_tag, "emergency alert recorded");

        // Read failures past this point downgrade to "notify zero contacts";
        // the alert already exists.
        let contacts = match self.contacts.list_by_user(user_id).await {
            Ok(contacts) => contacts,
            Err(error) => {
                warn!(%user_id, %error, "contact lookup failed; notifying zero contacts");
                Vec::new()
            }
        };
        let user_name = match self.users.display_name(user_id).await {
            Ok(Some(name)) => name,
            Ok(None) => UNKNOWN_USER_NAME.to_string(),
            Err(error) => {
                warn!(%user_id, %error, "display name lookup failed");
                UNKNOWN_USER_NAME.to_string()
            }
        };

        let payload = AlertPayload {
            user_name,
            cause: cause_tag,
            location,
            triggered_at: alert.triggered_at,
        };
        let results = self.dispatcher.broadcast(&contacts, &payload).await;

        Ok(TriggeredAlert {
            alert,
            contacts_notified: results.len(),
        })
    }

    /// Resolve a triggered alert.
    ///
    /// Fails with NotFound for an unknown id and Conflict when the alert is
    /// already terminal; repeated resolution is an error, not a no-op. The
    /// pre-read only produces a friendlier error; the conditional write is
    /// what decides a race between two resolvers.
    pub async fn resolve(
        &self,
        alert_id: Uuid,
        status: Option<AlertStatus>,
        note: Option<String>,
    ) -> Result<EmergencyAlert, ServiceError> {
        let target = status.unwrap_or(AlertStatus::Resolved);
        if target == AlertStatus::Triggered {
            return Err(ServiceError::Validation(
                "an alert cannot transition back to triggered".to_string(),
            ));
        }

        let existing = self
            .store
            .find_by_id(alert_id)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?
            .ok_or_else(|| ServiceError::NotFound(format!("alert {alert_id}")))?;

        if existing.status.is_terminal() {
            return Err(ServiceError::Conflict(format!(
                "alert {alert_id} is already {}",
                existing.status
            )));
        }

        let resolved_at = Utc::now();
        let affected = self
            .store
            .update_status(alert_id, target, resolved_at, note.as_deref())
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;
        if affected == 0 {
            // lost a race between the read and the conditional write:
            // either the row vanished or another resolver got there first
            return match self
                .store
                .find_by_id(alert_id)
                .await
                .map_err(|e| ServiceError::Database(e.to_string()))?
            {
                None => Err(ServiceError::NotFound(format!("alert {alert_id}"))),
                Some(_) => Err(ServiceError::Conflict(format!(
                    "alert {alert_id} was resolved concurrently"
                ))),
            };
        }

        info!(%alert_id, status = %target, "emergency alert resolved");
        Ok(EmergencyAlert {
            status: target,
            resolved_at: Some(resolved_at),
            note: note.or(existing.note),
            ..existing
        })
    }

    /// All of a user's alerts still in the triggered state
    pub async fn list_active(&self, user_id: Uuid) -> Result<Vec<EmergencyAlert>, ServiceError> {
        self.store
            .find_active_by_user(user_id)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))
    }

    /// Fetch one alert by id
    pub async fn get(&self, alert_id: Uuid) -> Result<EmergencyAlert, ServiceError> {
        self.store
            .find_by_id(alert_id)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?
            .ok_or_else(|| ServiceError::NotFound(format!("alert {alert_id}")))
    }
}
