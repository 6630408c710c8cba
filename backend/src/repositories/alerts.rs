//! Emergency alert repository for lifecycle row operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use vitalguard_shared::models::{AlertStatus, EmergencyAlert, GeoPoint};

/// Emergency alert row from the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmergencyAlertRecord {
    pub alert_id: Uuid,
    pub user_id: Uuid,
    pub cause: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub status: String,
    pub triggered_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

impl EmergencyAlertRecord {
    pub fn into_model(self) -> Result<EmergencyAlert> {
        let status = self
            .status
            .parse::<AlertStatus>()
            .map_err(anyhow::Error::msg)?;
        let location = match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
            _ => None,
        };
        Ok(EmergencyAlert {
            alert_id: self.alert_id,
            user_id: self.user_id,
            cause: self.cause,
            location,
            status,
            triggered_at: self.triggered_at,
            resolved_at: self.resolved_at,
            note: self.note,
        })
    }
}

/// Emergency alert repository
pub struct EmergencyAlertRepository;

impl EmergencyAlertRepository {
    /// Persist a freshly triggered alert. Fails on a duplicate id.
    pub async fn create(pool: &PgPool, alert: &EmergencyAlert) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO emergency_alerts
                (alert_id, user_id, cause, lat, lng, status, triggered_at, resolved_at, note)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(alert.alert_id)
        .bind(alert.user_id)
        .bind(&alert.cause)
        .bind(alert.location.map(|p| p.lat))
        .bind(alert.location.map(|p| p.lng))
        .bind(alert.status.as_str())
        .bind(alert.triggered_at)
        .bind(alert.resolved_at)
        .bind(&alert.note)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Transition a still-triggered alert, returning the affected count.
    ///
    /// The `status = 'triggered'` condition makes the transition atomic:
    /// of two racing resolvers only one row update succeeds, the other
    /// sees zero rows affected.
    pub async fn update_status(
        pool: &PgPool,
        alert_id: Uuid,
        status: AlertStatus,
        resolved_at: DateTime<Utc>,
        note: Option<&str>,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE emergency_alerts
            SET status = $2, resolved_at = $3, note = COALESCE($4, note)
            WHERE alert_id = $1 AND status = 'triggered'
            "#,
        )
        .bind(alert_id)
        .bind(status.as_str())
        .bind(resolved_at)
        .bind(note)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn find_by_id(pool: &PgPool, alert_id: Uuid) -> Result<Option<EmergencyAlert>> {
        let record = sqlx::query_as::<_, EmergencyAlertRecord>(
            r#"
            SELECT alert_id, user_id, cause, lat, lng, status, triggered_at, resolved_at, note
            FROM emergency_alerts
            WHERE alert_id = $1
            "#,
        )
        .bind(alert_id)
        .fetch_optional(pool)
        .await?;

        record.map(EmergencyAlertRecord::into_model).transpose()
    }

    /// All of a user's alerts still in the triggered state, newest first
    pub async fn find_active_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<EmergencyAlert>> {
        let records = sqlx::query_as::<_, EmergencyAlertRecord>(
            r#"
            SELECT alert_id, user_id, cause, lat, lng, status, triggered_at, resolved_at, note
            FROM emergency_alerts
            WHERE user_id = $1 AND status = 'triggered'
            ORDER BY triggered_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        records
            .into_iter()
            .map(EmergencyAlertRecord::into_model)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_into_model_requires_both_coordinates() {
        let record = EmergencyAlertRecord {
            alert_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            cause: "manual_sos".to_string(),
            lat: Some(12.97),
            lng: None,
            status: "triggered".to_string(),
            triggered_at: Utc::now(),
            resolved_at: None,
            note: None,
        };
        let alert = record.into_model().unwrap();
        assert!(alert.location.is_none());
        assert_eq!(alert.status, AlertStatus::Triggered);
    }

    #[test]
    fn test_record_with_unknown_status_fails() {
        let record = EmergencyAlertRecord {
            alert_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            cause: "manual_sos".to_string(),
            lat: None,
            lng: None,
            status: "archived".to_string(),
            triggered_at: Utc::now(),
            resolved_at: None,
            note: None,
        };
        assert!(record.into_model().is_err());
    }
}
