//! Emergency contact repository
//!
//! Rows come back with the phone still encrypted; decryption happens in the
//! contact directory so the key never touches the data layer.

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// Emergency contact row from the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmergencyContactRecord {
    pub contact_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    /// `iv:tag:ciphertext` envelope, or legacy plaintext
    pub phone_encrypted: Option<String>,
    pub relation: String,
    pub priority: i32,
}

/// Emergency contact repository
pub struct EmergencyContactRepository;

impl EmergencyContactRepository {
    /// A user's contacts in ascending priority order
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<EmergencyContactRecord>> {
        let records = sqlx::query_as::<_, EmergencyContactRecord>(
            r#"
            SELECT contact_id, user_id, name, email, phone_encrypted, relation, priority
            FROM emergency_contacts
            WHERE user_id = $1
            ORDER BY priority ASC, created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Store a contact with an already-encrypted phone envelope
    pub async fn create(pool: &PgPool, record: &EmergencyContactRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO emergency_contacts
                (contact_id, user_id, name, email, phone_encrypted, relation, priority)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.contact_id)
        .bind(record.user_id)
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.phone_encrypted)
        .bind(&record.relation)
        .bind(record.priority)
        .execute(pool)
        .await?;

        Ok(())
    }
}
