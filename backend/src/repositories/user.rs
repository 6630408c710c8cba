//! User repository (display-name lookups only)
//!
//! Full user CRUD lives in another service; the dispatch engine only needs
//! a name to put in notifications.

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// User repository
pub struct UserRepository;

impl UserRepository {
    pub async fn get_display_name(pool: &PgPool, user_id: Uuid) -> Result<Option<String>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT display_name FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(pool)
                .await?;

        Ok(row.map(|(name,)| name))
    }
}
