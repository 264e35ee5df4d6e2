//! User repository implementation

use sqlx::PgPool;

use crate::models::user::User;
use crate::utils::errors::RemindBuddyError;

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user or overwrite the stored name for an existing chat.
    ///
    /// Last write wins; re-registration never creates a duplicate identity.
    pub async fn upsert(&self, chat_id: i64, name: &str) -> Result<User, RemindBuddyError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (chat_id, name)
            VALUES ($1, $2)
            ON CONFLICT (chat_id) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, chat_id, name, created_at
            "#,
        )
        .bind(chat_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by chat identity
    pub async fn find_by_chat_id(&self, chat_id: i64) -> Result<Option<User>, RemindBuddyError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, chat_id, name, created_at FROM users WHERE chat_id = $1",
        )
        .bind(chat_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
