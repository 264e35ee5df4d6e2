//! Database service layer
//!
//! This module provides a high-level interface to database operations

use tracing::warn;

use crate::database::{DatabasePool, EventRepository, UserRepository};
use crate::utils::errors::RemindBuddyError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pool: DatabasePool,
    pub users: UserRepository,
    pub events: EventRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            pool,
        }
    }

    /// Check that the store is reachable
    pub async fn health_check(&self) -> Result<(), RemindBuddyError> {
        crate::database::connection::health_check(&self.pool).await
    }

    /// Best-effort display-name lookup; store failures degrade to an
    /// anonymous greeting instead of blocking the caller.
    pub async fn display_name(&self, chat_id: i64) -> Option<String> {
        match self.users.find_by_chat_id(chat_id).await {
            Ok(user) => user.map(|u| u.name),
            Err(e) => {
                warn!(chat_id = chat_id, error = %e, "Failed to resolve display name");
                None
            }
        }
    }
}
