//! State storage implementation
//!
//! Conversation drafts live in an in-process session map keyed by chat id.
//! Abandoned flows are evicted by an idle TTL, enforced lazily on load and
//! by a periodic sweep task; completed or cancelled flows are removed
//! explicitly by the handlers.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::context::ConversationContext;
use crate::config::StateConfig;

#[derive(Clone)]
pub struct StateStorage {
    contexts: Arc<Mutex<HashMap<i64, ConversationContext>>>,
    ttl: Duration,
}

impl StateStorage {
    /// Create a new state storage instance
    pub fn new(config: &StateConfig) -> Self {
        Self {
            contexts: Arc::new(Mutex::new(HashMap::new())),
            ttl: Duration::minutes(config.draft_ttl_minutes),
        }
    }

    /// Save a conversation context, refreshing its idle expiry
    pub async fn save_context(&self, context: &ConversationContext) {
        let mut stored = context.clone();
        stored.touch_expiry(self.ttl);

        debug!(chat_id = stored.chat_id, scenario = ?stored.scenario,
               step = ?stored.step, "Saving conversation context");

        let mut contexts = self.contexts.lock().await;
        contexts.insert(stored.chat_id, stored);
    }

    /// Load a chat's conversation context, dropping it if expired
    pub async fn load_context(&self, chat_id: i64) -> Option<ConversationContext> {
        let mut contexts = self.contexts.lock().await;

        match contexts.get(&chat_id) {
            Some(context) if context.is_expired() => {
                warn!(chat_id = chat_id, "Conversation context expired, removing");
                contexts.remove(&chat_id);
                None
            }
            Some(context) => Some(context.clone()),
            None => None,
        }
    }

    /// Delete a chat's conversation context
    pub async fn delete_context(&self, chat_id: i64) {
        let mut contexts = self.contexts.lock().await;
        if contexts.remove(&chat_id).is_some() {
            debug!(chat_id = chat_id, "Deleted conversation context");
        }
    }

    /// Remove all expired contexts, returning how many were evicted
    pub async fn cleanup_expired(&self) -> usize {
        let mut contexts = self.contexts.lock().await;
        let before = contexts.len();
        contexts.retain(|_, context| !context.is_expired());
        before - contexts.len()
    }

    /// Number of chats with an active flow
    pub async fn active_count(&self) -> usize {
        self.contexts.lock().await.len()
    }

    /// Start the periodic sweep for abandoned drafts
    pub fn spawn_cleanup(&self, period: std::time::Duration) -> tokio::task::JoinHandle<()> {
        let storage = self.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);

            loop {
                interval.tick().await;

                let cleaned = storage.cleanup_expired().await;
                if cleaned > 0 {
                    info!("Evicted {} abandoned conversation drafts", cleaned);
                }
            }
        })
    }
}

impl std::fmt::Debug for StateStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStorage")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_storage(ttl_minutes: i64) -> StateStorage {
        StateStorage::new(&StateConfig {
            draft_ttl_minutes: ttl_minutes,
        })
    }

    #[tokio::test]
    async fn test_context_save_load() {
        let storage = test_storage(30);

        let mut context = ConversationContext::new(555);
        context.start_scenario("event_creation", "event_name");
        context.set_data("event_name", "Ujian").unwrap();
        storage.save_context(&context).await;

        let loaded = storage.load_context(555).await.unwrap();
        assert_eq!(loaded.chat_id, 555);
        assert!(loaded.is_at("event_creation", "event_name"));
        assert_eq!(loaded.get_string("event_name"), Some("Ujian".to_string()));
        assert!(loaded.expires_at.is_some());
    }

    #[tokio::test]
    async fn test_contexts_are_per_chat() {
        let storage = test_storage(30);

        let mut first = ConversationContext::new(1);
        first.start_scenario("registration", "name_input");
        storage.save_context(&first).await;

        let mut second = ConversationContext::new(2);
        second.start_scenario("event_creation", "event_name");
        storage.save_context(&second).await;

        assert!(storage
            .load_context(1)
            .await
            .unwrap()
            .is_in_scenario("registration"));
        assert!(storage
            .load_context(2)
            .await
            .unwrap()
            .is_in_scenario("event_creation"));
    }

    #[tokio::test]
    async fn test_expired_context_is_dropped_on_load() {
        let storage = test_storage(30);

        let mut context = ConversationContext::new(555);
        context.start_scenario("registration", "name_input");
        storage.save_context(&context).await;

        // Force the stored copy past its expiry
        {
            let mut contexts = storage.contexts.lock().await;
            contexts.get_mut(&555).unwrap().expires_at =
                Some(chrono::Utc::now() - Duration::hours(1));
        }

        assert!(storage.load_context(555).await.is_none());
        assert_eq!(storage.active_count().await, 0);
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let storage = test_storage(30);

        let fresh = ConversationContext::new(1);
        storage.save_context(&fresh).await;

        let stale = ConversationContext::new(2);
        storage.save_context(&stale).await;
        {
            let mut contexts = storage.contexts.lock().await;
            contexts.get_mut(&2).unwrap().expires_at = Some(chrono::Utc::now() - Duration::hours(1));
        }

        assert_eq!(storage.cleanup_expired().await, 1);
        assert!(storage.load_context(1).await.is_some());
        assert!(storage.load_context(2).await.is_none());
    }

    #[tokio::test]
    async fn test_context_deletion() {
        let storage = test_storage(30);

        storage.save_context(&ConversationContext::new(555)).await;
        assert!(storage.load_context(555).await.is_some());

        storage.delete_context(555).await;
        assert!(storage.load_context(555).await.is_none());
    }
}
