//! Conversation context management
//!
//! This module tracks one chat's position in an active conversation flow
//! together with the draft data accumulated along the way. Contexts are
//! transient; nothing here touches durable storage.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::errors::{RemindBuddyError, Result};

/// One chat's conversation context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Chat this context belongs to
    pub chat_id: i64,
    /// Current scenario the chat is in
    pub scenario: Option<String>,
    /// Current step within the scenario
    pub step: Option<String>,
    /// Draft data accumulated across steps
    pub data: HashMap<String, serde_json::Value>,
    /// When this context is evicted if the flow is abandoned
    pub expires_at: Option<DateTime<Utc>>,
    /// When this context was last updated
    pub updated_at: DateTime<Utc>,
}

impl ConversationContext {
    /// Create a new conversation context for a chat
    pub fn new(chat_id: i64) -> Self {
        Self {
            chat_id,
            scenario: None,
            step: None,
            data: HashMap::new(),
            expires_at: None,
            updated_at: Utc::now(),
        }
    }

    /// Start a scenario, discarding any previous draft
    pub fn start_scenario(&mut self, scenario: &str, initial_step: &str) {
        self.scenario = Some(scenario.to_string());
        self.step = Some(initial_step.to_string());
        self.data.clear();
        self.updated_at = Utc::now();
    }

    /// Move to the next step in the current scenario
    pub fn next_step(&mut self, step: &str) -> Result<()> {
        if self.scenario.is_none() {
            return Err(RemindBuddyError::InvalidStateTransition {
                from: "no_scenario".to_string(),
                to: step.to_string(),
            });
        }

        self.step = Some(step.to_string());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Complete the current scenario and clear the draft
    pub fn complete_scenario(&mut self) {
        self.scenario = None;
        self.step = None;
        self.data.clear();
        self.expires_at = None;
        self.updated_at = Utc::now();
    }

    /// Cancel the current scenario
    pub fn cancel_scenario(&mut self) {
        self.complete_scenario();
    }

    /// Set draft data for the current context
    pub fn set_data<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value)?;
        self.data.insert(key.to_string(), json_value);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Get draft data from the current context
    pub fn get_data<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>> {
        if let Some(value) = self.data.get(key) {
            let result: T = serde_json::from_value(value.clone())?;
            Ok(Some(result))
        } else {
            Ok(None)
        }
    }

    /// Get string data (convenience method)
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get_data::<String>(key).unwrap_or(None)
    }

    /// Check if the context has passed its idle expiry
    pub fn is_expired(&self) -> bool {
        if let Some(expires_at) = self.expires_at {
            Utc::now() > expires_at
        } else {
            false
        }
    }

    /// Refresh the idle expiry from now
    pub fn touch_expiry(&mut self, ttl: Duration) {
        self.expires_at = Some(Utc::now() + ttl);
        self.updated_at = Utc::now();
    }

    /// Check if the chat is in a specific scenario
    pub fn is_in_scenario(&self, scenario: &str) -> bool {
        self.scenario.as_deref() == Some(scenario)
    }

    /// Check if the chat is at a specific step
    pub fn is_at_step(&self, step: &str) -> bool {
        self.step.as_deref() == Some(step)
    }

    /// Check if the chat is in a specific scenario and step
    pub fn is_at(&self, scenario: &str, step: &str) -> bool {
        self.is_in_scenario(scenario) && self.is_at_step(step)
    }

    /// Get current scenario and step as a tuple
    pub fn current_state(&self) -> (Option<&str>, Option<&str>) {
        (self.scenario.as_deref(), self.step.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context() {
        let context = ConversationContext::new(555);
        assert_eq!(context.chat_id, 555);
        assert!(context.scenario.is_none());
        assert!(context.step.is_none());
        assert!(context.data.is_empty());
        assert!(!context.is_expired());
    }

    #[test]
    fn test_start_scenario() {
        let mut context = ConversationContext::new(555);
        context.start_scenario("registration", "name_input");

        assert!(context.is_at("registration", "name_input"));
        assert!(!context.is_at("registration", "other"));
    }

    #[test]
    fn test_start_scenario_discards_previous_draft() {
        let mut context = ConversationContext::new(555);
        context.start_scenario("event_creation", "event_name");
        context.set_data("event_name", "Ujian").unwrap();

        context.start_scenario("registration", "name_input");
        assert!(context.data.is_empty());
    }

    #[test]
    fn test_next_step_requires_scenario() {
        let mut context = ConversationContext::new(555);
        assert!(context.next_step("event_date").is_err());

        context.start_scenario("event_creation", "event_name");
        assert!(context.next_step("event_date").is_ok());
        assert!(context.is_at_step("event_date"));
    }

    #[test]
    fn test_data_operations() {
        let mut context = ConversationContext::new(555);
        context.set_data("event_name", "Ujian").unwrap();
        context
            .set_data("event_date", chrono::NaiveDate::from_ymd_opt(2030, 6, 1).unwrap())
            .unwrap();

        assert_eq!(context.get_string("event_name"), Some("Ujian".to_string()));
        let date: Option<chrono::NaiveDate> = context.get_data("event_date").unwrap();
        assert_eq!(date, chrono::NaiveDate::from_ymd_opt(2030, 6, 1));
        assert_eq!(context.get_string("missing"), None);
    }

    #[test]
    fn test_complete_clears_everything() {
        let mut context = ConversationContext::new(555);
        context.start_scenario("event_creation", "event_name");
        context.set_data("event_name", "Ujian").unwrap();
        context.touch_expiry(Duration::minutes(30));

        context.complete_scenario();
        assert_eq!(context.current_state(), (None, None));
        assert!(context.data.is_empty());
        assert!(context.expires_at.is_none());
    }

    #[test]
    fn test_expiry() {
        let mut context = ConversationContext::new(555);
        context.expires_at = Some(Utc::now() - Duration::hours(1));
        assert!(context.is_expired());

        context.touch_expiry(Duration::minutes(30));
        assert!(!context.is_expired());
    }
}
