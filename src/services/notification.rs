//! Notification service implementation
//!
//! Formats and sends outbound reminder messages. Formatting is kept as a
//! plain function so it can be exercised without a bot instance.

use teloxide::{prelude::*, types::ChatId, types::ParseMode, Bot};
use tracing::{debug, info};

use crate::models::{Event, ReminderThreshold};
use crate::utils::errors::{RemindBuddyError, Result};
use crate::utils::helpers;

/// Notification service for outbound messages
#[derive(Debug, Clone)]
pub struct NotificationService {
    bot: Bot,
}

impl NotificationService {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    /// Send one reminder for an event at the given threshold.
    ///
    /// The display name is optional; an unregistered or unresolvable owner
    /// still gets the reminder with an anonymous greeting.
    pub async fn send_reminder(
        &self,
        user_name: Option<&str>,
        event: &Event,
        threshold: ReminderThreshold,
    ) -> Result<()> {
        let text = reminder_text(user_name, event, threshold);

        debug!(chat_id = event.chat_id, event_id = event.id, threshold = ?threshold, "Sending reminder");

        self.bot
            .send_message(ChatId(event.chat_id), text)
            .parse_mode(ParseMode::Html)
            .await
            .map_err(RemindBuddyError::Telegram)?;

        info!(chat_id = event.chat_id, event_id = event.id, event_name = %event.name,
              threshold = ?threshold, "Reminder sent");
        Ok(())
    }
}

/// Greeting line shared by reminders and command replies
pub fn greeting(user_name: Option<&str>) -> String {
    match user_name {
        Some(name) => format!("Hi {}! ", helpers::escape_html(name)),
        None => "Hi! ".to_string(),
    }
}

/// Build the full reminder message body
pub fn reminder_text(user_name: Option<&str>, event: &Event, threshold: ReminderThreshold) -> String {
    format!(
        "{greeting}{heading}\n\n\
         📅 Event: {name}\n\
         🕐 When: {date} {time}\n\n\
         {footer}",
        greeting = greeting(user_name),
        heading = threshold.heading(),
        name = helpers::escape_html(&event.name),
        date = helpers::format_due_date(event.due_at),
        time = helpers::format_due_time(event.due_at),
        footer = threshold.footer(),
    )
}
