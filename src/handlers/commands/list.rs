//! List command handler

use chrono::Utc;
use teloxide::{prelude::*, types::Message, types::ParseMode, Bot};
use tracing::debug;

use crate::database::DatabaseService;
use crate::utils::errors::Result;
use crate::utils::helpers;

/// Handle /list - show the caller's active, future events ordered by due
/// time ascending.
pub async fn handle_list(bot: Bot, msg: Message, db: DatabaseService) -> Result<()> {
    let chat_id = msg.chat.id;

    debug!(chat_id = chat_id.0, "Processing /list command");

    let user = match db.users.find_by_chat_id(chat_id.0).await? {
        Some(user) => user,
        None => {
            bot.send_message(
                chat_id,
                "You are not registered yet. Please send /start first to register.",
            )
            .await?;
            return Ok(());
        }
    };

    let events = db.events.list_active_upcoming(chat_id.0, Utc::now()).await?;

    if events.is_empty() {
        let text = format!(
            "Hi {}! 📋\n\nYou have no active events, or all of them have already passed.\n\nUse /add to create a new event.",
            helpers::escape_html(&user.name)
        );
        bot.send_message(chat_id, text).await?;
        return Ok(());
    }

    let mut text = format!("📋 <b>Events for {}:</b>\n\n", helpers::escape_html(&user.name));
    for (index, event) in events.iter().enumerate() {
        let badge = if event.is_active {
            "🟢 Active"
        } else {
            "🔴 Inactive"
        };
        text.push_str(&format!(
            "{}. 📅 <b>{}</b>\n   📆 {}\n   ⏰ {}\n   🔔 Reminders: {}\n   {}\n\n",
            index + 1,
            helpers::escape_html(&event.name),
            helpers::format_due_date(event.due_at),
            helpers::format_due_time(event.due_at),
            event.reminder_summary(),
            badge,
        ));
    }
    text.push_str("Use /stop to stop reminders for an event.");

    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}
