//! Help command handler

use teloxide::{prelude::*, types::Message, types::ParseMode, Bot};

use crate::database::DatabaseService;
use crate::services::notification::greeting;
use crate::utils::errors::Result;

/// Handle /help - static capability summary, personalized when the caller
/// has a stored name.
pub async fn handle_help(bot: Bot, msg: Message, db: DatabaseService) -> Result<()> {
    let chat_id = msg.chat.id;
    let user_name = db.display_name(chat_id.0).await;

    let help_text = format!(
        "{}📚 <b>RemindBuddy Help</b>\n\n\
         🤖 <b>Available commands:</b>\n\
         • /start - Start the bot and register your name\n\
         • /add - Add a new event\n\
         • /list - Show your active events\n\
         • /stop - Stop reminders for an event\n\
         • /cancel - Cancel the current operation\n\
         • /help - Show this help\n\n\
         ⏰ <b>Reminder options:</b>\n\
         • 12h before - reminder 12 hours before the event\n\
         • 4h before - reminder 4 hours before the event\n\
         • 1h before - reminder 1 hour before the event\n\n\
         📝 <b>Input formats:</b>\n\
         • Date: DD-MM-YYYY (example: 25-12-2024)\n\
         • Time: HH:MM (example: 14:30)\n\n\
         ❓ <b>Tips:</b>\n\
         • Any combination of reminders can be selected\n\
         • Past events disappear from /list automatically\n\
         • Use /stop to disable reminders for an event\n\
         • Notifications are sent at the times you picked",
        greeting(user_name.as_deref()),
    );

    bot.send_message(chat_id, help_text)
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}
