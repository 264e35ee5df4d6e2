//! Stop command handler
//!
//! Presents the caller's active events as a closed selection and
//! soft-deactivates the chosen one. Rows are never deleted.

use chrono::Utc;
use teloxide::{
    prelude::*,
    types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, Message, MessageId, ParseMode},
    Bot,
};
use tracing::{debug, info, warn};

use crate::database::DatabaseService;
use crate::handlers::callbacks::edit_or_send;
use crate::utils::errors::Result;
use crate::utils::helpers;

/// Handle /stop - offer active, future events as selectable options
pub async fn handle_stop(bot: Bot, msg: Message, db: DatabaseService) -> Result<()> {
    let chat_id = msg.chat.id;

    debug!(chat_id = chat_id.0, "Processing /stop command");

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
            "Hi {}! 🔴\n\nThere are no active events to stop.",
            helpers::escape_html(&user.name)
        );
        bot.send_message(chat_id, text).await?;
        return Ok(());
    }

    let mut rows: Vec<Vec<InlineKeyboardButton>> = events
        .iter()
        .map(|event| {
            let label = format!("{} - {}", event.name, helpers::format_button_label(event.due_at));
            vec![InlineKeyboardButton::callback(label, format!("stop:{}", event.id))]
        })
        .collect();
    rows.push(vec![InlineKeyboardButton::callback("❌ Cancel", "stop:cancel")]);

    bot.send_message(
        chat_id,
        "🔴 <b>Stop event reminders</b>\n\nPick the event whose reminders you want to stop:",
    )
    .parse_mode(ParseMode::Html)
    .reply_markup(InlineKeyboardMarkup::new(rows))
    .await?;

    Ok(())
}

/// Handle a selection from the /stop keyboard
pub async fn handle_stop_callback(
    bot: Bot,
    chat_id: ChatId,
    message_id: Option<MessageId>,
    selection: &str,
    db: DatabaseService,
) -> Result<()> {
    if selection == "cancel" {
        edit_or_send(&bot, chat_id, message_id, "❌ Operation cancelled.".to_string()).await?;
        return Ok(());
    }

    let event_id: i64 = match selection.parse() {
        Ok(id) => id,
        Err(_) => {
            warn!(chat_id = chat_id.0, selection = %selection, "Invalid stop selection");
            return Ok(());
        }
    };

    // Ownership is enforced by scoping both the lookup and the update to
    // the caller's chat id
    let event = match db.events.find_owned(event_id, chat_id.0).await? {
        Some(event) => event,
        None => {
            edit_or_send(&bot, chat_id, message_id, "❌ Event not found.".to_string()).await?;
            return Ok(());
        }
    };

    if !db.events.deactivate(event_id, chat_id.0).await? {
        edit_or_send(&bot, chat_id, message_id, "❌ Event not found.".to_string()).await?;
        return Ok(());
    }

    let text = format!(
        "✅ <b>Reminders stopped!</b>\n\n\
         📅 Event: {}\n\
         📆 When: {} {}\n\n\
         Reminders for this event have been disabled.",
        helpers::escape_html(&event.name),
        helpers::format_due_date(event.due_at),
        helpers::format_due_time(event.due_at),
    );
    edit_or_send(&bot, chat_id, message_id, text).await?;

    info!(chat_id = chat_id.0, event_id = event_id, "Event deactivated");

    Ok(())
}
