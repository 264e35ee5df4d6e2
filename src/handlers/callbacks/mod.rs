//! Callback query handlers module
//!
//! Routes inline keyboard button presses. Callback data uses the
//! `action:arg` convention.

use teloxide::{
    prelude::*,
    types::{CallbackQuery, ChatId, MessageId, ParseMode},
    Bot,
};
use tracing::{debug, warn};

use crate::database::DatabaseService;
use crate::handlers::commands::{add, stop};
use crate::models::ReminderChoice;
use crate::state::StateStorage;
use crate::utils::errors::Result;

/// Main callback query dispatcher
pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    db: DatabaseService,
    state_storage: StateStorage,
) -> Result<()> {
    let fallback_chat = ChatId(query.from.id.0 as i64);
    let (chat_id, message_id) = match query.message.as_ref() {
        Some(message) => (message.chat().id, Some(message.id())),
        None => (fallback_chat, None),
    };

    let Some(data) = query.data.clone() else {
        return Ok(());
    };

    debug!(chat_id = chat_id.0, callback_data = %data, "Processing callback query");

    // Answer first to clear the button's loading state
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, callback_id = %query.id, "Failed to answer callback query");
    }

    let (action, arg) = match data.split_once(':') {
        Some((action, arg)) => (action, arg),
        None => {
            warn!(data = %data, "Invalid callback data format");
            return Ok(());
        }
    };

    match action {
        "remind" => match ReminderChoice::from_callback_code(arg) {
            Some(choice) => {
                add::handle_reminder_choice(bot, chat_id, message_id, choice, db, state_storage)
                    .await?;
            }
            None => {
                warn!(arg = %arg, "Unknown reminder choice");
            }
        },
        "stop" => {
            stop::handle_stop_callback(bot, chat_id, message_id, arg, db).await?;
        }
        _ => {
            warn!(action = %action, "Unknown callback action");
        }
    }

    Ok(())
}

/// Edit the originating message when it is still reachable, otherwise send
/// a fresh one.
pub(crate) async fn edit_or_send(
    bot: &Bot,
    chat_id: ChatId,
    message_id: Option<MessageId>,
    text: String,
) -> Result<()> {
    match message_id {
        Some(id) => {
            bot.edit_message_text(chat_id, id, text)
                .parse_mode(ParseMode::Html)
                .await?;
        }
        None => {
            bot.send_message(chat_id, text)
                .parse_mode(ParseMode::Html)
                .await?;
        }
    }

    Ok(())
}
