//! Start command handler
//!
//! Handles the /start command and the registration flow.

use teloxide::{prelude::*, types::Message, Bot};
use tracing::{debug, error, info};

use crate::database::DatabaseService;
use crate::state::{ScenarioManager, StateStorage, REGISTRATION};
use crate::utils::errors::{RemindBuddyError, Result};
use crate::utils::helpers;

use super::MENU;

/// Handle /start - entry point for registration.
///
/// Already-registered chats short-circuit to a welcome-back message; no
/// scenario is entered and any lingering draft is cleared.
pub async fn handle_start(
    bot: Bot,
    msg: Message,
    db: DatabaseService,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
) -> Result<()> {
    let chat_id = msg.chat.id;

    debug!(chat_id = chat_id.0, "Processing /start command");

    match db.users.find_by_chat_id(chat_id.0).await? {
        Some(user) => {
            state_storage.delete_context(chat_id.0).await;

            let text = format!(
                "Hi {}! Welcome back! 👋\n\n{}\n\nWhat would you like to do today?",
                helpers::escape_html(&user.name),
                MENU
            );
            bot.send_message(chat_id, text)
                .parse_mode(teloxide::types::ParseMode::Html)
                .await?;

            info!(chat_id = chat_id.0, "Existing user started bot");
        }
        None => {
            info!(chat_id = chat_id.0, "New user starting registration");

            let mut context = crate::state::ConversationContext::new(chat_id.0);
            scenario_manager.start_scenario(&mut context, REGISTRATION)?;
            state_storage.save_context(&context).await;

            let first_name = msg
                .from
                .as_ref()
                .map(|u| u.first_name.clone())
                .unwrap_or_else(|| "there".to_string());

            let text = format!(
                "Hi {}! 👋\n\nWelcome to RemindBuddy! 🤖\n\nTo get started, please send me your name:",
                helpers::escape_html(&first_name)
            );
            bot.send_message(chat_id, text)
                .parse_mode(teloxide::types::ParseMode::Html)
                .await?;
        }
    }

    Ok(())
}

/// Handle the name input step of registration
pub async fn handle_name_input(
    bot: Bot,
    msg: Message,
    db: DatabaseService,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
) -> Result<()> {
    let chat_id = msg.chat.id;
    let name = msg.text().unwrap_or("").trim();

    debug!(chat_id = chat_id.0, name = %name, "User provided name");

    let context = match state_storage.load_context(chat_id.0).await {
        Some(ctx) if ctx.is_at(REGISTRATION, "name_input") => ctx,
        _ => return Ok(()),
    };

    // Rejected input is discarded; the step re-prompts and state is unchanged
    if let Err(e) = scenario_manager.validate_input(&context, name) {
        let text = match e {
            RemindBuddyError::InvalidInput(message) => message,
            _ => "That name is not valid. Please try again:".to_string(),
        };
        bot.send_message(chat_id, text).await?;
        return Ok(());
    }

    match db.users.upsert(chat_id.0, name).await {
        Ok(user) => {
            state_storage.delete_context(chat_id.0).await;

            let text = format!(
                "Thanks {}! 😊\n\nYou are registered and ready to use the bot.\n\n{}\n\nSend /add to create your first event!",
                helpers::escape_html(&user.name),
                MENU
            );
            bot.send_message(chat_id, text)
                .parse_mode(teloxide::types::ParseMode::Html)
                .await?;

            info!(chat_id = chat_id.0, "User registration completed");
        }
        Err(e) => {
            error!(chat_id = chat_id.0, error = %e, "Failed to save user name");
            state_storage.delete_context(chat_id.0).await;
            bot.send_message(chat_id, "Failed to save your name. Please try again later.")
                .await?;
        }
    }

    Ok(())
}
