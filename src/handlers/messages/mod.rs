//! Message handlers module
//!
//! Routes free-text messages to the active conversation step, if any.

use teloxide::{prelude::*, types::Message, Bot};
use tracing::{debug, warn};

use crate::database::DatabaseService;
use crate::handlers::commands::{add, start};
use crate::state::{ConversationContext, ScenarioManager, StateStorage, EVENT_CREATION, REGISTRATION};
use crate::utils::errors::Result;

/// Handle incoming text messages
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    db: DatabaseService,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
) -> Result<()> {
    let chat_id = msg.chat.id;

    if msg.text().is_none() {
        return Ok(());
    }

    debug!(chat_id = chat_id.0, "Processing message");

    if let Some(context) = state_storage.load_context(chat_id.0).await {
        return handle_conversation_message(bot, msg, context, db, scenario_manager, state_storage)
            .await;
    }

    // No active flow: point private chats at the command surface
    if chat_id.is_user() {
        bot.send_message(chat_id, "Use /help to see what I can do.")
            .await?;
    }

    Ok(())
}

/// Route a message to the handler for the chat's current scenario step
async fn handle_conversation_message(
    bot: Bot,
    msg: Message,
    context: ConversationContext,
    db: DatabaseService,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
) -> Result<()> {
    let scenario = context.scenario.as_deref().unwrap_or("");
    let step = context.step.as_deref().unwrap_or("");

    debug!(scenario = scenario, step = step, "Handling conversation message");

    match (scenario, step) {
        (REGISTRATION, "name_input") => {
            start::handle_name_input(bot, msg, db, scenario_manager, state_storage).await
        }
        (EVENT_CREATION, "event_name") => {
            add::handle_event_name_input(bot, msg, scenario_manager, state_storage).await
        }
        (EVENT_CREATION, "event_date") => {
            add::handle_event_date_input(bot, msg, scenario_manager, state_storage).await
        }
        (EVENT_CREATION, "event_time") => {
            add::handle_event_time_input(bot, msg, scenario_manager, state_storage).await
        }
        (EVENT_CREATION, "reminder_choice") => {
            // Closed choice; free text is not accepted here
            bot.send_message(
                msg.chat.id,
                "Please pick one of the reminder options using the buttons.",
            )
            .await?;
            Ok(())
        }
        _ => {
            warn!(scenario = scenario, step = step, "Unknown conversation state");
            state_storage.delete_context(msg.chat.id.0).await;
            Ok(())
        }
    }
}
