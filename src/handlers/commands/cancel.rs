//! Cancel command handler

use teloxide::{prelude::*, types::Message, Bot};
use tracing::debug;

use crate::state::StateStorage;
use crate::utils::errors::Result;

/// Handle /cancel - end the active flow without persisting anything.
/// Harmless outside a flow.
pub async fn handle_cancel(bot: Bot, msg: Message, state_storage: StateStorage) -> Result<()> {
    let chat_id = msg.chat.id;

    debug!(chat_id = chat_id.0, "Processing /cancel command");

    state_storage.delete_context(chat_id.0).await;
    bot.send_message(chat_id, "❌ Operation cancelled.").await?;

    Ok(())
}
