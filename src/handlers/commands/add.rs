//! Add command handler
//!
//! Handles the /add command and the event creation flow: event name, date,
//! time, then a closed choice of reminder combinations.

use chrono::{DateTime, NaiveDate, Utc};
use teloxide::{
    prelude::*,
    types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, Message, MessageId, ParseMode},
    Bot,
};
use tracing::{debug, error, info};

use crate::database::DatabaseService;
use crate::handlers::callbacks::edit_or_send;
use crate::models::{CreateEventRequest, ReminderChoice};
use crate::state::{ScenarioManager, StateStorage, EVENT_CREATION};
use crate::utils::errors::{RemindBuddyError, Result};
use crate::utils::helpers;

/// Handle /add - entry point for event creation. Requires registration.
pub async fn handle_add(
    bot: Bot,
    msg: Message,
    db: DatabaseService,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
) -> Result<()> {
    let chat_id = msg.chat.id;

    debug!(chat_id = chat_id.0, "Processing /add command");

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

    // Entering the flow again restarts it; any previous draft is discarded
    let mut context = crate::state::ConversationContext::new(chat_id.0);
    scenario_manager.start_scenario(&mut context, EVENT_CREATION)?;
    state_storage.save_context(&context).await;

    let text = format!(
        "Hi {}! 📝\n\nPlease send the name of the event you want to add:",
        helpers::escape_html(&user.name)
    );
    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}

/// Handle the event name step
pub async fn handle_event_name_input(
    bot: Bot,
    msg: Message,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
) -> Result<()> {
    let chat_id = msg.chat.id;
    let name = msg.text().unwrap_or("").trim();

    let mut context = match state_storage.load_context(chat_id.0).await {
        Some(ctx) if ctx.is_at(EVENT_CREATION, "event_name") => ctx,
        _ => return Ok(()),
    };

    if let Err(e) = scenario_manager.validate_input(&context, name) {
        bot.send_message(chat_id, validation_message(e)).await?;
        return Ok(());
    }

    context.set_data("event_name", name)?;
    scenario_manager.next_step(&mut context, "event_date")?;
    state_storage.save_context(&context).await;

    bot.send_message(
        chat_id,
        "📅 Please send the event date (format: DD-MM-YYYY):\nExample: 25-12-2024",
    )
    .await?;

    Ok(())
}

/// Handle the event date step.
///
/// The date must parse as DD-MM-YYYY and be today or later; anything else
/// re-prompts without advancing the flow.
pub async fn handle_event_date_input(
    bot: Bot,
    msg: Message,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
) -> Result<()> {
    let chat_id = msg.chat.id;
    let input = msg.text().unwrap_or("").trim();

    let mut context = match state_storage.load_context(chat_id.0).await {
        Some(ctx) if ctx.is_at(EVENT_CREATION, "event_date") => ctx,
        _ => return Ok(()),
    };

    if let Err(e) = scenario_manager.validate_input(&context, input) {
        bot.send_message(chat_id, validation_message(e)).await?;
        return Ok(());
    }

    let date = helpers::parse_event_date(input)
        .ok_or_else(|| RemindBuddyError::InvalidInput("Unparseable date after validation".to_string()))?;

    if date < Utc::now().date_naive() {
        bot.send_message(
            chat_id,
            "📅 The event date must be today or in the future. Please send a valid date.\nFormat: DD-MM-YYYY (example: 25-12-2024)",
        )
        .await?;
        return Ok(());
    }

    context.set_data("event_date", date)?;
    scenario_manager.next_step(&mut context, "event_time")?;
    state_storage.save_context(&context).await;

    bot.send_message(
        chat_id,
        "⏰ Please send the event time (format: HH:MM):\nExample: 14:30 or 09:15",
    )
    .await?;

    Ok(())
}

/// Handle the event time step.
///
/// Combined with the stored date, the resulting timestamp must be strictly
/// in the future.
pub async fn handle_event_time_input(
    bot: Bot,
    msg: Message,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
) -> Result<()> {
    let chat_id = msg.chat.id;
    let input = msg.text().unwrap_or("").trim();

    let mut context = match state_storage.load_context(chat_id.0).await {
        Some(ctx) if ctx.is_at(EVENT_CREATION, "event_time") => ctx,
        _ => return Ok(()),
    };

    if let Err(e) = scenario_manager.validate_input(&context, input) {
        bot.send_message(chat_id, validation_message(e)).await?;
        return Ok(());
    }

    let time = helpers::parse_event_time(input)
        .ok_or_else(|| RemindBuddyError::InvalidInput("Unparseable time after validation".to_string()))?;

    let date: NaiveDate = context
        .get_data("event_date")?
        .ok_or_else(|| RemindBuddyError::InvalidInput("Missing event date in draft".to_string()))?;

    let due_at = helpers::combine_date_time(date, time);

    if due_at <= Utc::now() {
        bot.send_message(
            chat_id,
            "⏰ The event time must be in the future. Please send a valid time.\nFormat: HH:MM (example: 14:30)",
        )
        .await?;
        return Ok(());
    }

    context.set_data("event_datetime", due_at)?;
    scenario_manager.next_step(&mut context, "reminder_choice")?;
    state_storage.save_context(&context).await;

    let event_name = context.get_string("event_name").unwrap_or_default();
    let summary = format!(
        "📋 <b>Event summary:</b>\n\
         📅 Event: {}\n\
         📆 Date: {}\n\
         ⏰ Time: {}\n\n\
         🔔 Pick the reminders you want:",
        helpers::escape_html(&event_name),
        helpers::format_due_date(due_at),
        helpers::format_due_time(due_at),
    );

    bot.send_message(chat_id, summary)
        .parse_mode(ParseMode::Html)
        .reply_markup(reminder_keyboard())
        .await?;

    Ok(())
}

/// Handle the reminder selection callback and persist the event
pub async fn handle_reminder_choice(
    bot: Bot,
    chat_id: ChatId,
    message_id: Option<MessageId>,
    choice: ReminderChoice,
    db: DatabaseService,
    state_storage: StateStorage,
) -> Result<()> {
    debug!(chat_id = chat_id.0, choice = ?choice, "User selected reminder combination");

    let context = match state_storage.load_context(chat_id.0).await {
        Some(ctx) if ctx.is_at(EVENT_CREATION, "reminder_choice") => ctx,
        _ => return Ok(()),
    };

    let event_name = context
        .get_string("event_name")
        .ok_or_else(|| RemindBuddyError::InvalidInput("Missing event name in draft".to_string()))?;
    let due_at: DateTime<Utc> = context
        .get_data("event_datetime")?
        .ok_or_else(|| RemindBuddyError::InvalidInput("Missing event datetime in draft".to_string()))?;

    let (remind_12h, remind_4h, remind_1h) = choice.flags();
    let request = CreateEventRequest {
        name: event_name.clone(),
        due_at,
        chat_id: chat_id.0,
        remind_12h,
        remind_4h,
        remind_1h,
    };

    match db.events.create(request).await {
        Ok(event) => {
            state_storage.delete_context(chat_id.0).await;

            let text = format!(
                "✅ <b>Event saved!</b>\n\n\
                 📅 Event: {}\n\
                 📆 Date: {}\n\
                 ⏰ Time: {}\n\
                 🔔 Reminders: {}\n\n\
                 Use /list to see all your events.",
                helpers::escape_html(&event.name),
                helpers::format_due_date(event.due_at),
                helpers::format_due_time(event.due_at),
                event.reminder_summary(),
            );
            edit_or_send(&bot, chat_id, message_id, text).await?;

            info!(chat_id = chat_id.0, event_id = event.id, event_name = %event.name, "Event created");
        }
        Err(e) => {
            error!(chat_id = chat_id.0, error = %e, "Failed to save event");
            state_storage.delete_context(chat_id.0).await;
            edit_or_send(
                &bot,
                chat_id,
                message_id,
                "❌ Failed to save the event. Please try again.".to_string(),
            )
            .await?;
        }
    }

    Ok(())
}

/// Keyboard offering every combination of the three reminder flags
fn reminder_keyboard() -> InlineKeyboardMarkup {
    let buttons: Vec<InlineKeyboardButton> = ReminderChoice::ALL_CHOICES
        .iter()
        .map(|choice| {
            InlineKeyboardButton::callback(choice.label(), format!("remind:{}", choice.callback_code()))
        })
        .collect();

    let rows: Vec<Vec<InlineKeyboardButton>> = buttons.chunks(2).map(|pair| pair.to_vec()).collect();
    InlineKeyboardMarkup::new(rows)
}

fn validation_message(error: RemindBuddyError) -> String {
    match error {
        RemindBuddyError::InvalidInput(message) => message,
        _ => "That input is not valid. Please try again:".to_string(),
    }
}
