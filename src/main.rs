//! RemindBuddy Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use std::time::Duration;

use teloxide::dispatching::UpdateHandler;
use teloxide::utils::command::BotCommands as TeloxideBotCommands;
use teloxide::{prelude::*, types::Update};
use tracing::{error, info, warn};

use remindbuddy::{
    config::Settings,
    database::{connection::create_pool, connection::run_migrations, DatabaseService},
    handlers::{
        callbacks::handle_callback_query,
        commands::{add, cancel, help, list, start, stop},
        messages::handle_message,
    },
    services::{NotificationService, ReminderDispatcher},
    state::{ScenarioManager, StateStorage},
    utils::logging,
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Sweep period for abandoned conversation drafts
const DRAFT_CLEANUP_PERIOD: Duration = Duration::from_secs(600);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration; missing credentials abort startup here
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard must outlive the dispatcher
    let _logging_guard = logging::init_logging(&settings.logging)?;

    info!("Starting RemindBuddy Telegram Bot...");

    info!("Connecting to database...");
    let db_pool = create_pool(&settings.database).await?;

    run_migrations(&db_pool).await?;

    let db = DatabaseService::new(db_pool);

    let bot = Bot::new(&settings.bot.token);

    let notifier = NotificationService::new(bot.clone());
    let state_storage = StateStorage::new(&settings.state);
    let scenario_manager = ScenarioManager::new();

    // The dispatcher is consumed by spawn; startup owns the only instance,
    // so a second loop cannot exist in this process
    let _reminder_loop = ReminderDispatcher::new(
        db.clone(),
        notifier,
        Duration::from_secs(settings.reminder.interval_secs),
    )
    .spawn();

    let _draft_cleanup = state_storage.spawn_cleanup(DRAFT_CLEANUP_PERIOD);

    info!("Setting up bot handlers...");

    let db_arc = Arc::new(db);
    let scenario_manager_arc = Arc::new(scenario_manager);
    let state_storage_arc = Arc::new(state_storage);

    let handler = create_handler();

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![db_arc, scenario_manager_arc, state_storage_arc])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("RemindBuddy is ready, starting polling...");

    dispatcher.dispatch().await;

    info!("RemindBuddy has been shut down.");

    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use teloxide::dispatching::UpdateFilterExt;

    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    dptree::entry()
                        .filter_command::<BotCommands>()
                        .endpoint(handle_commands),
                )
                .branch(dptree::endpoint(handle_messages)),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callbacks))
}

#[derive(TeloxideBotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "RemindBuddy Commands")]
enum BotCommands {
    #[command(description = "Start the bot and register your name")]
    Start,
    #[command(description = "Add a new event")]
    Add,
    #[command(description = "Show your active events")]
    List,
    #[command(description = "Stop reminders for an event")]
    Stop,
    #[command(description = "Cancel the current operation")]
    Cancel,
    #[command(description = "Show help information")]
    Help,
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: BotCommands,
    db: Arc<DatabaseService>,
    scenario_manager: Arc<ScenarioManager>,
    state_storage: Arc<StateStorage>,
) -> HandlerResult {
    let db = (*db).clone();
    let scenario_manager = (*scenario_manager).clone();
    let state_storage = (*state_storage).clone();
    let chat_id = msg.chat.id;

    let result = match cmd {
        BotCommands::Start => {
            start::handle_start(bot.clone(), msg, db, scenario_manager, state_storage).await
        }
        BotCommands::Add => {
            add::handle_add(bot.clone(), msg, db, scenario_manager, state_storage).await
        }
        BotCommands::List => list::handle_list(bot.clone(), msg, db).await,
        BotCommands::Stop => stop::handle_stop(bot.clone(), msg, db).await,
        BotCommands::Cancel => cancel::handle_cancel(bot.clone(), msg, state_storage).await,
        BotCommands::Help => help::handle_help(bot.clone(), msg, db).await,
    };

    if let Err(e) = result {
        error!(error = %e, chat_id = chat_id.0, "Error handling command");
        let _ = bot
            .send_message(chat_id, "Sorry, something went wrong. Please try again.")
            .await;
    }

    Ok(())
}

/// Handle regular messages
async fn handle_messages(
    bot: Bot,
    msg: Message,
    db: Arc<DatabaseService>,
    scenario_manager: Arc<ScenarioManager>,
    state_storage: Arc<StateStorage>,
) -> HandlerResult {
    let db = (*db).clone();
    let scenario_manager = (*scenario_manager).clone();
    let state_storage = (*state_storage).clone();
    let chat_id = msg.chat.id;

    if let Err(e) = handle_message(bot.clone(), msg, db, scenario_manager, state_storage).await {
        error!(error = %e, chat_id = chat_id.0, "Error handling message");
        let _ = bot
            .send_message(chat_id, "Sorry, something went wrong. Please try again.")
            .await;
    }

    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(
    bot: Bot,
    query: teloxide::types::CallbackQuery,
    db: Arc<DatabaseService>,
    state_storage: Arc<StateStorage>,
) -> HandlerResult {
    let db = (*db).clone();
    let state_storage = (*state_storage).clone();
    let reply_chat = query.message.as_ref().map(|m| m.chat().id);

    if let Err(e) = handle_callback_query(bot.clone(), query, db, state_storage).await {
        error!(error = %e, "Error handling callback query");
        if let Some(chat_id) = reply_chat {
            let _ = bot
                .send_message(chat_id, "Sorry, something went wrong. Please try again.")
                .await;
        }
    }

    Ok(())
}
