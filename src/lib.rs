//! RemindBuddy Telegram Bot
//!
//! A conversational reminder bot: users register a display name, create
//! timed events through a multi-step dialogue, and receive staged
//! notifications before each event.

pub mod config;
pub mod database;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{RemindBuddyError, Result};

pub use database::DatabaseService;
pub use services::{NotificationService, ReminderDispatcher};
pub use state::{ScenarioManager, StateStorage};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
