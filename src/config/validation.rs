//! Configuration validation module
//!
//! Validation runs once at startup; any failure here aborts the process
//! before the bot or the dispatcher are started.

use super::Settings;
use crate::utils::errors::{RemindBuddyError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_database_config(&settings.database)?;
    validate_state_config(&settings.state)?;
    validate_reminder_config(&settings.reminder)?;
    validate_logging_config(&settings.logging)?;
    Ok(())
}

fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(RemindBuddyError::Config("Bot token is required".to_string()));
    }
    Ok(())
}

fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(RemindBuddyError::Config(
            "Database host is required".to_string(),
        ));
    }
    if config.user.is_empty() {
        return Err(RemindBuddyError::Config(
            "Database user is required".to_string(),
        ));
    }
    if config.name.is_empty() {
        return Err(RemindBuddyError::Config(
            "Database name is required".to_string(),
        ));
    }
    if config.max_connections == 0 {
        return Err(RemindBuddyError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }
    if config.min_connections > config.max_connections {
        return Err(RemindBuddyError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }
    Ok(())
}

fn validate_state_config(config: &super::StateConfig) -> Result<()> {
    if config.draft_ttl_minutes <= 0 {
        return Err(RemindBuddyError::Config(
            "Draft TTL must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

fn validate_reminder_config(config: &super::ReminderConfig) -> Result<()> {
    if config.interval_secs == 0 {
        return Err(RemindBuddyError::Config(
            "Reminder interval must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(RemindBuddyError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(RemindBuddyError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.bot.token = "123456:TEST".to_string();
        settings
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn test_missing_token_fails() {
        let mut settings = valid_settings();
        settings.bot.token = String::new();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_missing_database_host_fails() {
        let mut settings = valid_settings();
        settings.database.host = String::new();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_connection_bounds() {
        let mut settings = valid_settings();
        settings.database.min_connections = 20;
        settings.database.max_connections = 10;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_invalid_log_level_fails() {
        let mut settings = valid_settings();
        settings.logging.level = "verbose".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_zero_reminder_interval_fails() {
        let mut settings = valid_settings();
        settings.reminder.interval_secs = 0;
        assert!(validate_settings(&settings).is_err());
    }
}
