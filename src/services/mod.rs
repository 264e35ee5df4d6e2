//! Services module

pub mod notification;
pub mod reminder;

pub use notification::NotificationService;
pub use reminder::ReminderDispatcher;
