//! Data models

pub mod event;
pub mod user;

pub use event::{CreateEventRequest, Event, ReminderChoice, ReminderThreshold};
pub use user::User;
