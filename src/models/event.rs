//! Event model and reminder selection types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub due_at: DateTime<Utc>,
    pub chat_id: i64,
    pub remind_12h: bool,
    pub remind_4h: bool,
    pub remind_1h: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Human-readable summary of the enabled reminder flags
    pub fn reminder_summary(&self) -> String {
        let mut parts = Vec::new();
        if self.remind_12h {
            parts.push("12h before");
        }
        if self.remind_4h {
            parts.push("4h before");
        }
        if self.remind_1h {
            parts.push("1h before");
        }
        if parts.is_empty() {
            "None".to_string()
        } else {
            parts.join(", ")
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    pub due_at: DateTime<Utc>,
    pub chat_id: i64,
    pub remind_12h: bool,
    pub remind_4h: bool,
    pub remind_1h: bool,
}

/// One of the fixed reminder combinations offered when a flow completes.
///
/// Every combination of the three flags is a distinct choice, so the
/// selection keyboard is closed over exactly eight options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReminderChoice {
    TwelveHours,
    FourHours,
    OneHour,
    TwelveAndFour,
    TwelveAndOne,
    FourAndOne,
    All,
    None,
}

impl ReminderChoice {
    pub const ALL_CHOICES: [ReminderChoice; 8] = [
        ReminderChoice::TwelveHours,
        ReminderChoice::FourHours,
        ReminderChoice::OneHour,
        ReminderChoice::TwelveAndFour,
        ReminderChoice::TwelveAndOne,
        ReminderChoice::FourAndOne,
        ReminderChoice::All,
        ReminderChoice::None,
    ];

    /// Stable code used in callback data
    pub fn callback_code(&self) -> &'static str {
        match self {
            ReminderChoice::TwelveHours => "h12",
            ReminderChoice::FourHours => "h4",
            ReminderChoice::OneHour => "h1",
            ReminderChoice::TwelveAndFour => "h12_h4",
            ReminderChoice::TwelveAndOne => "h12_h1",
            ReminderChoice::FourAndOne => "h4_h1",
            ReminderChoice::All => "all",
            ReminderChoice::None => "none",
        }
    }

    pub fn from_callback_code(code: &str) -> Option<Self> {
        Self::ALL_CHOICES
            .into_iter()
            .find(|choice| choice.callback_code() == code)
    }

    /// Button label shown on the selection keyboard
    pub fn label(&self) -> &'static str {
        match self {
            ReminderChoice::TwelveHours => "12h before",
            ReminderChoice::FourHours => "4h before",
            ReminderChoice::OneHour => "1h before",
            ReminderChoice::TwelveAndFour => "12h & 4h",
            ReminderChoice::TwelveAndOne => "12h & 1h",
            ReminderChoice::FourAndOne => "4h & 1h",
            ReminderChoice::All => "All (12h, 4h, 1h)",
            ReminderChoice::None => "No reminders",
        }
    }

    /// The flag triple persisted for this choice: (12h, 4h, 1h)
    pub fn flags(&self) -> (bool, bool, bool) {
        match self {
            ReminderChoice::TwelveHours => (true, false, false),
            ReminderChoice::FourHours => (false, true, false),
            ReminderChoice::OneHour => (false, false, true),
            ReminderChoice::TwelveAndFour => (true, true, false),
            ReminderChoice::TwelveAndOne => (true, false, true),
            ReminderChoice::FourAndOne => (false, true, true),
            ReminderChoice::All => (true, true, true),
            ReminderChoice::None => (false, false, false),
        }
    }
}

/// A reminder threshold and the inclusive scan window around it.
///
/// The dispatcher polls every 30 minutes, so each window extends at least
/// 30 minutes past the nominal offset on both sides; an event is seen by
/// at least one cycle even with loop jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderThreshold {
    TwelveHours,
    FourHours,
    OneHour,
}

impl ReminderThreshold {
    pub const ALL: [ReminderThreshold; 3] = [
        ReminderThreshold::TwelveHours,
        ReminderThreshold::FourHours,
        ReminderThreshold::OneHour,
    ];

    /// Inclusive [from, to] window of due timestamps scanned for this threshold
    pub fn window(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        match self {
            ReminderThreshold::TwelveHours => (now + Duration::hours(11), now + Duration::hours(13)),
            ReminderThreshold::FourHours => (now + Duration::hours(3), now + Duration::hours(5)),
            ReminderThreshold::OneHour => (now + Duration::minutes(45), now + Duration::minutes(75)),
        }
    }

    /// Heading line used in the reminder notification
    pub fn heading(&self) -> &'static str {
        match self {
            ReminderThreshold::TwelveHours => "⏰ <b>12 hours to go!</b>",
            ReminderThreshold::FourHours => "🔔 <b>4 hours to go!</b>",
            ReminderThreshold::OneHour => "🚨 <b>1 hour to go!</b>",
        }
    }

    /// Closing line used in the reminder notification
    pub fn footer(&self) -> &'static str {
        match self {
            ReminderThreshold::TwelveHours => "Don't forget to prepare! 🚀",
            ReminderThreshold::FourHours => "The event is coming up soon! ⏰",
            ReminderThreshold::OneHour => "Starting in one hour — get ready! 🔥",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_choices_map_to_distinct_flag_triples() {
        let triples: HashSet<_> = ReminderChoice::ALL_CHOICES
            .iter()
            .map(|c| c.flags())
            .collect();
        assert_eq!(triples.len(), 8);
    }

    #[test]
    fn test_choice_callback_roundtrip() {
        for choice in ReminderChoice::ALL_CHOICES {
            assert_eq!(
                ReminderChoice::from_callback_code(choice.callback_code()),
                Some(choice)
            );
        }
        assert_eq!(ReminderChoice::from_callback_code("h24"), None);
    }

    #[test]
    fn test_choice_flags() {
        assert_eq!(ReminderChoice::All.flags(), (true, true, true));
        assert_eq!(ReminderChoice::None.flags(), (false, false, false));
        assert_eq!(ReminderChoice::TwelveAndOne.flags(), (true, false, true));
        assert_eq!(ReminderChoice::FourAndOne.flags(), (false, true, true));
    }

    #[test]
    fn test_twelve_hour_window_bounds() {
        let now = Utc::now();
        let (from, to) = ReminderThreshold::TwelveHours.window(now);

        let exactly_12h = now + Duration::hours(12);
        assert!(exactly_12h >= from && exactly_12h <= to);

        let too_soon = now + Duration::hours(10) + Duration::minutes(59);
        assert!(too_soon < from);

        let too_late = now + Duration::hours(13) + Duration::minutes(1);
        assert!(too_late > to);
    }

    #[test]
    fn test_four_hour_window_bounds() {
        let now = Utc::now();
        let (from, to) = ReminderThreshold::FourHours.window(now);

        assert!(now + Duration::hours(4) >= from);
        assert!(now + Duration::hours(4) <= to);
        assert!(now + Duration::hours(3) >= from);
        assert!(now + Duration::hours(5) <= to);
        assert!(now + Duration::hours(2) + Duration::minutes(59) < from);
        assert!(now + Duration::hours(5) + Duration::minutes(1) > to);
    }

    #[test]
    fn test_one_hour_window_bounds() {
        let now = Utc::now();
        let (from, to) = ReminderThreshold::OneHour.window(now);

        assert!(now + Duration::minutes(60) >= from);
        assert!(now + Duration::minutes(60) <= to);
        assert!(now + Duration::minutes(44) < from);
        assert!(now + Duration::minutes(76) > to);
    }

    #[test]
    fn test_reminder_summary() {
        let mut event = Event {
            id: 1,
            name: "Ujian".to_string(),
            due_at: Utc::now(),
            chat_id: 555,
            remind_12h: true,
            remind_4h: true,
            remind_1h: true,
            is_active: true,
            created_at: Utc::now(),
        };
        assert_eq!(event.reminder_summary(), "12h before, 4h before, 1h before");

        event.remind_12h = false;
        event.remind_1h = false;
        assert_eq!(event.reminder_summary(), "4h before");

        event.remind_4h = false;
        assert_eq!(event.reminder_summary(), "None");
    }
}
