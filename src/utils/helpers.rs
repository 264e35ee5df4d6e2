//! Helper functions and utilities
//!
//! Date/time parsing for conversation input and display formatting for
//! outbound messages.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Input format for event dates (day-month-year)
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Input format for event times (hour:minute)
pub const TIME_FORMAT: &str = "%H:%M";

/// Parse an event date in strict DD-MM-YYYY form
pub fn parse_event_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).ok()
}

/// Parse an event time in strict HH:MM form
pub fn parse_event_time(input: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(input.trim(), TIME_FORMAT).ok()
}

/// Combine a parsed date and time into the stored UTC timestamp
pub fn combine_date_time(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    date.and_time(time).and_utc()
}

/// Format a due timestamp's date part for display
pub fn format_due_date(due_at: DateTime<Utc>) -> String {
    due_at.format(DATE_FORMAT).to_string()
}

/// Format a due timestamp's time part for display
pub fn format_due_time(due_at: DateTime<Utc>) -> String {
    due_at.format(TIME_FORMAT).to_string()
}

/// Short date+time label used on selection buttons
pub fn format_button_label(due_at: DateTime<Utc>) -> String {
    due_at.format("%d/%m %H:%M").to_string()
}

/// Escape user-provided text for HTML-mode messages
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
