//! Event repository implementation

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::event::{CreateEventRequest, Event, ReminderThreshold};
use crate::utils::errors::RemindBuddyError;

const EVENT_COLUMNS: &str =
    "id, name, due_at, chat_id, remind_12h, remind_4h, remind_1h, is_active, created_at";

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event
    pub async fn create(&self, request: CreateEventRequest) -> Result<Event, RemindBuddyError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (name, due_at, chat_id, remind_12h, remind_4h, remind_1h)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, due_at, chat_id, remind_12h, remind_4h, remind_1h, is_active, created_at
            "#,
        )
        .bind(request.name)
        .bind(request.due_at)
        .bind(request.chat_id)
        .bind(request.remind_12h)
        .bind(request.remind_4h)
        .bind(request.remind_1h)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Active events for a chat with a due time still in the future,
    /// ascending by due time. Past and stopped events fall out here rather
    /// than through any archival step.
    pub async fn list_active_upcoming(
        &self,
        chat_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<Event>, RemindBuddyError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE chat_id = $1 AND due_at > $2 AND is_active = TRUE \
             ORDER BY due_at ASC"
        ))
        .bind(chat_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Find an event by id, scoped to its owning chat
    pub async fn find_owned(
        &self,
        id: i64,
        chat_id: i64,
    ) -> Result<Option<Event>, RemindBuddyError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 AND chat_id = $2"
        ))
        .bind(id)
        .bind(chat_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Soft-deactivate an event owned by the given chat.
    ///
    /// Returns false when no owned row matched, so callers can report
    /// "not found" without a prior read.
    pub async fn deactivate(&self, id: i64, chat_id: i64) -> Result<bool, RemindBuddyError> {
        let result = sqlx::query("UPDATE events SET is_active = FALSE WHERE id = $1 AND chat_id = $2")
            .bind(id)
            .bind(chat_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Active events with the threshold's flag set and a due time inside
    /// the threshold's inclusive scan window.
    pub async fn due_in_window(
        &self,
        threshold: ReminderThreshold,
        now: DateTime<Utc>,
    ) -> Result<Vec<Event>, RemindBuddyError> {
        // Column names cannot be bound, so each threshold gets its own query
        let sql = match threshold {
            ReminderThreshold::TwelveHours => format!(
                "SELECT {EVENT_COLUMNS} FROM events \
                 WHERE remind_12h = TRUE AND is_active = TRUE AND due_at BETWEEN $1 AND $2 \
                 ORDER BY due_at ASC"
            ),
            ReminderThreshold::FourHours => format!(
                "SELECT {EVENT_COLUMNS} FROM events \
                 WHERE remind_4h = TRUE AND is_active = TRUE AND due_at BETWEEN $1 AND $2 \
                 ORDER BY due_at ASC"
            ),
            ReminderThreshold::OneHour => format!(
                "SELECT {EVENT_COLUMNS} FROM events \
                 WHERE remind_1h = TRUE AND is_active = TRUE AND due_at BETWEEN $1 AND $2 \
                 ORDER BY due_at ASC"
            ),
        };

        let (from, to) = threshold.window(now);
        let events = sqlx::query_as::<_, Event>(&sql)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;

        Ok(events)
    }
}
