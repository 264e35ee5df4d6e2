//! Reminder dispatcher loop
//!
//! A single long-lived background task that wakes on a fixed period, scans
//! the event store for rows inside each threshold's window, and sends one
//! notification per matching row. There is no sent-marker: the window
//! widths, not bookkeeping, keep a threshold from being missed, and a
//! process restart inside a window can re-notify.

use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::database::DatabaseService;
use crate::models::ReminderThreshold;
use crate::services::NotificationService;
use crate::utils::errors::Result;

pub struct ReminderDispatcher {
    db: DatabaseService,
    notifier: NotificationService,
    period: Duration,
}

impl ReminderDispatcher {
    pub fn new(db: DatabaseService, notifier: NotificationService, period: Duration) -> Self {
        Self {
            db,
            notifier,
            period,
        }
    }

    /// Start the dispatch loop.
    ///
    /// Consumes the dispatcher, so the startup sequence owns the only
    /// instance and a second loop cannot be started.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        info!(period_secs = self.period.as_secs(), "Starting reminder dispatcher");

        loop {
            if let Err(e) = self.run_cycle().await {
                // Store unreachable: skip this cycle, retry after the full sleep
                error!(error = %e, "Reminder cycle aborted");
            }

            tokio::time::sleep(self.period).await;
        }
    }

    /// One dispatch cycle across all three thresholds.
    ///
    /// Returns an error only when the store is unreachable at cycle start;
    /// per-threshold and per-row failures are logged and skipped.
    async fn run_cycle(&self) -> Result<()> {
        self.db.health_check().await?;

        let now = Utc::now();

        for threshold in ReminderThreshold::ALL {
            let events = match self.db.events.due_in_window(threshold, now).await {
                Ok(events) => events,
                Err(e) => {
                    error!(threshold = ?threshold, error = %e, "Window query failed");
                    continue;
                }
            };

            for event in events {
                let user_name = self.db.display_name(event.chat_id).await;

                if let Err(e) = self
                    .notifier
                    .send_reminder(user_name.as_deref(), &event, threshold)
                    .await
                {
                    warn!(chat_id = event.chat_id, event_id = event.id, error = %e,
                          "Failed to send reminder");
                }
            }
        }

        Ok(())
    }
}
