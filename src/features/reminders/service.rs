//! Command-facing reminder operations
//!
//! The surface the command dispatcher calls: set a timezone, add / list /
//! delete reminders. All input validation happens here so the stores only
//! ever see well-formed mutations; validation failures change no state.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use chrono_tz::Tz;
use std::sync::Arc;

use crate::core::errors::ChimeError;
use crate::features::reminders::matcher;
use crate::storage::{ReminderRecord, ReminderStore, TimezoneRegistry};

/// Time of day used when the caller supplies none.
pub const DEFAULT_TIME_OF_DAY: &str = "12:00 PM";

/// Facade over the stores for the command layer.
pub struct ReminderService {
    store: Arc<ReminderStore>,
    timezones: Arc<TimezoneRegistry>,
}

impl ReminderService {
    pub fn new(store: Arc<ReminderStore>, timezones: Arc<TimezoneRegistry>) -> Self {
        Self { store, timezones }
    }

    /// Set (or overwrite) the user's timezone.
    pub async fn set_timezone(&self, user_id: &str, name: &str) -> Result<(), ChimeError> {
        self.timezones.set(user_id, name).await
    }

    /// The user's configured zone, if any.
    pub async fn timezone_of(&self, user_id: &str) -> Option<Tz> {
        self.timezones.get(user_id).await
    }

    /// Validate and append a reminder, returning the stored record.
    ///
    /// Fails with [`ChimeError::MissingTimezone`] before a zone is set —
    /// a reminder without a zone could never be matched — and with
    /// [`ChimeError::InvalidTimeFormat`] when the time string is off-grammar.
    pub async fn add_reminder(
        &self,
        user_id: &str,
        task: &str,
        time_of_day: Option<&str>,
    ) -> Result<ReminderRecord, ChimeError> {
        if self.timezones.get(user_id).await.is_none() {
            return Err(ChimeError::MissingTimezone(user_id.to_string()));
        }

        let time_of_day = time_of_day.unwrap_or(DEFAULT_TIME_OF_DAY).trim();
        if matcher::parse_time_of_day(time_of_day).is_none() {
            return Err(ChimeError::InvalidTimeFormat(time_of_day.to_string()));
        }

        let record = ReminderRecord {
            task: task.to_string(),
            time_of_day: time_of_day.to_string(),
        };
        self.store.append(user_id, record.clone()).await?;
        Ok(record)
    }

    /// The user's pending reminders in insertion order.
    pub async fn list_reminders(&self, user_id: &str) -> Result<Vec<ReminderRecord>, ChimeError> {
        self.store.list(user_id).await
    }

    /// Delete the reminder at the given 1-based index and return it.
    pub async fn delete_reminder(
        &self,
        user_id: &str,
        index: usize,
    ) -> Result<ReminderRecord, ChimeError> {
        self.store.delete_at(user_id, index).await
    }
}
