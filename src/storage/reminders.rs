//! Persisted per-user reminder lists
//!
//! One JSON file per user under the store directory, holding that user's
//! pending reminders in insertion order. The file's array order is the
//! 1-based index space users see in `/reminders` and pass to
//! `/delete_reminder`.
//!
//! Every operation on a user's list runs under that user's async mutex,
//! held across the whole read-modify-persist cycle: an `append` racing the
//! scheduler's `remove_matched` rewrite can therefore never drop the
//! appended record. Rewrites go through [`write_atomic`] so a crash can
//! never leave a truncated list.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.2.0: Skip the rewrite in remove_matched when nothing fired
//! - 1.1.0: Per-user mutex table (DashMap) around read-modify-persist
//! - 1.0.0: Initial JSON-per-user store

use dashmap::DashMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core::errors::ChimeError;
use crate::core::file_utils::{read_if_exists, write_atomic};

/// A pending reminder: free-form task text plus a 12-hour wall-clock time.
///
/// There is no date component. "Today" is resolved in the owner's timezone
/// on every scheduler tick, so an unmatched reminder re-enters its firing
/// window daily until it fires or is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderRecord {
    pub task: String,
    /// 12-hour clock string, e.g. `"5:00 PM"`. Stored verbatim.
    pub time_of_day: String,
}

/// On-disk store of every user's pending reminders.
pub struct ReminderStore {
    dir: PathBuf,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl ReminderStore {
    /// Open the store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, ChimeError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(ReminderStore {
            dir,
            locks: DashMap::new(),
        })
    }

    fn user_path(&self, user_id: &str) -> PathBuf {
        self.dir.join(format!("{user_id}.json"))
    }

    fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(user_id.to_string())
            .or_default()
            .clone()
    }

    async fn read_list(&self, user_id: &str) -> Result<Vec<ReminderRecord>, ChimeError> {
        match read_if_exists(&self.user_path(user_id)).await? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    async fn write_list(
        &self,
        user_id: &str,
        records: &[ReminderRecord],
    ) -> Result<(), ChimeError> {
        let bytes = serde_json::to_vec_pretty(records)?;
        write_atomic(&self.user_path(user_id), &bytes).await?;
        Ok(())
    }

    /// Append a reminder to the end of the user's list and persist it.
    pub async fn append(&self, user_id: &str, record: ReminderRecord) -> Result<(), ChimeError> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let mut records = self.read_list(user_id).await?;
        records.push(record);
        self.write_list(user_id, &records).await?;
        debug!("user {user_id} now has {} pending reminder(s)", records.len());
        Ok(())
    }

    /// The user's pending reminders in persisted insertion order.
    pub async fn list(&self, user_id: &str) -> Result<Vec<ReminderRecord>, ChimeError> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;
        self.read_list(user_id).await
    }

    /// Remove the reminder at the given 1-based index and return it.
    ///
    /// The remaining records keep their original relative order.
    pub async fn delete_at(
        &self,
        user_id: &str,
        index: usize,
    ) -> Result<ReminderRecord, ChimeError> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let mut records = self.read_list(user_id).await?;
        if index == 0 || index > records.len() {
            return Err(ChimeError::IndexOutOfRange {
                index,
                len: records.len(),
            });
        }
        let removed = records.remove(index - 1);
        self.write_list(user_id, &records).await?;
        Ok(removed)
    }

    /// Partition the user's list with `matched`, persist the survivors, and
    /// return the fired records. Scheduler use only.
    ///
    /// Fired records are returned only after the survivors are durably on
    /// disk; when nothing matches, the file is left untouched. On a persist
    /// failure nothing is returned and the full list stays pending, so a
    /// record can never be dispatched without also having been removed.
    pub async fn remove_matched<F>(
        &self,
        user_id: &str,
        matched: F,
    ) -> Result<Vec<ReminderRecord>, ChimeError>
    where
        F: Fn(&ReminderRecord) -> bool,
    {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let records = self.read_list(user_id).await?;
        let (fired, survivors): (Vec<_>, Vec<_>) = records.into_iter().partition(|r| matched(r));

        if !fired.is_empty() {
            self.write_list(user_id, &survivors).await?;
        }
        Ok(fired)
    }

    /// Every user with a persisted reminder list.
    pub async fn user_ids(&self) -> Result<Vec<String>, ChimeError> {
        let mut users = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    users.push(stem.to_string());
                }
            }
        }
        users.sort();
        Ok(users)
    }
}
