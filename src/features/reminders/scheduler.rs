//! Periodic reminder evaluation loop
//!
//! Every tick the scheduler walks all users with a persisted reminder list,
//! skips those without a configured timezone (their files are never read or
//! rewritten), evaluates each pending record against "now" in that user's
//! zone, persists the survivors, and dispatches the fired records.
//!
//! Delivery is fire-and-forget: a matched record is removed in the same tick
//! whether or not the DM goes through, so storage growth stays bounded.
//! Ticks never overlap, and a stop request lets the in-flight tick finish so
//! removal and persistence stay consistent.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Persist survivors before dispatch so a failed rewrite cannot double-deliver
//! - 1.0.0: Initial tick loop with watch-channel shutdown

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::features::reminders::matcher;
use crate::features::reminders::notifier::Notifier;
use crate::storage::{ReminderStore, TimezoneRegistry};

/// The periodic scan loop that fires due reminders.
pub struct ReminderScheduler {
    store: Arc<ReminderStore>,
    timezones: Arc<TimezoneRegistry>,
    notifier: Arc<dyn Notifier>,
    tick_interval: Duration,
    match_tolerance: chrono::Duration,
}

impl ReminderScheduler {
    pub fn new(
        store: Arc<ReminderStore>,
        timezones: Arc<TimezoneRegistry>,
        notifier: Arc<dyn Notifier>,
        tick_interval: Duration,
        match_tolerance: Duration,
    ) -> Self {
        Self {
            store,
            timezones,
            notifier,
            tick_interval,
            match_tolerance: chrono::Duration::seconds(match_tolerance.as_secs() as i64),
        }
    }

    /// Run ticks until `stop` flips to true.
    ///
    /// The stop signal is only polled between ticks, so an in-flight tick
    /// always completes before the loop exits.
    pub async fn run(self: Arc<Self>, mut stop: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            "reminder scheduler started (tick {}s, tolerance {}s)",
            self.tick_interval.as_secs(),
            self.match_tolerance.num_seconds()
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.tick(Utc::now()).await;
                }
                changed = stop.changed() => {
                    // A dropped sender counts as a stop request
                    if changed.is_err() || *stop.borrow() {
                        info!("reminder scheduler stopping");
                        break;
                    }
                }
            }
        }
    }

    /// One evaluation pass over all users, against the given instant.
    pub async fn tick(&self, now: DateTime<Utc>) {
        let users = match self.store.user_ids().await {
            Ok(users) => users,
            Err(e) => {
                error!("tick aborted, could not enumerate reminder lists: {e}");
                return;
            }
        };

        for user_id in users {
            // No timezone yet: the list stays byte-identical on disk until
            // the user runs /set_timezone.
            let Some(tz) = self.timezones.get(&user_id).await else {
                debug!("user {user_id} has no timezone set, skipping");
                continue;
            };

            let fired = match self
                .store
                .remove_matched(&user_id, |record| {
                    matcher::evaluate(&record.time_of_day, tz, now, self.match_tolerance)
                })
                .await
            {
                Ok(fired) => fired,
                Err(e) => {
                    // This user keeps their full list and is retried next tick.
                    error!("skipping user {user_id} this tick: {e}");
                    continue;
                }
            };

            for record in fired {
                match self.notifier.send(&user_id, &record, tz).await {
                    Ok(()) => {
                        info!("delivered reminder `{}` to user {user_id}", record.task)
                    }
                    Err(e) => {
                        warn!(
                            "could not deliver reminder `{}` to user {user_id}, dropping: {e}",
                            record.task
                        )
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ReminderRecord;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use chrono_tz::Tz;
    use tokio::sync::Mutex;

    struct RecordingNotifier {
        sent: Mutex<Vec<(String, ReminderRecord)>>,
        fail: bool,
    }

    impl RecordingNotifier {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                fail,
            })
        }

        async fn sent(&self) -> Vec<(String, ReminderRecord)> {
            self.sent.lock().await.clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(
            &self,
            user_id: &str,
            record: &ReminderRecord,
            _timezone: Tz,
        ) -> anyhow::Result<()> {
            self.sent
                .lock()
                .await
                .push((user_id.to_string(), record.clone()));
            if self.fail {
                Err(anyhow!("user has DMs closed"))
            } else {
                Ok(())
            }
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        store: Arc<ReminderStore>,
        timezones: Arc<TimezoneRegistry>,
    }

    async fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(ReminderStore::new(dir.path().join("reminders")).unwrap());
        let timezones = Arc::new(
            TimezoneRegistry::load(dir.path().join("user_timezones.json"))
                .await
                .unwrap(),
        );
        Fixture {
            _dir: dir,
            store,
            timezones,
        }
    }

    fn scheduler(f: &Fixture, notifier: Arc<dyn Notifier>) -> ReminderScheduler {
        ReminderScheduler::new(
            f.store.clone(),
            f.timezones.clone(),
            notifier,
            Duration::from_secs(30),
            Duration::from_secs(60),
        )
    }

    fn record(task: &str, time_of_day: &str) -> ReminderRecord {
        ReminderRecord {
            task: task.to_string(),
            time_of_day: time_of_day.to_string(),
        }
    }

    fn new_york_noon_plus(secs: u32) -> DateTime<Utc> {
        chrono_tz::America::New_York
            .with_ymd_and_hms(2024, 6, 3, 12, 0, secs)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[tokio::test]
    async fn test_due_reminder_fires_once_and_is_removed() {
        let f = fixture().await;
        f.timezones.set("1", "America/New_York").await.unwrap();
        f.store.append("1", record("lunch", "12:00 PM")).await.unwrap();

        let notifier = RecordingNotifier::new(false);
        let sched = scheduler(&f, notifier.clone());

        // First tick inside the window: dispatched and removed
        sched.tick(new_york_noon_plus(15)).await;
        assert_eq!(notifier.sent().await.len(), 1);
        assert_eq!(notifier.sent().await[0].0, "1");
        assert!(f.store.list("1").await.unwrap().is_empty());

        // Second tick still inside the window: nothing left to dispatch
        sched.tick(new_york_noon_plus(45)).await;
        assert_eq!(notifier.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn test_not_yet_due_reminder_is_kept() {
        let f = fixture().await;
        f.timezones.set("1", "America/New_York").await.unwrap();
        f.store.append("1", record("later", "3:00 PM")).await.unwrap();

        let notifier = RecordingNotifier::new(false);
        scheduler(&f, notifier.clone())
            .tick(new_york_noon_plus(0))
            .await;

        assert!(notifier.sent().await.is_empty());
        assert_eq!(f.store.list("1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_user_without_timezone_is_left_untouched() {
        let f = fixture().await;
        f.store.append("1", record("orphan", "12:00 PM")).await.unwrap();

        let notifier = RecordingNotifier::new(false);
        scheduler(&f, notifier.clone())
            .tick(new_york_noon_plus(15))
            .await;

        assert!(notifier.sent().await.is_empty());
        assert_eq!(f.store.list("1").await.unwrap(), vec![record("orphan", "12:00 PM")]);
    }

    #[tokio::test]
    async fn test_malformed_record_is_kept_and_never_crashes_the_tick() {
        let f = fixture().await;
        f.timezones.set("1", "America/New_York").await.unwrap();
        f.store.append("1", record("broken", "25:61 PM")).await.unwrap();
        f.store.append("1", record("fine", "12:00 PM")).await.unwrap();

        let notifier = RecordingNotifier::new(false);
        scheduler(&f, notifier.clone())
            .tick(new_york_noon_plus(15))
            .await;

        // The well-formed record fired; the malformed one stays pending.
        assert_eq!(notifier.sent().await.len(), 1);
        assert_eq!(f.store.list("1").await.unwrap(), vec![record("broken", "25:61 PM")]);
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_reverse_removal() {
        let f = fixture().await;
        f.timezones.set("1", "America/New_York").await.unwrap();
        f.store.append("1", record("lunch", "12:00 PM")).await.unwrap();

        let notifier = RecordingNotifier::new(true);
        scheduler(&f, notifier.clone())
            .tick(new_york_noon_plus(15))
            .await;

        // Attempted exactly once, and gone from the store regardless
        assert_eq!(notifier.sent().await.len(), 1);
        assert!(f.store.list("1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persist_failure_keeps_records_and_dispatches_nothing() {
        let f = fixture().await;
        f.timezones.set("1", "America/New_York").await.unwrap();
        f.store.append("1", record("lunch", "12:00 PM")).await.unwrap();

        // Occupy the rewrite's temp path so persisting survivors fails
        let tmp = f._dir.path().join("reminders").join(".1.json.tmp");
        std::fs::create_dir(&tmp).unwrap();

        let notifier = RecordingNotifier::new(false);
        let sched = scheduler(&f, notifier.clone());
        sched.tick(new_york_noon_plus(15)).await;

        // Nothing dispatched, full list still pending for the next tick
        assert!(notifier.sent().await.is_empty());
        assert_eq!(f.store.list("1").await.unwrap(), vec![record("lunch", "12:00 PM")]);

        // Once the rewrite can go through again, delivery happens exactly once
        std::fs::remove_dir(&tmp).unwrap();
        sched.tick(new_york_noon_plus(45)).await;
        assert_eq!(notifier.sent().await.len(), 1);
        assert!(f.store.list("1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_each_user_evaluated_in_own_zone() {
        let f = fixture().await;
        f.timezones.set("1", "America/New_York").await.unwrap();
        f.timezones.set("2", "Asia/Tokyo").await.unwrap();
        f.store.append("1", record("ny", "12:00 PM")).await.unwrap();
        f.store.append("2", record("tokyo", "12:00 PM")).await.unwrap();

        let notifier = RecordingNotifier::new(false);
        scheduler(&f, notifier.clone())
            .tick(new_york_noon_plus(15))
            .await;

        // Noon in New York is the middle of the night in Tokyo
        let sent = notifier.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1.task, "ny");
        assert_eq!(f.store.list("2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_run_stops_gracefully() {
        let f = fixture().await;
        let notifier = RecordingNotifier::new(false);
        let sched = Arc::new(scheduler(&f, notifier));

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(sched.run(rx));

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("scheduler did not stop")
            .unwrap();
    }
}
