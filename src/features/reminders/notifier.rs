//! Outbound reminder delivery
//!
//! The scheduler talks to delivery through the [`Notifier`] trait so tests
//! can observe dispatches without a gateway connection. The production
//! implementation DMs the user over Discord HTTP.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono_tz::Tz;
use log::debug;
use serenity::http::Http;
use serenity::model::id::UserId;
use std::sync::Arc;

use crate::core::embeds::reminder_fired_embed;
use crate::storage::ReminderRecord;

/// Delivery channel for fired reminders.
///
/// Delivery is best-effort: the scheduler logs a failure and moves on, it
/// never retries or re-queues the record.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, user_id: &str, record: &ReminderRecord, timezone: Tz) -> Result<()>;
}

/// Sends fired reminders as a direct message to the owning user.
pub struct DirectMessageNotifier {
    http: Arc<Http>,
}

impl DirectMessageNotifier {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Notifier for DirectMessageNotifier {
    async fn send(&self, user_id: &str, record: &ReminderRecord, timezone: Tz) -> Result<()> {
        let id: u64 = user_id
            .parse()
            .map_err(|_| anyhow!("`{user_id}` is not a Discord user id"))?;

        let dm = UserId(id).create_dm_channel(&*self.http).await?;
        let embed = reminder_fired_embed(record, timezone.name());
        dm.send_message(&*self.http, |m| m.set_embed(embed)).await?;

        debug!("reminder DM sent to user {user_id}");
        Ok(())
    }
}
