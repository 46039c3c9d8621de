//! Slash command dispatch
//!
//! Maps interactions onto [`ReminderService`] calls and turns validation
//! errors into the user-facing reply strings. Storage errors are not
//! translated — they bubble to the event handler's error log.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use log::{debug, info};
use serenity::builder::CreateEmbed;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::slash::{get_integer_option, get_string_option};
use crate::core::embeds::{reminder_list_embed, reminder_set_embed};
use crate::core::errors::ChimeError;
use crate::features::reminders::ReminderService;

const TZ_LIST_URL: &str = "https://en.wikipedia.org/wiki/List_of_tz_database_time_zones";

/// Handles all reminder slash commands.
pub struct CommandHandler {
    service: Arc<ReminderService>,
}

enum Reply {
    Text(String),
    Embed(CreateEmbed),
}

impl CommandHandler {
    pub fn new(service: Arc<ReminderService>) -> Self {
        Self { service }
    }

    /// Dispatch one slash command interaction.
    pub async fn handle(
        &self,
        ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let user_id = command.user.id.to_string();
        debug!("dispatching /{} for user {user_id}", command.data.name);

        let reply = match command.data.name.as_str() {
            "set_timezone" => self.handle_set_timezone(&user_id, command).await?,
            "list_timezones" => Reply::Text(format!(
                "🌍 You can find valid timezone strings here:\n{TZ_LIST_URL}"
            )),
            "remind" => self.handle_remind(&user_id, command).await?,
            "reminders" => self.handle_reminders(&user_id).await?,
            "delete_reminder" => self.handle_delete_reminder(&user_id, command).await?,
            other => {
                debug!("ignoring unknown command /{other}");
                return Ok(());
            }
        };

        command
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|msg| match reply {
                        Reply::Text(text) => msg.content(text),
                        Reply::Embed(embed) => msg.set_embed(embed),
                    })
            })
            .await?;
        Ok(())
    }

    async fn handle_set_timezone(
        &self,
        user_id: &str,
        command: &ApplicationCommandInteraction,
    ) -> Result<Reply> {
        let timezone = get_string_option(&command.data.options, "timezone").unwrap_or_default();

        match self.service.set_timezone(user_id, &timezone).await {
            Ok(()) => {
                info!("user {user_id} set timezone to {timezone}");
                Ok(Reply::Text(format!(
                    "✅ Your timezone has been set to `{timezone}`"
                )))
            }
            Err(ChimeError::InvalidTimezone(_)) => Ok(Reply::Text(
                "❌ Invalid timezone. Use `/list_timezones` to find valid options.".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn handle_remind(
        &self,
        user_id: &str,
        command: &ApplicationCommandInteraction,
    ) -> Result<Reply> {
        let task = get_string_option(&command.data.options, "task").unwrap_or_default();
        let time = get_string_option(&command.data.options, "time");

        match self
            .service
            .add_reminder(user_id, &task, time.as_deref())
            .await
        {
            Ok(record) => {
                info!(
                    "user {user_id} set reminder `{}` at {}",
                    record.task, record.time_of_day
                );
                // timezone_of is Some here: add_reminder just checked it
                let timezone = self
                    .service
                    .timezone_of(user_id)
                    .await
                    .map(|tz| tz.name().to_string())
                    .unwrap_or_default();
                Ok(Reply::Embed(reminder_set_embed(&record, &timezone)))
            }
            Err(ChimeError::MissingTimezone(_)) => Ok(Reply::Text(
                "🌍 Please set your timezone first using `/set_timezone`.".to_string(),
            )),
            Err(ChimeError::InvalidTimeFormat(_)) => Ok(Reply::Text(
                "❌ Invalid time format. Please use HH:MM AM/PM format.".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn handle_reminders(&self, user_id: &str) -> Result<Reply> {
        let records = self.service.list_reminders(user_id).await?;
        if records.is_empty() {
            Ok(Reply::Text("📭 You have no reminders.".to_string()))
        } else {
            Ok(Reply::Embed(reminder_list_embed(&records)))
        }
    }

    async fn handle_delete_reminder(
        &self,
        user_id: &str,
        command: &ApplicationCommandInteraction,
    ) -> Result<Reply> {
        let index = get_integer_option(&command.data.options, "index").unwrap_or(0);
        let index = usize::try_from(index).unwrap_or(0);

        match self.service.delete_reminder(user_id, index).await {
            Ok(removed) => {
                info!("user {user_id} deleted reminder `{}`", removed.task);
                Ok(Reply::Text(format!(
                    "🗑️ Deleted reminder: `{} at {}`",
                    removed.task, removed.time_of_day
                )))
            }
            Err(ChimeError::IndexOutOfRange { .. }) => Ok(Reply::Text(
                "❌ Invalid index. Use `/reminders` to see valid indexes.".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }
}
