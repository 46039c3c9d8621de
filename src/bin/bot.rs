use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use serenity::async_trait;
use serenity::model::application::interaction::Interaction;
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;
use tokio::sync::watch;

use chime::commands::{register_global_commands, register_guild_commands, CommandHandler};
use chime::core::Config;
use chime::features::reminders::{DirectMessageNotifier, ReminderScheduler, ReminderService};
use chime::storage::{ReminderStore, TimezoneRegistry};

struct Handler {
    command_handler: Arc<CommandHandler>,
    guild_id: Option<GuildId>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected and ready", ready.user.name);

        let registered = match self.guild_id {
            Some(guild_id) => register_guild_commands(&ctx, guild_id).await,
            None => register_global_commands(&ctx).await,
        };
        if let Err(e) = registered {
            error!("Failed to register slash commands: {e:#}");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::ApplicationCommand(command) = interaction {
            let name = command.data.name.clone();
            if let Err(e) = self.command_handler.handle(&ctx, &command).await {
                error!("Command /{name} failed: {e:#}");
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    std::fs::create_dir_all(&config.data_dir)?;

    let timezones = Arc::new(
        TimezoneRegistry::load(config.data_dir.join("user_timezones.json")).await?,
    );
    let store = Arc::new(ReminderStore::new(config.data_dir.join("reminders"))?);
    let service = Arc::new(ReminderService::new(store.clone(), timezones.clone()));

    // Slash commands only, no message content needed
    let intents = GatewayIntents::empty();
    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(Handler {
            command_handler: Arc::new(CommandHandler::new(service)),
            guild_id: config.guild_id.map(GuildId),
        })
        .await?;

    let notifier = Arc::new(DirectMessageNotifier::new(client.cache_and_http.http.clone()));
    let scheduler = Arc::new(ReminderScheduler::new(
        store,
        timezones,
        notifier,
        config.tick_interval,
        config.match_tolerance,
    ));

    let (stop_tx, stop_rx) = watch::channel(false);
    let scheduler_task = tokio::spawn(scheduler.run(stop_rx));

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {e}");
            return;
        }
        info!("Shutdown requested");
        // Let the in-flight tick finish before the process exits
        let _ = stop_tx.send(true);
        shard_manager.lock().await.shutdown_all().await;
    });

    client.start().await?;

    if let Err(e) = scheduler_task.await {
        error!("Scheduler task panicked: {e}");
    }
    info!("Shutdown complete");
    Ok(())
}
