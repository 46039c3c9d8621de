//! Slash command definitions and registration
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use log::info;
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::{Command, CommandOptionType};
use serenity::model::application::interaction::application_command::CommandDataOption;
use serenity::model::id::GuildId;
use serenity::prelude::Context;

/// Creates all slash command definitions
pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![
        create_set_timezone_command(),
        create_list_timezones_command(),
        create_remind_command(),
        create_reminders_command(),
        create_delete_reminder_command(),
    ]
}

fn create_set_timezone_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("set_timezone")
        .description("Set your timezone so reminders fire at your local time")
        .create_option(|option| {
            option
                .name("timezone")
                .description("IANA timezone name, e.g. America/New_York")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .to_owned()
}

fn create_list_timezones_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("list_timezones")
        .description("Where to find valid timezone names")
        .to_owned()
}

fn create_remind_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("remind")
        .description("Set a reminder for a time of day in your timezone")
        .create_option(|option| {
            option
                .name("task")
                .description("What to remind you about")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("time")
                .description("Time of day as HH:MM AM/PM (default 12:00 PM)")
                .kind(CommandOptionType::String)
                .required(false)
        })
        .to_owned()
}

fn create_reminders_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("reminders")
        .description("List your pending reminders")
        .to_owned()
}

fn create_delete_reminder_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("delete_reminder")
        .description("Delete a pending reminder by its list number")
        .create_option(|option| {
            option
                .name("index")
                .description("The reminder number shown by /reminders")
                .kind(CommandOptionType::Integer)
                .min_int_value(1)
                .required(true)
        })
        .to_owned()
}

/// Registers all slash commands globally
pub async fn register_global_commands(ctx: &Context) -> Result<()> {
    let commands = create_commands();
    let count = commands.len();

    Command::set_global_application_commands(&ctx.http, |builder| {
        for command in commands {
            builder.add_application_command(command);
        }
        builder
    })
    .await?;

    info!("Global slash commands registered successfully ({count} commands)");
    Ok(())
}

/// Registers all slash commands for a specific guild
pub async fn register_guild_commands(ctx: &Context, guild_id: GuildId) -> Result<()> {
    let commands = create_commands();
    let count = commands.len();

    guild_id
        .set_application_commands(&ctx.http, |builder| {
            for command in commands {
                builder.add_application_command(command);
            }
            builder
        })
        .await?;

    info!("Guild slash commands registered for guild {guild_id} ({count} commands)");
    Ok(())
}

/// Utility function to get string option from slash command
pub fn get_string_option(options: &[CommandDataOption], name: &str) -> Option<String> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

/// Utility function to get integer option from slash command
pub fn get_integer_option(options: &[CommandDataOption], name: &str) -> Option<i64> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_i64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_commands_covers_all_operations() {
        let commands = create_commands();
        assert_eq!(commands.len(), 5);

        let names: Vec<_> = commands
            .iter()
            .filter_map(|c| c.0.get("name").and_then(|v| v.as_str()))
            .collect();
        assert!(names.contains(&"set_timezone"));
        assert!(names.contains(&"list_timezones"));
        assert!(names.contains(&"remind"));
        assert!(names.contains(&"reminders"));
        assert!(names.contains(&"delete_reminder"));
    }

    #[test]
    fn test_get_string_option_missing() {
        assert_eq!(get_string_option(&[], "time"), None);
    }

    #[test]
    fn test_get_integer_option_missing() {
        assert_eq!(get_integer_option(&[], "index"), None);
    }
}
