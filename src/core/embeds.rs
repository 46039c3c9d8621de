//! Reminder embed builders for Discord responses
//!
//! Shared embed construction for the command replies and the delivery DM.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use crate::storage::ReminderRecord;
use serenity::builder::CreateEmbed;
use serenity::utils::Color;

const GREEN: Color = Color::from_rgb(87, 242, 135);
const BLUE: Color = Color::from_rgb(88, 101, 242);
const RED: Color = Color::from_rgb(237, 66, 69);

/// Confirmation embed after a reminder is stored.
pub fn reminder_set_embed(record: &ReminderRecord, timezone: &str) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("📌 Reminder Set")
        .description(format!(
            "**📝 Task:** {}\n**⏰ Time:** {} ({})",
            record.task, record.time_of_day, timezone
        ))
        .color(GREEN)
        .footer(|f| f.text("⏳ We'll remind you on time!"));
    embed
}

/// Numbered listing of a user's pending reminders.
///
/// Indexes are 1-based and match the index space accepted by delete.
pub fn reminder_list_embed(records: &[ReminderRecord]) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.title("📋 Your Reminders").color(BLUE);
    for (i, record) in records.iter().enumerate() {
        embed.field(
            format!("#{}", i + 1),
            format!("{} at {}", record.task, record.time_of_day),
            false,
        );
    }
    embed
}

/// The delivery DM sent when a reminder fires.
pub fn reminder_fired_embed(record: &ReminderRecord, timezone: &str) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("🔔 Reminder Time!")
        .description(format!(
            "**📝 Task:** {}\n**⏰ Time:** {} ({})",
            record.task, record.time_of_day, timezone
        ))
        .color(RED)
        .footer(|f| f.text("Stay productive!"));
    embed
}
