// Core layer - configuration, errors, embeds, file helpers
pub mod core;

// Storage layer - timezone map and per-user reminder lists
pub mod storage;

// Features layer - reminder matching, scheduling, delivery
pub mod features;

// Application layer - slash command definitions and dispatch
pub mod commands;

// Re-export core config and errors
pub use crate::core::{ChimeError, Config};

// Re-export feature items
pub use crate::features::{
    DirectMessageNotifier, Notifier, ReminderScheduler, ReminderService, DEFAULT_TIME_OF_DAY,
};

// Re-export storage items
pub use crate::storage::{ReminderRecord, ReminderStore, TimezoneRegistry};
