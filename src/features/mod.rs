//! # Features Layer
//!
//! Feature modules built on the core and storage layers.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

pub mod reminders;

pub use reminders::{
    DirectMessageNotifier, Notifier, ReminderScheduler, ReminderService, DEFAULT_TIME_OF_DAY,
};
