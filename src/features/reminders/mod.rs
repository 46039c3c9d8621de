//! # Reminders Feature
//!
//! Wall-clock reminder scheduling: timezone-aware time matching, the
//! periodic scan loop, delivery, and the command-facing service.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod matcher;
pub mod notifier;
pub mod scheduler;
pub mod service;

pub use notifier::{DirectMessageNotifier, Notifier};
pub use scheduler::ReminderScheduler;
pub use service::{ReminderService, DEFAULT_TIME_OF_DAY};
