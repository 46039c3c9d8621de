//! # Storage Layer
//!
//! Disk-resident bot state: the global timezone map and per-user reminder
//! lists. Both stores are explicit objects with a load-on-init,
//! persist-on-mutate lifecycle; nothing is process-global.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod reminders;
pub mod timezones;

pub use reminders::{ReminderRecord, ReminderStore};
pub use timezones::TimezoneRegistry;
