//! # Core Module
//!
//! Configuration, error types, embed builders, and crash-safe file helpers.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add embeds module with reminder embed builders
//! - 1.0.0: Initial creation with config, errors, and file_utils

pub mod config;
pub mod embeds;
pub mod errors;
pub mod file_utils;

// Re-export commonly used items
pub use config::Config;
pub use embeds::{reminder_fired_embed, reminder_list_embed, reminder_set_embed};
pub use errors::ChimeError;
pub use file_utils::{read_if_exists, write_atomic};
