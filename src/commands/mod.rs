//! # Command System
//!
//! Slash command (/) definitions and dispatch for Discord interactions.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod handler;
pub mod slash;

pub use handler::CommandHandler;
pub use slash::{
    create_commands, get_integer_option, get_string_option, register_global_commands,
    register_guild_commands,
};
