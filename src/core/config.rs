//! Bot configuration loaded from environment variables
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Enforce match tolerance >= tick interval at load time
//! - 1.0.0: Initial creation with token, data dir, and scheduler timings

use anyhow::{anyhow, Result};
use log::warn;
use std::path::PathBuf;
use std::time::Duration;

/// Default scheduler tick period in seconds.
pub const DEFAULT_TICK_SECS: u64 = 30;

/// Default firing-window tolerance in seconds.
pub const DEFAULT_TOLERANCE_SECS: u64 = 60;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Discord bot token (`DISCORD_TOKEN`).
    pub discord_token: String,
    /// Directory holding the timezone map and per-user reminder files
    /// (`CHIME_DATA_DIR`, default `./data`).
    pub data_dir: PathBuf,
    /// Scheduler tick period (`CHIME_TICK_SECS`).
    pub tick_interval: Duration,
    /// Firing-window tolerance (`CHIME_TOLERANCE_SECS`).
    pub match_tolerance: Duration,
    /// Optional guild for fast command registration during development
    /// (`CHIME_GUILD_ID`); commands register globally when unset.
    pub guild_id: Option<u64>,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// A tolerance below the tick period would let reminders slip through
    /// their firing window unevaluated, so it is raised to the tick period
    /// with a warning rather than rejected.
    pub fn from_env() -> Result<Self> {
        let discord_token = std::env::var("DISCORD_TOKEN")
            .map_err(|_| anyhow!("DISCORD_TOKEN environment variable is not set"))?;

        let data_dir = std::env::var("CHIME_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let tick_secs = parse_secs("CHIME_TICK_SECS", DEFAULT_TICK_SECS)?;
        let mut tolerance_secs = parse_secs("CHIME_TOLERANCE_SECS", DEFAULT_TOLERANCE_SECS)?;

        if tolerance_secs < tick_secs {
            warn!(
                "CHIME_TOLERANCE_SECS ({tolerance_secs}) is below CHIME_TICK_SECS ({tick_secs}); \
                 raising tolerance to the tick period"
            );
            tolerance_secs = tick_secs;
        }

        let guild_id = match std::env::var("CHIME_GUILD_ID") {
            Ok(raw) => Some(
                raw.parse::<u64>()
                    .map_err(|_| anyhow!("CHIME_GUILD_ID is not a valid guild id: `{raw}`"))?,
            ),
            Err(_) => None,
        };

        Ok(Config {
            discord_token,
            data_dir,
            tick_interval: Duration::from_secs(tick_secs),
            match_tolerance: Duration::from_secs(tolerance_secs),
            guild_id,
        })
    }
}

fn parse_secs(var: &str, default: u64) -> Result<u64> {
    match std::env::var(var) {
        Ok(raw) => {
            let secs: u64 = raw
                .parse()
                .map_err(|_| anyhow!("{var} must be a positive number of seconds, got `{raw}`"))?;
            if secs == 0 {
                return Err(anyhow!("{var} must be greater than zero"));
            }
            Ok(secs)
        }
        Err(_) => Ok(default),
    }
}
