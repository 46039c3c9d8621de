//! Domain error types for the reminder core
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Initial creation with validation and persistence error kinds

use thiserror::Error;

/// Errors surfaced by the timezone registry, reminder store, and service layer.
///
/// Validation variants are returned synchronously to the caller of the
/// mutating operation and cause no state change. Persistence variants affect
/// only the user/operation that hit them.
#[derive(Debug, Error)]
pub enum ChimeError {
    /// The zone name is not in the IANA tz database.
    #[error("`{0}` is not a recognized IANA timezone")]
    InvalidTimezone(String),

    /// The time string does not conform to the `HH:MM AM/PM` grammar.
    #[error("`{0}` is not a valid time of day, expected HH:MM AM/PM")]
    InvalidTimeFormat(String),

    /// A reminder was added before the user configured a timezone.
    #[error("user {0} has no timezone configured")]
    MissingTimezone(String),

    /// A 1-based delete index outside `[1, len]`.
    #[error("index {index} is out of range for a list of {len} reminder(s)")]
    IndexOutOfRange { index: usize, len: usize },

    /// I/O failure while reading or rewriting persisted state.
    #[error("reminder storage I/O failure: {0}")]
    Persistence(#[from] std::io::Error),

    /// A persisted file exists but cannot be decoded.
    #[error("reminder storage contains undecodable data: {0}")]
    Corrupt(#[from] serde_json::Error),
}
