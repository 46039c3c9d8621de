//! Persisted user → IANA timezone mapping
//!
//! The whole map lives in one JSON file. Reads are served from an in-memory
//! cache; every successful `set` rewrites the file atomically before the new
//! value becomes visible. Mutations are serialized behind the cache's write
//! lock, so two concurrent `set` calls can never interleave their rewrites.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use chrono_tz::Tz;
use log::debug;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;

use crate::core::errors::ChimeError;
use crate::core::file_utils::{read_if_exists, write_atomic};

/// Registry of each user's configured timezone.
pub struct TimezoneRegistry {
    path: PathBuf,
    cache: RwLock<HashMap<String, String>>,
}

impl TimezoneRegistry {
    /// Load the registry from `path`, starting empty if the file is absent.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, ChimeError> {
        let path = path.into();
        let map: HashMap<String, String> = match read_if_exists(&path).await? {
            Some(bytes) => serde_json::from_slice(&bytes)?,
            None => HashMap::new(),
        };
        debug!("loaded {} user timezone(s) from {}", map.len(), path.display());
        Ok(TimezoneRegistry {
            path,
            cache: RwLock::new(map),
        })
    }

    /// True if `name` is accepted by the IANA tz database.
    pub fn is_valid(name: &str) -> bool {
        name.parse::<Tz>().is_ok()
    }

    /// The user's configured zone, if any.
    ///
    /// The stored name was validated on `set`, so a parse failure here can
    /// only mean the file was edited by hand; such entries read as absent.
    pub async fn get(&self, user_id: &str) -> Option<Tz> {
        let cache = self.cache.read().await;
        cache.get(user_id).and_then(|name| name.parse().ok())
    }

    /// Set (or overwrite) the user's timezone and persist the whole map.
    ///
    /// The cache is only updated after the rewrite succeeds, so a failed
    /// persist leaves both memory and disk on the previous mapping.
    pub async fn set(&self, user_id: &str, name: &str) -> Result<(), ChimeError> {
        if !Self::is_valid(name) {
            return Err(ChimeError::InvalidTimezone(name.to_string()));
        }

        let mut cache = self.cache.write().await;
        let mut next = cache.clone();
        next.insert(user_id.to_string(), name.to_string());

        let bytes = serde_json::to_vec_pretty(&next)?;
        write_atomic(&self.path, &bytes).await?;

        *cache = next;
        debug!("timezone for user {user_id} set to {name}");
        Ok(())
    }
}
