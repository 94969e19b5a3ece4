//! Persistence port and backends.
//!
//! Every entity is serialized as JSON under a fixed record key. The engine
//! talks to a [`StateStore`] so the backing store can be swapped: SQLite on
//! disk for the app, a `HashMap` fake for tests.

mod database;
mod memory;

pub use database::SqliteStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::StorageError;

/// Fixed record keys, one per entity type.
pub mod keys {
    pub const USER: &str = "selflove_user";
    pub const JOURNALS: &str = "selflove_journals";
    pub const STREAK: &str = "selflove_streak";
    pub const DAILY: &str = "selflove_daily";
    pub const FAV_AFFIRMATIONS: &str = "selflove_fav_affirmations";
    pub const CUSTOM_AFFIRMATIONS: &str = "selflove_custom_affirmations";
    pub const BADGES: &str = "selflove_badges";
    pub const STATS: &str = "selflove_stats";
    pub const SETTINGS: &str = "selflove_settings";
    pub const WEEKLY: &str = "selflove_weekly";
    pub const MIRROR_COUNT: &str = "selflove_mirror_count";
    pub const CHALLENGE_COUNT: &str = "selflove_challenge_count";

    /// Every record key, in export order.
    pub const ALL: [&str; 12] = [
        USER,
        JOURNALS,
        STREAK,
        DAILY,
        FAV_AFFIRMATIONS,
        CUSTOM_AFFIRMATIONS,
        BADGES,
        STATS,
        SETTINGS,
        WEEKLY,
        MIRROR_COUNT,
        CHALLENGE_COUNT,
    ];
}

/// Raw record store: serialized values under fixed string keys.
///
/// Callers own the failure policy. The engine treats a failed `get` as an
/// absent record and a failed `set` as a dropped (non-durable) write.
pub trait StateStore {
    /// Fetch the raw serialized record for `key`, if present.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Persist the raw serialized record for `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Returns `~/.config/selflove[-dev]/` based on SELFLOVE_ENV.
///
/// Set SELFLOVE_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SELFLOVE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("selflove-dev")
    } else {
        base_dir.join("selflove")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
