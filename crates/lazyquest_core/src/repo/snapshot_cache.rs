//! Local snapshot cache.
//!
//! # Responsibility
//! - Keep a best-effort copy of the latest state per user so a later session
//!   can recover even if the remote write never completed.
//!
//! # Invariants
//! - Writes replace the whole entry for a key.
//! - A read of an unknown key is `Ok(None)`, not an error.

use crate::db::DbError;
use crate::model::snapshot::GameSnapshot;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CacheResult<T> = Result<T, CacheError>;

#[derive(Debug)]
pub enum CacheError {
    Db(DbError),
    Codec(serde_json::Error),
}

impl CacheError {
    pub fn is_storage_full(&self) -> bool {
        match self {
            Self::Db(err) => err.is_storage_full(),
            Self::Codec(_) => false,
        }
    }
}

impl Display for CacheError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "local cache unavailable: {err}"),
            Self::Codec(err) => write!(f, "local cache entry unreadable: {err}"),
        }
    }
}

impl Error for CacheError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Codec(err) => Some(err),
        }
    }
}

impl From<DbError> for CacheError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for CacheError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(value: serde_json::Error) -> Self {
        Self::Codec(value)
    }
}

/// Synchronous key-value cache of whole snapshots.
pub trait LocalCache {
    fn read_snapshot(&self, key: &str) -> CacheResult<Option<GameSnapshot>>;
    fn write_snapshot(&self, key: &str, snapshot: &GameSnapshot) -> CacheResult<()>;
}

/// Cache key for a user's snapshot.
pub fn cache_key_for(user_id: &str) -> String {
    format!("state:{user_id}")
}

/// SQLite-backed cache over the `snapshot_cache` table.
pub struct SqliteSnapshotCache {
    conn: Connection,
}

impl SqliteSnapshotCache {
    /// Wraps a migrated connection (see `db::open_db`).
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl LocalCache for SqliteSnapshotCache {
    fn read_snapshot(&self, key: &str) -> CacheResult<Option<GameSnapshot>> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM snapshot_cache WHERE cache_key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(payload) => Ok(Some(GameSnapshot::from_json(&payload)?)),
            None => Ok(None),
        }
    }

    fn write_snapshot(&self, key: &str, snapshot: &GameSnapshot) -> CacheResult<()> {
        let payload = snapshot.to_json()?;
        self.conn.execute(
            "INSERT INTO snapshot_cache (cache_key, payload, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(cache_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![key, payload],
        )?;
        debug!(
            "event=cache_write module=repo status=ok key={key} bytes={}",
            payload.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{cache_key_for, LocalCache, SqliteSnapshotCache};
    use crate::db::open_db_in_memory;
    use crate::model::snapshot::GameSnapshot;

    #[test]
    fn unknown_key_reads_as_none() {
        let cache = SqliteSnapshotCache::new(open_db_in_memory().unwrap());
        assert!(cache.read_snapshot("state:nobody").unwrap().is_none());
    }

    #[test]
    fn write_replaces_previous_entry() {
        let cache = SqliteSnapshotCache::new(open_db_in_memory().unwrap());
        let key = cache_key_for("ana@example.com");

        let mut snapshot = GameSnapshot {
            points: 10,
            ..GameSnapshot::default()
        };
        cache.write_snapshot(&key, &snapshot).unwrap();
        snapshot.points = 25;
        cache.write_snapshot(&key, &snapshot).unwrap();

        let loaded = cache.read_snapshot(&key).unwrap().unwrap();
        assert_eq!(loaded.points, 25);
    }
}
