//! Remote state store contract and a SQLite document-store implementation.
//!
//! # Responsibility
//! - Load and save one whole snapshot document per user.
//!
//! # Invariants
//! - `load_state` of an unknown user is `Ok(None)` (not-found), not an error.
//! - `save_state` replaces the stored document; repeating it is harmless.

use crate::db::DbError;
use crate::model::snapshot::GameSnapshot;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RemoteResult<T> = Result<T, RemoteError>;

#[derive(Debug)]
pub enum RemoteError {
    /// Service could not be reached or timed out.
    Unavailable(String),
    /// Service answered but refused the request.
    Rejected(String),
    /// Stored document could not be decoded.
    InvalidPayload(serde_json::Error),
    Db(DbError),
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "state service unavailable: {message}"),
            Self::Rejected(message) => write!(f, "state service rejected request: {message}"),
            Self::InvalidPayload(err) => write!(f, "invalid state document: {err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RemoteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPayload(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Unavailable(_) | Self::Rejected(_) => None,
        }
    }
}

impl From<rusqlite::Error> for RemoteError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidPayload(value)
    }
}

/// Load/save-by-user document store.
pub trait RemoteStateStore {
    fn load_state(&self, user_id: &str) -> RemoteResult<Option<GameSnapshot>>;
    fn save_state(&self, user_id: &str, snapshot: &GameSnapshot) -> RemoteResult<()>;
}

/// Document-per-user store over the `user_state` table.
pub struct SqliteRemoteStore {
    conn: Connection,
}

impl SqliteRemoteStore {
    /// Wraps a migrated connection (see `db::open_db`).
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Number of saves accepted for `user_id`.
    pub fn revision(&self, user_id: &str) -> RemoteResult<Option<u64>> {
        let revision = self
            .conn
            .query_row(
                "SELECT revision FROM user_state WHERE user_id = ?1;",
                [user_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(revision.map(|value| value.max(0) as u64))
    }
}

impl RemoteStateStore for SqliteRemoteStore {
    fn load_state(&self, user_id: &str) -> RemoteResult<Option<GameSnapshot>> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM user_state WHERE user_id = ?1;",
                [user_id],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(payload) => Ok(Some(GameSnapshot::from_json(&payload)?)),
            None => Ok(None),
        }
    }

    fn save_state(&self, user_id: &str, snapshot: &GameSnapshot) -> RemoteResult<()> {
        if user_id.trim().is_empty() {
            return Err(RemoteError::Rejected("user id is required".to_string()));
        }

        let payload = snapshot.to_json()?;
        self.conn.execute(
            "INSERT INTO user_state (user_id, payload, revision, updated_at)
             VALUES (?1, ?2, 1, (strftime('%s', 'now') * 1000))
             ON CONFLICT(user_id) DO UPDATE SET
                payload = excluded.payload,
                revision = user_state.revision + 1,
                updated_at = excluded.updated_at;",
            params![user_id, payload],
        )?;
        debug!("event=remote_save module=repo status=ok bytes={}", payload.len());
        Ok(())
    }
}
