//! Recording persistence doubles shared by the integration tests.
#![allow(dead_code)]

use chrono::NaiveDate;
use lazyquest_core::db::DbError;
use lazyquest_core::repo::remote_store::RemoteResult;
use lazyquest_core::repo::snapshot_cache::CacheResult;
use lazyquest_core::{
    CacheError, EngineConfig, GameEngine, GameSnapshot, LocalCache, ManualClock, RemoteError,
    RemoteStateStore,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Ordered record of persistence calls, e.g. `remote.load`, `cache.write`.
pub type CallLog = Rc<RefCell<Vec<&'static str>>>;

pub fn call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn count(log: &CallLog, call: &str) -> usize {
    log.borrow().iter().filter(|entry| **entry == call).count()
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[derive(Default)]
struct RemoteInner {
    stored: RefCell<HashMap<String, GameSnapshot>>,
    fail_loads: Cell<bool>,
    fail_saves: Cell<bool>,
}

#[derive(Clone)]
pub struct RecordingRemote {
    log: CallLog,
    inner: Rc<RemoteInner>,
}

impl RecordingRemote {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            inner: Rc::new(RemoteInner::default()),
        }
    }

    pub fn seed(&self, user_id: &str, snapshot: GameSnapshot) {
        self.inner
            .stored
            .borrow_mut()
            .insert(user_id.to_string(), snapshot);
    }

    pub fn stored(&self, user_id: &str) -> Option<GameSnapshot> {
        self.inner.stored.borrow().get(user_id).cloned()
    }

    pub fn fail_loads(&self, fail: bool) {
        self.inner.fail_loads.set(fail);
    }

    pub fn fail_saves(&self, fail: bool) {
        self.inner.fail_saves.set(fail);
    }
}

impl RemoteStateStore for RecordingRemote {
    fn load_state(&self, user_id: &str) -> RemoteResult<Option<GameSnapshot>> {
        self.log.borrow_mut().push("remote.load");
        if self.inner.fail_loads.get() {
            return Err(RemoteError::Unavailable("network down".to_string()));
        }
        Ok(self.stored(user_id))
    }

    fn save_state(&self, user_id: &str, snapshot: &GameSnapshot) -> RemoteResult<()> {
        self.log.borrow_mut().push("remote.save");
        if self.inner.fail_saves.get() {
            return Err(RemoteError::Unavailable("network down".to_string()));
        }
        self.seed(user_id, snapshot.clone());
        Ok(())
    }
}

#[derive(Default)]
struct CacheInner {
    stored: RefCell<HashMap<String, GameSnapshot>>,
    full: Cell<bool>,
}

#[derive(Clone)]
pub struct RecordingCache {
    log: CallLog,
    inner: Rc<CacheInner>,
}

impl RecordingCache {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            inner: Rc::new(CacheInner::default()),
        }
    }

    pub fn seed(&self, key: &str, snapshot: GameSnapshot) {
        self.inner
            .stored
            .borrow_mut()
            .insert(key.to_string(), snapshot);
    }

    pub fn stored(&self, key: &str) -> Option<GameSnapshot> {
        self.inner.stored.borrow().get(key).cloned()
    }

    /// Makes every write fail as if the device were out of space.
    pub fn fill_up(&self) {
        self.inner.full.set(true);
    }
}

impl LocalCache for RecordingCache {
    fn read_snapshot(&self, key: &str) -> CacheResult<Option<GameSnapshot>> {
        self.log.borrow_mut().push("cache.read");
        Ok(self.stored(key))
    }

    fn write_snapshot(&self, key: &str, snapshot: &GameSnapshot) -> CacheResult<()> {
        self.log.borrow_mut().push("cache.write");
        if self.inner.full.get() {
            let full = rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_FULL),
                Some("database or disk is full".to_string()),
            );
            return Err(CacheError::Db(DbError::Sqlite(full)));
        }
        self.seed(key, snapshot.clone());
        Ok(())
    }
}

pub struct Harness {
    pub log: CallLog,
    pub clock: Rc<ManualClock>,
    pub remote: RecordingRemote,
    pub cache: RecordingCache,
}

impl Harness {
    pub fn at(today: NaiveDate) -> Self {
        let log = call_log();
        Self {
            clock: Rc::new(ManualClock::at_day(today)),
            remote: RecordingRemote::new(&log),
            cache: RecordingCache::new(&log),
            log,
        }
    }

    pub fn engine(&self) -> GameEngine {
        GameEngine::new(
            EngineConfig::default(),
            Box::new(self.clock.clone()),
            Box::new(self.remote.clone()),
            Box::new(self.cache.clone()),
        )
        .unwrap()
    }

    pub fn clear_log(&self) {
        self.log.borrow_mut().clear();
    }
}
