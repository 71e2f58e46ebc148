//! Hydration-guarded, debounced write-through of game snapshots.
//!
//! # Responsibility
//! - Gate writes behind hydration so stale defaults never overwrite stored data.
//! - Coalesce bursts of mutations into one save after a quiet period.
//! - Keep a best-effort local cache copy after every mutation.
//!
//! # Invariants
//! - No save and no cache write is issued while `Hydrating`.
//! - Hydration always ends in `Idle`, whatever the load outcome.
//! - A failed save is not retried until the next mutation re-arms the timer.
//! - The storage warning is raised at most once per session.
//! - After a failed load with no cache, only a user mutation arms a save;
//!   rollover bookkeeping stays local so defaults never replace remote data.

use crate::config::SyncConfig;
use crate::model::snapshot::GameSnapshot;
use crate::repo::remote_store::{RemoteResult, RemoteStateStore};
use crate::repo::snapshot_cache::{cache_key_for, LocalCache};
use chrono::NaiveDate;
use log::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// No user session; nothing is persisted.
    Detached,
    /// Remote load in flight; writes suppressed.
    Hydrating,
    Idle,
    /// A save is armed for `due_at_ms`.
    WritePending { due_at_ms: i64 },
}

/// Where hydrated state came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationSource {
    Remote,
    LocalCache,
    Defaults,
}

/// Resolved hydration result handed back to the state owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hydration {
    pub source: HydrationSource,
    /// `None` means start from defaults.
    pub snapshot: Option<GameSnapshot>,
    /// Rollover marker found in the local cache, if any.
    pub cached_evaluated_day: Option<NaiveDate>,
}

/// Outcome of a save attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Failed,
}

pub struct StateSynchronizer {
    phase: SyncPhase,
    user_id: Option<String>,
    remote: Box<dyn RemoteStateStore>,
    cache: Box<dyn LocalCache>,
    debounce_ms: i64,
    storage_warned: bool,
    /// Set when hydration fell back to defaults after a load error.
    remote_unverified: bool,
}

impl StateSynchronizer {
    pub fn new(
        remote: Box<dyn RemoteStateStore>,
        cache: Box<dyn LocalCache>,
        config: &SyncConfig,
    ) -> Self {
        Self {
            phase: SyncPhase::Detached,
            user_id: None,
            remote,
            cache,
            debounce_ms: i64::try_from(config.debounce_ms).unwrap_or(i64::MAX),
            storage_warned: false,
            remote_unverified: false,
        }
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn is_hydrating(&self) -> bool {
        self.phase == SyncPhase::Hydrating
    }

    /// Enters `Hydrating` for `user_id`, dropping any armed timer.
    ///
    /// Callers flush the previous session first.
    pub fn begin_hydration(&mut self, user_id: &str) {
        info!("event=hydrate module=sync status=start");
        self.user_id = Some(user_id.to_string());
        self.phase = SyncPhase::Hydrating;
        self.storage_warned = false;
        self.remote_unverified = false;
    }

    /// Issues the remote load for the hydrating user.
    pub fn load_remote(&self) -> RemoteResult<Option<GameSnapshot>> {
        match self.user_id.as_deref() {
            Some(user_id) => self.remote.load_state(user_id),
            None => Ok(None),
        }
    }

    /// Resolves a load result into the state to adopt and moves to `Idle`.
    ///
    /// Returns `None` when no hydration for `user_id` is in flight (a stale
    /// result after logout or a user switch); the result is then discarded.
    pub fn finish_hydration(
        &mut self,
        user_id: &str,
        outcome: RemoteResult<Option<GameSnapshot>>,
    ) -> Option<Hydration> {
        if !self.is_hydrating() || self.user_id.as_deref() != Some(user_id) {
            warn!("event=hydrate module=sync status=skip reason=stale_result");
            return None;
        }

        let cached = self.read_cache(user_id);
        let cached_evaluated_day = cached
            .as_ref()
            .and_then(|snapshot| snapshot.last_evaluated_day);

        let hydration = match outcome {
            Ok(Some(snapshot)) => Hydration {
                source: HydrationSource::Remote,
                snapshot: Some(snapshot),
                cached_evaluated_day,
            },
            Ok(None) => {
                info!("event=hydrate module=sync status=ok reason=remote_not_found");
                fallback(cached, cached_evaluated_day)
            }
            Err(err) => {
                warn!("event=hydrate module=sync status=error fallback=local_cache error={err}");
                let hydration = fallback(cached, cached_evaluated_day);
                self.remote_unverified = hydration.source == HydrationSource::Defaults;
                hydration
            }
        };

        self.phase = SyncPhase::Idle;
        info!(
            "event=hydrate module=sync status=ok source={:?}",
            hydration.source
        );
        Some(hydration)
    }

    /// Records a committed mutation: refreshes the local cache and (re)arms
    /// the debounce timer.
    ///
    /// Returns a user-facing warning the first time the cache write fails in
    /// this session.
    pub fn record_mutation(&mut self, snapshot: &GameSnapshot, now_ms: i64) -> Option<String> {
        if !self.is_attached() {
            return None;
        }
        self.remote_unverified = false;
        let warning = self.write_cache(snapshot);
        self.arm(now_ms);
        warning
    }

    /// Records a state change made by the day rollover rather than the user.
    ///
    /// Behaves like [`Self::record_mutation`] unless the last load failed and
    /// fell back to defaults; then only the local cache is refreshed.
    pub fn record_rollover(&mut self, snapshot: &GameSnapshot, now_ms: i64) -> Option<String> {
        if !self.remote_unverified {
            return self.record_mutation(snapshot, now_ms);
        }
        if !self.is_attached() {
            return None;
        }
        info!("event=rollover_save module=sync status=skip reason=remote_unverified");
        self.write_cache(snapshot)
    }

    /// Fires the armed save once its quiet period has elapsed.
    pub fn poll(
        &mut self,
        now_ms: i64,
        snapshot: impl FnOnce() -> GameSnapshot,
    ) -> Option<SaveOutcome> {
        match self.phase {
            SyncPhase::WritePending { due_at_ms } if now_ms >= due_at_ms => {
                Some(self.save(&snapshot()))
            }
            _ => None,
        }
    }

    /// Fires an armed save immediately, ignoring the quiet period.
    pub fn flush(&mut self, snapshot: impl FnOnce() -> GameSnapshot) -> Option<SaveOutcome> {
        match self.phase {
            SyncPhase::WritePending { .. } => Some(self.save(&snapshot())),
            _ => None,
        }
    }

    /// Leaves the session. Any armed save must be flushed by the caller first.
    pub fn detach(&mut self) {
        if let SyncPhase::WritePending { .. } = self.phase {
            warn!("event=detach module=sync status=skip reason=unflushed_write");
        }
        self.phase = SyncPhase::Detached;
        self.user_id = None;
        self.storage_warned = false;
        self.remote_unverified = false;
    }

    fn is_attached(&self) -> bool {
        self.user_id.is_some()
            && matches!(self.phase, SyncPhase::Idle | SyncPhase::WritePending { .. })
    }

    fn arm(&mut self, now_ms: i64) {
        let due_at_ms = now_ms.saturating_add(self.debounce_ms);
        self.phase = SyncPhase::WritePending { due_at_ms };
        debug!("event=save_armed module=sync status=ok due_at_ms={due_at_ms}");
    }

    /// Best-effort cache write; returns the warning the first time it fails
    /// in this session.
    fn write_cache(&mut self, snapshot: &GameSnapshot) -> Option<String> {
        let key = cache_key_for(self.user_id.as_deref()?);
        match self.cache.write_snapshot(&key, snapshot) {
            Ok(()) => None,
            Err(err) => {
                warn!(
                    "event=cache_write module=sync status=error storage_full={} error={err}",
                    err.is_storage_full()
                );
                if self.storage_warned {
                    None
                } else {
                    self.storage_warned = true;
                    Some(format!("Progress could not be saved on this device: {err}"))
                }
            }
        }
    }

    fn save(&mut self, snapshot: &GameSnapshot) -> SaveOutcome {
        self.phase = SyncPhase::Idle;
        let Some(user_id) = self.user_id.as_deref() else {
            return SaveOutcome::Failed;
        };

        match self.remote.save_state(user_id, snapshot) {
            Ok(()) => {
                info!("event=remote_save module=sync status=ok");
                SaveOutcome::Saved
            }
            Err(err) => {
                warn!("event=remote_save module=sync status=error retry=next_mutation error={err}");
                SaveOutcome::Failed
            }
        }
    }

    fn read_cache(&self, user_id: &str) -> Option<GameSnapshot> {
        match self.cache.read_snapshot(&cache_key_for(user_id)) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("event=cache_read module=sync status=error error={err}");
                None
            }
        }
    }
}

fn fallback(cached: Option<GameSnapshot>, cached_evaluated_day: Option<NaiveDate>) -> Hydration {
    match cached {
        Some(snapshot) => Hydration {
            source: HydrationSource::LocalCache,
            snapshot: Some(snapshot),
            cached_evaluated_day,
        },
        None => Hydration {
            source: HydrationSource::Defaults,
            snapshot: None,
            cached_evaluated_day: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{HydrationSource, SaveOutcome, StateSynchronizer, SyncPhase};
    use crate::config::SyncConfig;
    use crate::db::open_db_in_memory;
    use crate::model::snapshot::GameSnapshot;
    use crate::repo::remote_store::{RemoteError, SqliteRemoteStore};
    use crate::repo::snapshot_cache::SqliteSnapshotCache;

    fn synchronizer() -> StateSynchronizer {
        StateSynchronizer::new(
            Box::new(SqliteRemoteStore::new(open_db_in_memory().unwrap())),
            Box::new(SqliteSnapshotCache::new(open_db_in_memory().unwrap())),
            &SyncConfig { debounce_ms: 1_000 },
        )
    }

    fn snapshot(points: u64) -> GameSnapshot {
        GameSnapshot {
            points,
            ..GameSnapshot::default()
        }
    }

    #[test]
    fn detached_and_hydrating_ignore_mutations() {
        let mut sync = synchronizer();
        assert_eq!(sync.record_mutation(&snapshot(1), 0), None);
        assert_eq!(sync.phase(), SyncPhase::Detached);

        sync.begin_hydration("u1");
        sync.record_mutation(&snapshot(1), 0);
        assert_eq!(sync.phase(), SyncPhase::Hydrating);
        assert_eq!(sync.poll(10_000, || snapshot(1)), None);
    }

    #[test]
    fn failed_load_without_cache_falls_back_to_defaults() {
        let mut sync = synchronizer();
        sync.begin_hydration("u1");
        let hydration = sync
            .finish_hydration("u1", Err(RemoteError::Unavailable("offline".into())))
            .unwrap();
        assert_eq!(hydration.source, HydrationSource::Defaults);
        assert_eq!(hydration.snapshot, None);
        assert_eq!(sync.phase(), SyncPhase::Idle);
    }

    #[test]
    fn failed_load_uses_cached_snapshot() {
        let mut sync = synchronizer();
        sync.begin_hydration("u1");
        sync.finish_hydration("u1", Ok(None)).unwrap();
        sync.record_mutation(&snapshot(42), 0);

        sync.begin_hydration("u1");
        let hydration = sync
            .finish_hydration("u1", Err(RemoteError::Unavailable("offline".into())))
            .unwrap();
        assert_eq!(hydration.source, HydrationSource::LocalCache);
        assert_eq!(hydration.snapshot.unwrap().points, 42);
    }

    #[test]
    fn stale_hydration_result_is_discarded() {
        let mut sync = synchronizer();
        sync.begin_hydration("u1");
        sync.begin_hydration("u2");
        assert!(sync.finish_hydration("u1", Ok(None)).is_none());
        assert!(sync.is_hydrating());
    }

    #[test]
    fn debounce_rearms_on_each_mutation() {
        let mut sync = synchronizer();
        sync.begin_hydration("u1");
        sync.finish_hydration("u1", Ok(None)).unwrap();

        sync.record_mutation(&snapshot(1), 0);
        sync.record_mutation(&snapshot(2), 800);
        assert_eq!(sync.poll(1_500, || snapshot(2)), None);
        assert_eq!(sync.poll(1_800, || snapshot(2)), Some(SaveOutcome::Saved));
        assert_eq!(sync.phase(), SyncPhase::Idle);
        assert_eq!(sync.poll(5_000, || snapshot(2)), None);
    }

    #[test]
    fn rollover_after_failed_load_stays_local_until_user_mutation() {
        let mut sync = synchronizer();
        sync.begin_hydration("u1");
        sync.finish_hydration("u1", Err(RemoteError::Unavailable("offline".into())))
            .unwrap();

        sync.record_rollover(&snapshot(0), 0);
        assert_eq!(sync.phase(), SyncPhase::Idle);
        assert_eq!(sync.flush(|| snapshot(0)), None);

        sync.record_mutation(&snapshot(5), 0);
        sync.record_rollover(&snapshot(5), 10);
        assert_eq!(
            sync.phase(),
            SyncPhase::WritePending { due_at_ms: 1_010 }
        );
    }

    #[test]
    fn flush_only_fires_an_armed_save() {
        let mut sync = synchronizer();
        sync.begin_hydration("u1");
        sync.finish_hydration("u1", Ok(None)).unwrap();
        assert_eq!(sync.flush(|| snapshot(0)), None);

        sync.record_mutation(&snapshot(3), 0);
        assert_eq!(sync.flush(|| snapshot(3)), Some(SaveOutcome::Saved));
    }
}
