//! Gamification state engine for LazyQuest.
//! This crate is the single source of truth for ledger and store invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod engine;
pub mod events;
pub mod ledger;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod state;
pub mod store;
pub mod sync;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, EngineConfig};
pub use engine::{CalendarSchedule, GameEngine, SessionError};
pub use events::EngineEvent;
pub use ledger::rank::{account_level, rank_for, RankStanding};
pub use ledger::Ledger;
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::snapshot::GameSnapshot;
pub use repo::remote_store::{RemoteError, RemoteStateStore, SqliteRemoteStore};
pub use repo::snapshot_cache::{CacheError, LocalCache, SqliteSnapshotCache};
pub use state::{GameState, Redemption};
pub use store::{StoreError, StoreResult};
pub use sync::state_sync::{HydrationSource, SaveOutcome, SyncPhase};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
