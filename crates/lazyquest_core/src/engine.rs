//! Persistence-aware facade over [`GameState`].
//!
//! # Responsibility
//! - Drive the session lifecycle: hydrate, roll the day over, detach.
//! - Route every successful mutation through the synchronizer.
//! - Read time only through the injected [`Clock`].
//!
//! # Invariants
//! - A rejected operation (unknown id, invalid input) schedules no write.
//! - The rollover runs after each hydration, before any caller mutation.
//! - An evaluated rollover is flushed without waiting for the debounce.
//! - A rollover alone never saves defaults over a remote that failed to load.
//!
//! # See also
//! - crate::sync::state_sync for write gating and debounce.

use crate::clock::Clock;
use crate::config::{ConfigError, EngineConfig};
use crate::events::EngineEvent;
use crate::ledger::rank::{account_level, RankStanding};
use crate::model::book::{BookDraft, BookPatch};
use crate::model::habit::{HabitDraft, HabitPatch};
use crate::model::journal::JournalDay;
use crate::model::snapshot::GameSnapshot;
use crate::model::task::{TaskDraft, TaskPatch};
use crate::model::wishlist::{WishlistDraft, WishlistPatch};
use crate::model::RecordId;
use crate::repo::remote_store::{RemoteResult, RemoteStateStore};
use crate::repo::snapshot_cache::LocalCache;
use crate::service::score::{resolve_points, KeywordScoreSuggester, ScoreSuggester};
use crate::state::rollover::RolloverOutcome;
use crate::state::{BookProgress, DayOverview, GameState, Redemption};
use crate::store::StoreResult;
use crate::sync::calendar::{CalendarBridge, CalendarItemKind, CalendarSyncRequest};
use crate::sync::state_sync::{HydrationSource, SaveOutcome, StateSynchronizer, SyncPhase};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Session lifecycle errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// User id is blank.
    InvalidUserId,
    /// The load result does not belong to the hydration in flight.
    StaleHydration,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUserId => write!(f, "user id cannot be blank"),
            Self::StaleHydration => write!(f, "hydration result is stale"),
        }
    }
}

impl Error for SessionError {}

/// Opt-in calendar export details for a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarSchedule {
    pub kind: CalendarItemKind,
    pub scheduled_time: Option<String>,
    pub end_time: Option<String>,
}

pub struct GameEngine {
    config: EngineConfig,
    clock: Box<dyn Clock>,
    state: GameState,
    sync: StateSynchronizer,
    calendar: CalendarBridge,
    suggester: Box<dyn ScoreSuggester>,
}

impl GameEngine {
    /// Builds a detached engine holding default state.
    pub fn new(
        config: EngineConfig,
        clock: Box<dyn Clock>,
        remote: Box<dyn RemoteStateStore>,
        cache: Box<dyn LocalCache>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let sync = StateSynchronizer::new(remote, cache, &config.sync);
        Ok(Self {
            state: GameState::new(config.rewards.clone()),
            config,
            clock,
            sync,
            calendar: CalendarBridge::new(),
            suggester: Box::new(KeywordScoreSuggester),
        })
    }

    pub fn with_suggester(mut self, suggester: Box<dyn ScoreSuggester>) -> Self {
        self.suggester = suggester;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn phase(&self) -> SyncPhase {
        self.sync.phase()
    }

    pub fn calendar(&self) -> &CalendarBridge {
        &self.calendar
    }

    pub fn calendar_mut(&mut self) -> &mut CalendarBridge {
        &mut self.calendar
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.state.drain_events()
    }

    // Session lifecycle

    /// Loads the user's state and evaluates the current day.
    pub fn start_session(&mut self, user_id: &str) -> Result<HydrationSource, SessionError> {
        self.begin_session(user_id)?;
        let outcome = self.sync.load_remote();
        self.complete_hydration(user_id, outcome)
    }

    /// Enters `Hydrating` for `user_id`. Any pending write of the previous
    /// session is flushed first.
    pub fn begin_session(&mut self, user_id: &str) -> Result<(), SessionError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(SessionError::InvalidUserId);
        }
        self.flush();
        self.sync.begin_hydration(user_id);
        Ok(())
    }

    /// Issues the remote load for the session being hydrated.
    pub fn load_remote(&self) -> RemoteResult<Option<GameSnapshot>> {
        self.sync.load_remote()
    }

    /// Adopts a load result, then runs the day rollover.
    pub fn complete_hydration(
        &mut self,
        user_id: &str,
        outcome: RemoteResult<Option<GameSnapshot>>,
    ) -> Result<HydrationSource, SessionError> {
        let hydration = self
            .sync
            .finish_hydration(user_id.trim(), outcome)
            .ok_or(SessionError::StaleHydration)?;

        let rewards = self.config.rewards.clone();
        let mut state = match hydration.snapshot {
            Some(snapshot) => GameState::from_snapshot(snapshot, rewards),
            None => GameState::new(rewards),
        };
        state.merge_evaluated_day(hydration.cached_evaluated_day);
        for event in self.state.drain_events() {
            state.push_event(event);
        }
        state.push_event(EngineEvent::Hydrated {
            source: hydration.source,
        });
        self.state = state;

        self.refresh_day();
        Ok(hydration.source)
    }

    /// Flushes pending work, resets to defaults and detaches.
    pub fn end_session(&mut self) {
        self.flush();
        let pending = self.state.drain_events();
        self.state = GameState::new(self.config.rewards.clone());
        for event in pending {
            self.state.push_event(event);
        }
        self.sync.detach();
        info!("event=session_end module=engine status=ok");
    }

    /// Runs the day-boundary evaluation against the clock's current day.
    ///
    /// A no-op while hydrating; the rollover then runs when hydration ends.
    pub fn refresh_day(&mut self) -> Option<RolloverOutcome> {
        if self.sync.is_hydrating() {
            return None;
        }
        let today = self.clock.today();
        let outcome = self.state.roll_over_day(today, &self.config.penalties);
        if outcome.changed_state() {
            let snapshot = self.state.to_snapshot();
            let warning = self.sync.record_rollover(&snapshot, self.clock.now_ms());
            if let Some(message) = warning {
                self.state.push_event(EngineEvent::StorageWarning { message });
            }
            self.flush();
        }
        Some(outcome)
    }

    /// Fires the debounced save when due.
    pub fn poll(&mut self) -> Option<SaveOutcome> {
        let state = &self.state;
        self.sync.poll(self.clock.now_ms(), || state.to_snapshot())
    }

    /// Fires a pending save immediately.
    pub fn flush(&mut self) -> Option<SaveOutcome> {
        let state = &self.state;
        self.sync.flush(|| state.to_snapshot())
    }

    // Ledger views

    pub fn rank(&self) -> RankStanding {
        self.state.ledger().rank()
    }

    pub fn account_level(&self) -> u64 {
        account_level(self.state.ledger().lifetime_xp())
    }

    pub fn dismiss_level_up(&mut self) {
        self.state.dismiss_level_up();
    }

    /// Default point value for a new task titled `title`.
    pub fn suggest_points(&self, title: &str, explicit: Option<u64>) -> u64 {
        resolve_points(
            explicit,
            self.suggester.suggest(title),
            self.config.rewards.default_task_points,
        )
    }

    // Tasks

    pub fn add_task(&mut self, draft: TaskDraft, schedule: Option<CalendarSchedule>) -> RecordId {
        let request = schedule.map(|schedule| CalendarSyncRequest {
            title: draft.title.clone(),
            scheduled_time: schedule.scheduled_time,
            end_time: schedule.end_time,
            date: Some(draft.date),
            kind: schedule.kind,
            notes: draft.notes.clone(),
        });
        let id = self.state.add_task(draft);
        self.state.settle_day_bonus(self.clock.today());
        self.record_mutation();
        if let Some(request) = request {
            self.calendar.submit(&request);
        }
        id
    }

    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> StoreResult<()> {
        let result = self.state.update_task(id, patch);
        self.settle_if_ok(&result);
        self.commit("task_update", result)
    }

    pub fn remove_task(&mut self, id: &str) -> StoreResult<()> {
        let result = self.state.remove_task(id);
        self.settle_if_ok(&result);
        self.commit("task_remove", result)
    }

    pub fn toggle_task(&mut self, id: &str) -> StoreResult<bool> {
        let today = self.clock.today();
        let result = self.state.toggle_task(id, today);
        self.commit("task_toggle", result)
    }

    fn settle_if_ok(&mut self, result: &StoreResult<()>) {
        if result.is_ok() {
            self.state.settle_day_bonus(self.clock.today());
        }
    }

    pub fn today_overview(&self) -> DayOverview {
        self.state.day_overview(self.clock.today())
    }

    // Habits

    /// Adds a habit; `export` forwards it to the connected calendar as a
    /// recurring event.
    pub fn add_habit(&mut self, draft: HabitDraft, export: bool) -> RecordId {
        let request = export.then(|| CalendarSyncRequest {
            title: draft.title.clone(),
            scheduled_time: Some(draft.reset_time.clone()).filter(|value| !value.is_empty()),
            end_time: None,
            date: None,
            kind: CalendarItemKind::Event,
            notes: None,
        });
        let id = self.state.add_habit(draft);
        self.record_mutation();
        if let Some(request) = request {
            self.calendar.submit(&request);
        }
        id
    }

    pub fn update_habit(&mut self, id: &str, patch: HabitPatch) -> StoreResult<()> {
        let result = self.state.update_habit(id, patch);
        self.commit("habit_update", result)
    }

    pub fn remove_habit(&mut self, id: &str) -> StoreResult<()> {
        let result = self.state.remove_habit(id);
        self.commit("habit_remove", result)
    }

    pub fn toggle_habit(&mut self, id: &str) -> StoreResult<bool> {
        let result = self.state.toggle_habit(id);
        self.commit("habit_toggle", result)
    }

    // Books

    pub fn add_book(&mut self, draft: BookDraft) -> RecordId {
        let id = self.state.add_book(draft);
        self.record_mutation();
        id
    }

    pub fn update_book(&mut self, id: &str, patch: BookPatch) -> StoreResult<BookProgress> {
        let result = self.state.update_book(id, patch);
        self.commit("book_update", result)
    }

    pub fn remove_book(&mut self, id: &str) -> StoreResult<()> {
        let result = self.state.remove_book(id);
        self.commit("book_remove", result)
    }

    pub fn set_book_progress(&mut self, id: &str, page: u32) -> StoreResult<BookProgress> {
        let result = self.state.set_book_progress(id, page);
        self.commit("book_progress", result)
    }

    // Wishlist

    pub fn add_wishlist_item(&mut self, draft: WishlistDraft) -> RecordId {
        let id = self.state.add_wishlist_item(draft);
        self.record_mutation();
        id
    }

    pub fn update_wishlist_item(&mut self, id: &str, patch: WishlistPatch) -> StoreResult<()> {
        let result = self.state.update_wishlist_item(id, patch);
        self.commit("wishlist_update", result)
    }

    pub fn remove_wishlist_item(&mut self, id: &str) -> StoreResult<()> {
        let result = self.state.remove_wishlist_item(id);
        self.commit("wishlist_remove", result)
    }

    /// Only a completed redemption schedules a write.
    pub fn redeem(&mut self, id: &str) -> StoreResult<Redemption> {
        let result = self.state.redeem(id);
        if let Ok(Redemption::Redeemed { .. }) = result {
            self.record_mutation();
        }
        if let Err(err) = &result {
            warn!("event=redeem module=engine status=error error={err}");
        }
        result
    }

    // Journal

    pub fn save_journal_entry(&mut self, text: &str, has_audio: bool) -> StoreResult<RecordId> {
        let now = self.clock.now();
        let result = self.state.save_journal_entry(text, has_audio, now);
        self.commit("journal_save", result)
    }

    pub fn journal_week(&self) -> Vec<JournalDay> {
        self.state.journal_week(self.clock.today())
    }

    fn commit<T>(&mut self, op: &'static str, result: StoreResult<T>) -> StoreResult<T> {
        match result {
            Ok(value) => {
                self.record_mutation();
                Ok(value)
            }
            Err(err) => {
                warn!("event={op} module=engine status=error error={err}");
                Err(err)
            }
        }
    }

    fn record_mutation(&mut self) {
        if matches!(self.sync.phase(), SyncPhase::Detached | SyncPhase::Hydrating) {
            return;
        }
        let snapshot = self.state.to_snapshot();
        if let Some(message) = self.sync.record_mutation(&snapshot, self.clock.now_ms()) {
            self.state.push_event(EngineEvent::StorageWarning { message });
        }
    }
}
