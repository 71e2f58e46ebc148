//! Process-wide game state container.
//!
//! # Responsibility
//! - Own the ledger, all entity collections and the per-day markers.
//! - Apply every mutation together with its ledger effect as one step.
//!
//! # Invariants
//! - Point changes happen only through completion toggles, book boundary
//!   crossings, redemptions, journal saves, the day bonus and rollover
//!   penalties.
//! - State is plain data: no I/O, no clock reads. Callers pass `today`/`now`.
//!
//! # See also
//! - crate::engine for the persistence-aware wrapper.

mod books;
mod habits;
mod journal;
pub mod rollover;
mod tasks;
mod wishlist;

pub use books::BookProgress;
pub use tasks::DayOverview;
pub use wishlist::Redemption;

use crate::config::RewardConfig;
use crate::events::EngineEvent;
use crate::ledger::Ledger;
use crate::model::book::Book;
use crate::model::habit::Habit;
use crate::model::journal::JournalEntry;
use crate::model::snapshot::{DailyBonus, GameSnapshot};
use crate::model::task::Task;
use crate::model::wishlist::WishlistItem;
use crate::store::Collection;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    ledger: Ledger,
    tasks: Collection<Task>,
    habits: Collection<Habit>,
    books: Collection<Book>,
    wishlist: Collection<WishlistItem>,
    journal: Collection<JournalEntry>,
    last_evaluated_day: Option<NaiveDate>,
    daily_bonus: Option<DailyBonus>,
    rewards: RewardConfig,
    outbox: Vec<EngineEvent>,
}

impl GameState {
    pub fn new(rewards: RewardConfig) -> Self {
        Self {
            ledger: Ledger::new(),
            tasks: Collection::new("task"),
            habits: Collection::new("habit"),
            books: Collection::new("book"),
            wishlist: Collection::new("wishlist item"),
            journal: Collection::new("journal entry"),
            last_evaluated_day: None,
            daily_bonus: None,
            rewards,
            outbox: Vec::new(),
        }
    }

    /// Rebuilds state wholesale from a persisted document.
    ///
    /// Book progress/status are re-derived from pages; no ledger effect.
    pub fn from_snapshot(snapshot: GameSnapshot, rewards: RewardConfig) -> Self {
        let mut books = snapshot.books;
        for book in &mut books {
            book.normalize();
        }

        Self {
            ledger: Ledger::restore(snapshot.points, snapshot.lifetime_xp),
            tasks: Collection::from_records("task", snapshot.tasks),
            habits: Collection::from_records("habit", snapshot.habits),
            books: Collection::from_records("book", books),
            wishlist: Collection::from_records("wishlist item", snapshot.wishlist),
            journal: Collection::from_records("journal entry", snapshot.journal_entries),
            last_evaluated_day: snapshot.last_evaluated_day,
            daily_bonus: snapshot.daily_bonus,
            rewards,
            outbox: Vec::new(),
        }
    }

    pub fn to_snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            points: self.ledger.points(),
            lifetime_xp: self.ledger.lifetime_xp(),
            tasks: self.tasks.to_vec(),
            habits: self.habits.to_vec(),
            books: self.books.to_vec(),
            wishlist: self.wishlist.to_vec(),
            journal_entries: self.journal.to_vec(),
            last_evaluated_day: self.last_evaluated_day,
            daily_bonus: self.daily_bonus,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.as_slice()
    }

    pub fn habits(&self) -> &[Habit] {
        self.habits.as_slice()
    }

    pub fn books(&self) -> &[Book] {
        self.books.as_slice()
    }

    pub fn wishlist(&self) -> &[WishlistItem] {
        self.wishlist.as_slice()
    }

    pub fn journal_entries(&self) -> &[JournalEntry] {
        self.journal.as_slice()
    }

    pub fn last_evaluated_day(&self) -> Option<NaiveDate> {
        self.last_evaluated_day
    }

    pub fn daily_bonus(&self) -> Option<DailyBonus> {
        self.daily_bonus
    }

    /// Keeps the later of the held marker and `other`.
    pub(crate) fn merge_evaluated_day(&mut self, other: Option<NaiveDate>) {
        self.last_evaluated_day = self.last_evaluated_day.max(other);
    }

    pub fn dismiss_level_up(&mut self) {
        self.ledger.dismiss_level_up();
    }

    pub(crate) fn push_event(&mut self, event: EngineEvent) {
        self.outbox.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Awards `amount` and queues a level-up event on tier change.
    fn credit(&mut self, amount: u64) {
        if let Some(notice) = self.ledger.award(amount) {
            self.outbox.push(EngineEvent::LevelUp {
                rank: notice.new_rank,
            });
        }
    }

    fn debit(&mut self, amount: u64) {
        self.ledger.deduct(amount);
    }
}
