//! Output events for presentation layers (toasts, sounds, haptics).
//!
//! Core never performs side effects for these; it queues them and the host
//! drains the queue after each call.

use crate::model::RecordId;
use crate::state::rollover::PenaltyAssessment;
use crate::sync::state_sync::HydrationSource;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    TaskCompleted { id: RecordId, points: u64 },
    HabitCompleted { id: RecordId, points: u64 },
    BookFinished { id: RecordId, points: u64 },
    BookReopened { id: RecordId, points: u64 },
    ItemRedeemed { id: RecordId, cost: u64 },
    /// Redemption refused; `shortfall` more points are needed.
    InsufficientFunds { id: RecordId, shortfall: u64 },
    JournalSaved { id: RecordId, points: u64 },
    /// Every task dated `day` is complete.
    DayConquered { day: NaiveDate, bonus: u64 },
    DayBonusRevoked { day: NaiveDate, bonus: u64 },
    LevelUp { rank: &'static str },
    PenaltyApplied(PenaltyAssessment),
    /// Local cache write failed; raised once per session.
    StorageWarning { message: String },
    Hydrated { source: HydrationSource },
}
