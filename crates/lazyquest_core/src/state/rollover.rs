//! Day-boundary evaluation: missed-work penalties and the daily habit reset.
//!
//! # Responsibility
//! - Detect a new calendar day against the persisted `last_evaluated_day`.
//! - Assess and apply the penalty total, reset habits, advance the marker.
//!
//! # Invariants
//! - At most one evaluation per calendar day; the marker, not process memory,
//!   is the guard, so a reload on the same day never re-applies a penalty.
//! - Assessment and application run as one step with no suspension point.
//! - The first evaluation ever only records the marker.

use super::GameState;
use crate::config::PenaltyConfig;
use crate::events::EngineEvent;
use chrono::{Days, NaiveDate};
use log::{info, warn};

/// Itemized penalty for one day boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PenaltyAssessment {
    /// Day the evaluation ran for.
    pub day: NaiveDate,
    pub missed_tasks: usize,
    pub missed_habits: usize,
    pub overdue_books: usize,
    pub missed_journal: bool,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RolloverOutcome {
    /// No marker existed; it now records `today`.
    FirstDay,
    /// `today` was already evaluated.
    AlreadyEvaluated,
    /// The marker was ahead of `today`; it was pulled back without penalty.
    ClockRewound { marker: NaiveDate },
    Evaluated(PenaltyAssessment),
}

impl RolloverOutcome {
    pub fn changed_state(&self) -> bool {
        !matches!(self, Self::AlreadyEvaluated)
    }
}

/// Computes the penalty owed at the boundary into `today` without mutating.
pub fn assess(state: &GameState, today: NaiveDate, penalties: &PenaltyConfig) -> PenaltyAssessment {
    let missed_tasks = state
        .tasks()
        .iter()
        .filter(|task| !task.completed && task.date < today)
        .count();
    let missed_habits = state.habits().iter().filter(|habit| !habit.completed).count();
    let overdue_books = state
        .books()
        .iter()
        .filter(|book| !book.is_completed() && book.deadline < today)
        .count();
    let missed_journal = match today.checked_sub_days(Days::new(1)) {
        Some(yesterday) => !state.has_journal_on(yesterday),
        None => false,
    };

    let total = per_item(missed_tasks, penalties.missed_task)
        + per_item(missed_habits, penalties.missed_habit)
        + per_item(overdue_books, penalties.overdue_book)
        + if missed_journal {
            penalties.missed_journal
        } else {
            0
        };

    PenaltyAssessment {
        day: today,
        missed_tasks,
        missed_habits,
        overdue_books,
        missed_journal,
        total,
    }
}

fn per_item(count: usize, amount: u64) -> u64 {
    (count as u64).saturating_mul(amount)
}

impl GameState {
    /// Runs the day-boundary evaluation if `today` has not been evaluated.
    pub fn roll_over_day(&mut self, today: NaiveDate, penalties: &PenaltyConfig) -> RolloverOutcome {
        let marker = match self.last_evaluated_day {
            None => {
                self.last_evaluated_day = Some(today);
                info!("event=day_rollover module=state status=ok kind=first_day day={today}");
                return RolloverOutcome::FirstDay;
            }
            Some(marker) => marker,
        };

        if marker == today {
            return RolloverOutcome::AlreadyEvaluated;
        }
        if marker > today {
            warn!("event=day_rollover module=state status=skip reason=clock_rewound marker={marker} day={today}");
            self.last_evaluated_day = Some(today);
            return RolloverOutcome::ClockRewound { marker };
        }

        let assessment = assess(self, today, penalties);
        if assessment.total > 0 {
            self.debit(assessment.total);
        }
        self.reset_habits();
        self.last_evaluated_day = Some(today);

        info!(
            "event=day_rollover module=state status=ok kind=evaluated day={today} previous={marker} tasks={} habits={} books={} journal_missed={} total={}",
            assessment.missed_tasks,
            assessment.missed_habits,
            assessment.overdue_books,
            assessment.missed_journal,
            assessment.total
        );
        self.push_event(EngineEvent::PenaltyApplied(assessment.clone()));
        RolloverOutcome::Evaluated(assessment)
    }
}
