//! Task operations and the all-tasks-complete day bonus.

use super::GameState;
use crate::events::EngineEvent;
use crate::model::snapshot::DailyBonus;
use crate::model::task::{Task, TaskDraft, TaskPatch};
use crate::model::RecordId;
use crate::store::StoreResult;
use chrono::NaiveDate;
use log::debug;

/// Completion summary for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayOverview {
    pub date: NaiveDate,
    pub completed: usize,
    pub total: usize,
}

impl DayOverview {
    pub fn all_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

impl GameState {
    pub fn add_task(&mut self, draft: TaskDraft) -> RecordId {
        let task = Task::from_draft(draft);
        let id = task.id.clone();
        debug!("event=task_add module=state status=ok id={id} points={}", task.points);
        self.tasks.push(task);
        id
    }

    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> StoreResult<()> {
        self.tasks.require_mut(id)?.apply(patch);
        Ok(())
    }

    pub fn remove_task(&mut self, id: &str) -> StoreResult<()> {
        self.tasks.remove(id).map(|_| ())
    }

    /// Flips completion and applies the matching award or deduction.
    ///
    /// Returns the new completion state.
    pub fn toggle_task(&mut self, id: &str, today: NaiveDate) -> StoreResult<bool> {
        let task = self.tasks.require_mut(id)?;
        let date = task.date;
        let completed = if task.completed {
            let refund = task.reopen();
            self.debit(refund);
            false
        } else {
            let points = task.complete();
            self.credit(points);
            self.push_event(EngineEvent::TaskCompleted {
                id: id.to_string(),
                points,
            });
            true
        };

        if date == today {
            self.settle_day_bonus(today);
        }
        Ok(completed)
    }

    pub fn day_overview(&self, date: NaiveDate) -> DayOverview {
        let (completed, total) = self
            .tasks
            .iter()
            .filter(|task| task.date == date)
            .fold((0, 0), |(done, total), task| {
                (done + usize::from(task.completed), total + 1)
            });
        DayOverview {
            date,
            completed,
            total,
        }
    }

    /// Grants the bonus the first time today's tasks are all complete and takes
    /// it back once if they stop being complete the same day.
    ///
    /// Idempotent; called whenever today's task set or completion changes.
    pub(crate) fn settle_day_bonus(&mut self, today: NaiveDate) {
        let all_complete = self.day_overview(today).all_complete();
        let bonus = self.rewards.day_complete;
        let current = self.daily_bonus.filter(|record| record.day == today);

        match (all_complete, current) {
            (true, None) => {
                self.daily_bonus = Some(DailyBonus {
                    day: today,
                    revoked: false,
                });
                self.credit(bonus);
                self.push_event(EngineEvent::DayConquered { day: today, bonus });
            }
            (false, Some(record)) if !record.revoked => {
                self.daily_bonus = Some(DailyBonus {
                    day: today,
                    revoked: true,
                });
                self.debit(bonus);
                self.push_event(EngineEvent::DayBonusRevoked { day: today, bonus });
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::RewardConfig;
    use crate::events::EngineEvent;
    use crate::model::task::{Priority, TaskDraft, TaskPatch};
    use crate::state::GameState;
    use crate::store::StoreError;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn draft(points: u64, date: NaiveDate) -> TaskDraft {
        TaskDraft {
            title: "Deep Work Session".to_string(),
            duration: "2h".to_string(),
            points,
            date,
            priority: Priority::Medium,
            notes: None,
        }
    }

    #[test]
    fn toggle_awards_then_reverses() {
        let mut state = GameState::new(RewardConfig::default());
        let first = state.add_task(draft(250, day(1)));
        state.add_task(draft(100, day(1)));

        assert!(state.toggle_task(&first, day(1)).unwrap());
        assert_eq!(state.ledger().points(), 250);
        assert_eq!(state.ledger().lifetime_xp(), 250);

        assert!(!state.toggle_task(&first, day(1)).unwrap());
        assert_eq!(state.ledger().points(), 0);
        assert_eq!(state.ledger().lifetime_xp(), 0);
    }

    #[test]
    fn completing_the_day_grants_bonus_once() {
        let mut state = GameState::new(RewardConfig::default());
        let only = state.add_task(draft(100, day(1)));

        state.toggle_task(&only, day(1)).unwrap();
        assert_eq!(state.ledger().points(), 600);
        assert!(state
            .drain_events()
            .contains(&EngineEvent::DayConquered {
                day: day(1),
                bonus: 500
            }));

        state.toggle_task(&only, day(1)).unwrap();
        assert_eq!(state.ledger().points(), 0);

        state.toggle_task(&only, day(1)).unwrap();
        assert_eq!(state.ledger().points(), 100);
        assert!(state.daily_bonus().unwrap().revoked);
    }

    #[test]
    fn tasks_from_other_days_do_not_touch_bonus() {
        let mut state = GameState::new(RewardConfig::default());
        let old = state.add_task(draft(40, day(1)));
        state.toggle_task(&old, day(2)).unwrap();
        assert_eq!(state.ledger().points(), 40);
        assert_eq!(state.daily_bonus(), None);
    }

    #[test]
    fn update_merges_fields_and_reports_missing_ids() {
        let mut state = GameState::new(RewardConfig::default());
        let id = state.add_task(draft(10, day(1)));
        state
            .update_task(
                &id,
                TaskPatch {
                    points: Some(75),
                    notes: Some(Some("bring laptop".to_string())),
                    ..TaskPatch::default()
                },
            )
            .unwrap();
        let task = &state.tasks()[0];
        assert_eq!(task.points, 75);
        assert_eq!(task.title, "Deep Work Session");
        assert_eq!(task.notes.as_deref(), Some("bring laptop"));

        let err = state.update_task("missing", TaskPatch::default()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn reopening_refunds_the_credited_amount_after_a_points_edit() {
        let mut state = GameState::new(RewardConfig::default());
        let id = state.add_task(draft(300, day(1)));
        state.toggle_task(&id, day(5)).unwrap();
        state
            .update_task(
                &id,
                TaskPatch {
                    points: Some(20),
                    ..TaskPatch::default()
                },
            )
            .unwrap();

        state.toggle_task(&id, day(5)).unwrap();
        assert_eq!(state.ledger().points(), 0);
        assert_eq!(state.tasks()[0].awarded_points, None);

        state.toggle_task(&id, day(5)).unwrap();
        assert_eq!(state.ledger().points(), 20);
    }

    #[test]
    fn overview_counts_only_the_requested_day() {
        let mut state = GameState::new(RewardConfig::default());
        let a = state.add_task(draft(10, day(1)));
        state.add_task(draft(10, day(1)));
        state.add_task(draft(10, day(2)));
        state.toggle_task(&a, day(5)).unwrap();

        let overview = state.day_overview(day(1));
        assert_eq!((overview.completed, overview.total), (1, 2));
        assert!(!overview.all_complete());
        assert!(!state.day_overview(day(9)).all_complete());
    }
}
