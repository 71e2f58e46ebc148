//! Habit operations.

use super::GameState;
use crate::events::EngineEvent;
use crate::model::habit::{Habit, HabitDraft, HabitPatch, TimeOfDay};
use crate::model::RecordId;
use crate::store::StoreResult;

impl GameState {
    pub fn add_habit(&mut self, draft: HabitDraft) -> RecordId {
        let habit = Habit::from_draft(draft);
        let id = habit.id.clone();
        self.habits.push(habit);
        id
    }

    pub fn update_habit(&mut self, id: &str, patch: HabitPatch) -> StoreResult<()> {
        self.habits.require_mut(id)?.apply(patch);
        Ok(())
    }

    pub fn remove_habit(&mut self, id: &str) -> StoreResult<()> {
        self.habits.remove(id).map(|_| ())
    }

    pub fn toggle_habit(&mut self, id: &str) -> StoreResult<bool> {
        let habit = self.habits.require_mut(id)?;
        if habit.completed {
            let refund = habit.reopen();
            self.debit(refund);
            return Ok(false);
        }

        let points = habit.complete();
        self.credit(points);
        self.push_event(EngineEvent::HabitCompleted {
            id: id.to_string(),
            points,
        });
        Ok(true)
    }

    pub fn habits_in(&self, slot: TimeOfDay) -> Vec<&Habit> {
        self.habits.iter().filter(|habit| habit.slot == slot).collect()
    }

    /// Clears every habit's completion flag. No ledger effect.
    pub(crate) fn reset_habits(&mut self) {
        for habit in self.habits.iter_mut() {
            habit.completed = false;
            habit.awarded_points = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::RewardConfig;
    use crate::model::habit::{HabitDraft, TimeOfDay};
    use crate::state::GameState;

    fn draft(title: &str, points: u64, slot: TimeOfDay) -> HabitDraft {
        HabitDraft {
            title: title.to_string(),
            points,
            slot,
            reset_time: "06:30 - 07:10".to_string(),
            must_do: false,
        }
    }

    #[test]
    fn must_do_does_not_change_scoring() {
        let mut state = GameState::new(RewardConfig::default());
        let mut critical = draft("Wake up at 6:30", 10, TimeOfDay::Morning);
        critical.must_do = true;
        let id = state.add_habit(critical);

        state.toggle_habit(&id).unwrap();
        assert_eq!(state.ledger().points(), 10);
        state.toggle_habit(&id).unwrap();
        assert_eq!(state.ledger().points(), 0);
        assert_eq!(state.ledger().lifetime_xp(), 0);
    }

    #[test]
    fn habits_group_by_slot() {
        let mut state = GameState::new(RewardConfig::default());
        state.add_habit(draft("Gym", 30, TimeOfDay::Morning));
        state.add_habit(draft("Review Day", 20, TimeOfDay::Evening));
        state.add_habit(draft("Pack Bag", 10, TimeOfDay::Evening));

        assert_eq!(state.habits_in(TimeOfDay::Evening).len(), 2);
        assert!(state.habits_in(TimeOfDay::Night).is_empty());
    }

    #[test]
    fn reset_clears_completion_without_refund() {
        let mut state = GameState::new(RewardConfig::default());
        let id = state.add_habit(draft("Shower", 5, TimeOfDay::Morning));
        state.toggle_habit(&id).unwrap();
        state.reset_habits();
        assert!(!state.habits()[0].completed);
        assert_eq!(state.habits()[0].awarded_points, None);
        assert_eq!(state.ledger().points(), 5);
    }
}
