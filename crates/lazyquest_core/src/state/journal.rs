//! Journal operations.

use super::GameState;
use crate::events::EngineEvent;
use crate::model::journal::{JournalDay, JournalEntry};
use crate::model::RecordId;
use crate::store::{StoreError, StoreResult};
use chrono::{DateTime, Days, NaiveDate, Utc};

const STREAK_DAYS: u64 = 7;

impl GameState {
    /// Stores an entry and awards the journal bonus. There is no undo.
    pub fn save_journal_entry(
        &mut self,
        text: &str,
        has_audio: bool,
        now: DateTime<Utc>,
    ) -> StoreResult<RecordId> {
        let text = text.trim();
        if text.is_empty() && !has_audio {
            return Err(StoreError::EmptyText("journal text"));
        }

        let entry = JournalEntry::new(text, now, has_audio);
        let id = entry.id.clone();
        self.journal.push(entry);

        let points = self.rewards.journal_entry;
        self.credit(points);
        self.push_event(EngineEvent::JournalSaved {
            id: id.clone(),
            points,
        });
        Ok(id)
    }

    pub fn has_journal_on(&self, day: NaiveDate) -> bool {
        self.journal.iter().any(|entry| entry.day() == day)
    }

    /// Last seven days ending at `today`, oldest first.
    pub fn journal_week(&self, today: NaiveDate) -> Vec<JournalDay> {
        (0..STREAK_DAYS)
            .rev()
            .filter_map(|back| today.checked_sub_days(Days::new(back)))
            .map(|date| JournalDay {
                date,
                has_entry: self.has_journal_on(date),
                is_today: date == today,
            })
            .collect()
    }
}
