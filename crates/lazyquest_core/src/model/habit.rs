//! Habit record: a daily-reset routine item.

use crate::model::{new_record_id, Record, RecordId};
use serde::{Deserialize, Serialize};

/// Time-of-day bucket a habit is grouped under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: RecordId,
    pub title: String,
    pub points: u64,
    /// Reset to `false` on every day rollover.
    #[serde(default)]
    pub completed: bool,
    #[serde(rename = "type")]
    pub slot: TimeOfDay,
    /// Display-only window, e.g. `06:30 - 07:10`.
    #[serde(default)]
    pub reset_time: String,
    /// Informational flag; scoring ignores it.
    #[serde(default)]
    pub must_do: bool,
    /// Amount credited for today's completion; cleared by the daily reset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awarded_points: Option<u64>,
}

impl Habit {
    pub fn from_draft(draft: HabitDraft) -> Self {
        Self {
            id: new_record_id(),
            title: draft.title,
            points: draft.points,
            completed: false,
            slot: draft.slot,
            reset_time: draft.reset_time,
            must_do: draft.must_do,
            awarded_points: None,
        }
    }

    pub fn complete(&mut self) -> u64 {
        self.completed = true;
        self.awarded_points = Some(self.points);
        self.points
    }

    pub fn reopen(&mut self) -> u64 {
        self.completed = false;
        self.awarded_points.take().unwrap_or(self.points)
    }

    pub fn apply(&mut self, patch: HabitPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(points) = patch.points {
            self.points = points;
        }
        if let Some(slot) = patch.slot {
            self.slot = slot;
        }
        if let Some(reset_time) = patch.reset_time {
            self.reset_time = reset_time;
        }
        if let Some(must_do) = patch.must_do {
            self.must_do = must_do;
        }
    }
}

impl Record for Habit {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitDraft {
    pub title: String,
    pub points: u64,
    pub slot: TimeOfDay,
    pub reset_time: String,
    pub must_do: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitPatch {
    pub title: Option<String>,
    pub points: Option<u64>,
    pub slot: Option<TimeOfDay>,
    pub reset_time: Option<String>,
    pub must_do: Option<bool>,
}
