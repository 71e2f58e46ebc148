//! Task record and its draft/patch inputs.

use crate::model::{new_record_id, Record, RecordId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Task urgency used for display ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

/// Dated, one-off unit of work worth a fixed number of points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: RecordId,
    pub title: String,
    /// Free-form estimate such as `30m` or `2h`.
    #[serde(rename = "time", default)]
    pub duration: String,
    pub points: u64,
    #[serde(default)]
    pub completed: bool,
    /// Calendar day the task belongs to.
    pub date: NaiveDate,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Amount credited when the task was completed; returned on un-complete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awarded_points: Option<u64>,
}

impl Task {
    /// Builds a new, not yet completed task from user input.
    pub fn from_draft(draft: TaskDraft) -> Self {
        Self {
            id: new_record_id(),
            title: draft.title,
            duration: draft.duration,
            points: draft.points,
            completed: false,
            date: draft.date,
            priority: draft.priority,
            notes: draft.notes,
            awarded_points: None,
        }
    }

    /// Marks the task complete and returns the amount to credit.
    pub fn complete(&mut self) -> u64 {
        self.completed = true;
        self.awarded_points = Some(self.points);
        self.points
    }

    /// Marks the task open again and returns the amount to take back.
    pub fn reopen(&mut self) -> u64 {
        self.completed = false;
        self.awarded_points.take().unwrap_or(self.points)
    }

    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(points) = patch.points {
            self.points = points;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }
}

impl Record for Task {
    fn id(&self) -> &str {
        &self.id
    }
}

/// User input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub duration: String,
    pub points: u64,
    pub date: NaiveDate,
    pub priority: Priority,
    pub notes: Option<String>,
}

/// Partial update for a task. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub duration: Option<String>,
    pub points: Option<u64>,
    pub date: Option<NaiveDate>,
    pub priority: Option<Priority>,
    /// `Some(None)` clears the notes.
    pub notes: Option<Option<String>>,
}
