//! Book record with page-derived progress.
//!
//! # Invariants
//! - `progress == round(current_page / total_pages * 100)` (0 when
//!   `total_pages == 0`).
//! - `status` is derived from `progress` and never set directly.
//! - `current_page` is clamped to `[0, total_pages]`.

use crate::model::{new_record_id, Record, RecordId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reading state derived from progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookStatus {
    #[default]
    NotStarted,
    Reading,
    Completed,
}

impl BookStatus {
    pub fn from_progress(progress: u8) -> Self {
        match progress {
            0 => Self::NotStarted,
            p if p >= 100 => Self::Completed,
            _ => Self::Reading,
        }
    }
}

/// Effect of a page change on the 100% boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    /// Moved from below 100% to exactly 100%.
    Finished,
    /// Moved from 100% back below it.
    Reopened,
    /// Stayed on the same side of the boundary.
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub author: String,
    /// Awarded once when the book reaches 100%.
    pub total_points: u64,
    #[serde(default)]
    pub status: BookStatus,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub progress: u8,
    pub total_pages: u32,
    #[serde(default)]
    pub current_page: u32,
    #[serde(rename = "image", default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    /// Amount credited when the book was finished; returned on reopen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awarded_points: Option<u64>,
}

impl Book {
    pub fn from_draft(draft: BookDraft) -> Self {
        Self {
            id: new_record_id(),
            title: draft.title,
            author: draft.author,
            total_points: draft.total_points,
            status: BookStatus::NotStarted,
            deadline: draft.deadline,
            progress: 0,
            total_pages: draft.total_pages,
            current_page: 0,
            cover: draft.cover,
            awarded_points: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == BookStatus::Completed
    }

    /// Moves the bookmark and reports whether the 100% boundary was crossed.
    pub fn set_page(&mut self, page: u32) -> Crossing {
        let was_complete = self.progress >= 100;
        self.current_page = page.min(self.total_pages);
        self.progress = progress_for(self.current_page, self.total_pages);
        self.status = BookStatus::from_progress(self.progress);

        match (was_complete, self.progress >= 100) {
            (false, true) => Crossing::Finished,
            (true, false) => Crossing::Reopened,
            _ => Crossing::Unchanged,
        }
    }

    /// Applies descriptive edits; page-dependent fields are recomputed and the
    /// resulting boundary crossing is reported.
    pub fn apply(&mut self, patch: BookPatch) -> Crossing {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(total_points) = patch.total_points {
            self.total_points = total_points;
        }
        if let Some(deadline) = patch.deadline {
            self.deadline = deadline;
        }
        if let Some(cover) = patch.cover {
            self.cover = cover;
        }
        if let Some(total_pages) = patch.total_pages {
            self.total_pages = total_pages;
        }
        self.set_page(self.current_page)
    }

    /// Re-derives `progress`/`status` from pages without reporting a crossing.
    ///
    /// Used on hydrated data whose derived fields may be stale.
    pub fn normalize(&mut self) {
        let _ = self.set_page(self.current_page);
    }
}

impl Record for Book {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Rounded percentage, half away from zero.
pub fn progress_for(page: u32, total_pages: u32) -> u8 {
    if total_pages == 0 {
        return 0;
    }
    let page = u64::from(page.min(total_pages));
    let total = u64::from(total_pages);
    let rounded = (page * 200 + total) / (total * 2);
    // page <= total, so rounded <= 100
    rounded as u8
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub total_points: u64,
    pub deadline: NaiveDate,
    pub total_pages: u32,
    pub cover: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub total_points: Option<u64>,
    pub deadline: Option<NaiveDate>,
    pub total_pages: Option<u32>,
    pub cover: Option<Option<String>>,
}
