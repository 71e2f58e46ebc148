//! Full persisted state document.
//!
//! # Responsibility
//! - Define the one document shape exchanged with the remote store and the
//!   local cache.
//!
//! # Invariants
//! - Unknown/missing fields deserialize to defaults so older documents load.
//! - Field names follow the stored document convention (camelCase,
//!   `lifetimeXP`).

use crate::model::book::Book;
use crate::model::habit::Habit;
use crate::model::journal::JournalEntry;
use crate::model::task::Task;
use crate::model::wishlist::WishlistItem;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-day record of the all-tasks-complete bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBonus {
    pub day: NaiveDate,
    /// Set once the bonus was taken back by a same-day toggle-off.
    #[serde(default)]
    pub revoked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameSnapshot {
    pub points: u64,
    #[serde(rename = "lifetimeXP")]
    pub lifetime_xp: u64,
    pub tasks: Vec<Task>,
    pub habits: Vec<Habit>,
    pub books: Vec<Book>,
    pub wishlist: Vec<WishlistItem>,
    pub journal_entries: Vec<JournalEntry>,
    /// Day the rollover penalty was last evaluated for.
    pub last_evaluated_day: Option<NaiveDate>,
    pub daily_bonus: Option<DailyBonus>,
}

impl GameSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(payload: &str) -> serde_json::Result<Self> {
        serde_json::from_str(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::GameSnapshot;

    #[test]
    fn decodes_stored_document_shape() {
        let payload = r#"{
            "points": 420,
            "lifetimeXP": 1800,
            "tasks": [{
                "id": "1", "title": "Morning Run (5km)", "time": "30m", "points": 250,
                "completed": false, "date": "2025-03-01", "priority": "high"
            }],
            "habits": [{
                "id": "h1", "title": "Gym", "points": 30, "completed": true,
                "type": "morning", "resetTime": "08:30 - 10:30", "mustDo": false
            }],
            "books": [{
                "id": "b1", "title": "Dune", "author": "Frank Herbert", "totalPoints": 1000,
                "status": "reading", "deadline": "2025-12-31", "progress": 45,
                "totalPages": 800, "currentPage": 360
            }],
            "wishlist": [{ "id": "w1", "name": "Coffee", "cost": 50, "redeemed": true }]
        }"#;

        let snapshot = GameSnapshot::from_json(payload).unwrap();
        assert_eq!(snapshot.points, 420);
        assert_eq!(snapshot.lifetime_xp, 1800);
        assert_eq!(snapshot.tasks[0].duration, "30m");
        assert_eq!(snapshot.habits[0].reset_time, "08:30 - 10:30");
        assert_eq!(snapshot.books[0].current_page, 360);
        assert!(snapshot.wishlist[0].redeemed);
        assert!(snapshot.journal_entries.is_empty());
        assert_eq!(snapshot.last_evaluated_day, None);
    }

    #[test]
    fn encodes_wire_field_names() {
        let snapshot = GameSnapshot {
            points: 5,
            lifetime_xp: 7,
            ..GameSnapshot::default()
        };
        let json: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(json["lifetimeXP"], 7);
        assert_eq!(json["journalEntries"], serde_json::json!([]));
        assert_eq!(json["lastEvaluatedDay"], serde_json::Value::Null);
    }
}
