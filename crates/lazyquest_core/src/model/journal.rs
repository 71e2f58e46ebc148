//! Journal entry record.

use crate::model::{new_record_id, Record, RecordId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: RecordId,
    pub text: String,
    /// Serialized as `date` (RFC 3339) to match stored documents.
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub has_audio: bool,
}

impl JournalEntry {
    pub fn new(text: impl Into<String>, created_at: DateTime<Utc>, has_audio: bool) -> Self {
        Self {
            id: new_record_id(),
            text: text.into(),
            created_at,
            has_audio,
        }
    }

    /// Calendar day (UTC) the entry was written on.
    pub fn day(&self) -> NaiveDate {
        self.created_at.date_naive()
    }
}

impl Record for JournalEntry {
    fn id(&self) -> &str {
        &self.id
    }
}

/// One cell of the seven-day journal streak strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalDay {
    pub date: NaiveDate,
    pub has_entry: bool,
    pub is_today: bool,
}
