//! Domain model for tasks, habits, books, wishlist items and journal entries.
//!
//! # Responsibility
//! - Define the canonical records owned by the engine's entity stores.
//! - Keep the serialized shape compatible with the persisted snapshot format.
//!
//! # Invariants
//! - Every record is identified by a stable `RecordId` that is never reused.
//! - Completion/redemption/progress flags are only changed by engine
//!   operations; patches never carry them.
//!
//! # See also
//! - crate::model::snapshot for the persisted document shape.

pub mod book;
pub mod habit;
pub mod journal;
pub mod snapshot;
pub mod task;
pub mod wishlist;

use uuid::Uuid;

/// Stable identifier for every record held by an entity store.
///
/// Kept as an opaque string so ids minted by older clients stay readable.
pub type RecordId = String;

/// Mints a fresh record id.
pub fn new_record_id() -> RecordId {
    Uuid::new_v4().simple().to_string()
}

/// Common accessor used by the generic entity collection.
pub trait Record {
    fn id(&self) -> &str;
}
