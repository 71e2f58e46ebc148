//! Persistence write-through and outbound calendar export.

pub mod calendar;
pub mod state_sync;
