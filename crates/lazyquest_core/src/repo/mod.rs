//! Persistence collaborators for game snapshots.
//!
//! # Responsibility
//! - Define the remote document store and local cache contracts.
//! - Provide SQLite-backed implementations of both.
//!
//! # Invariants
//! - Both stores exchange whole `GameSnapshot` documents, never partial rows.
//! - Implementations report failures; retry policy belongs to the caller.

pub mod remote_store;
pub mod snapshot_cache;
