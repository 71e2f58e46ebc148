//! Stateless helper services consumed by the engine.
//!
//! # See also
//! - crate::engine::GameEngine::suggest_points

pub mod score;
