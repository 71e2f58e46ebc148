//! Points/XP ledger and rank derivation.
//!
//! # Responsibility
//! - Own the spendable `points` balance and the `lifetime_xp` counter.
//! - Derive the current rank and raise a level-up notification on tier change.
//!
//! # Invariants
//! - `points` never goes below zero; neither does `lifetime_xp`.
//! - `deduct` lowers both counters at every call site, so any award followed by
//!   an equal deduction restores both exactly.
//! - Rank is always derived from `lifetime_xp`; it is never stored.

pub mod rank;

use rank::{rank_for, RankStanding};

/// Pending rank-up notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub new_rank: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    points: u64,
    lifetime_xp: u64,
    level_up: Option<LevelUp>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a ledger from persisted counters; no notification is pending.
    pub fn restore(points: u64, lifetime_xp: u64) -> Self {
        Self {
            points,
            lifetime_xp,
            level_up: None,
        }
    }

    pub fn points(&self) -> u64 {
        self.points
    }

    pub fn lifetime_xp(&self) -> u64 {
        self.lifetime_xp
    }

    pub fn rank(&self) -> RankStanding {
        rank_for(self.lifetime_xp)
    }

    pub fn level_up(&self) -> Option<LevelUp> {
        self.level_up
    }

    /// Adds `amount` to both counters.
    ///
    /// Returns the new notification when the rank name changed.
    pub fn award(&mut self, amount: u64) -> Option<LevelUp> {
        if amount == 0 {
            return None;
        }
        let before = rank_for(self.lifetime_xp);
        self.points = self.points.saturating_add(amount);
        self.lifetime_xp = self.lifetime_xp.saturating_add(amount);
        let after = rank_for(self.lifetime_xp);

        if before.name == after.name {
            return None;
        }
        let notice = LevelUp {
            new_rank: after.name,
        };
        self.level_up = Some(notice);
        Some(notice)
    }

    /// Subtracts `amount` from both counters, saturating at zero.
    pub fn deduct(&mut self, amount: u64) {
        self.points = self.points.saturating_sub(amount);
        self.lifetime_xp = self.lifetime_xp.saturating_sub(amount);
    }

    pub fn can_afford(&self, cost: u64) -> bool {
        self.points >= cost
    }

    /// Clears the pending notification. Idempotent.
    pub fn dismiss_level_up(&mut self) {
        self.level_up = None;
    }
}
