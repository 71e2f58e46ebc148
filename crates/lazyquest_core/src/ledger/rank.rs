//! Static rank table and lifetime-XP lookups.
//!
//! # Invariants
//! - `RANK_TABLE` is ordered by strictly increasing `min_xp` and starts at 0.
//! - The last tier has no upper bound.

/// One named progression tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankTier {
    pub name: &'static str,
    pub min_xp: u64,
}

const fn tier(name: &'static str, min_xp: u64) -> RankTier {
    RankTier { name, min_xp }
}

pub const RANK_TABLE: &[RankTier] = &[
    tier("Iron 1", 0),
    tier("Iron 2", 500),
    tier("Iron 3", 1_000),
    tier("Bronze 1", 1_500),
    tier("Bronze 2", 2_500),
    tier("Bronze 3", 3_500),
    tier("Silver 1", 5_000),
    tier("Silver 2", 6_000),
    tier("Silver 3", 7_000),
    tier("Gold 1", 8_500),
    tier("Gold 2", 10_000),
    tier("Gold 3", 11_500),
    tier("Platinum 1", 13_500),
    tier("Platinum 2", 15_500),
    tier("Platinum 3", 17_500),
    tier("Diamond 1", 20_000),
    tier("Diamond 2", 23_000),
    tier("Diamond 3", 26_000),
    tier("Ascendant 1", 30_000),
    tier("Ascendant 2", 35_000),
    tier("Ascendant 3", 40_000),
    tier("Immortal 1", 50_000),
    tier("Immortal 2", 60_000),
    tier("Immortal 3", 70_000),
    tier("Radiant", 80_000),
];

const XP_PER_LEVEL: u64 = 1_000;

/// Rank position derived from a lifetime-XP value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankStanding {
    /// Index into `RANK_TABLE`.
    pub tier_index: usize,
    pub name: &'static str,
    pub floor_xp: u64,
    /// `None` at the last tier.
    pub next_xp: Option<u64>,
}

impl RankStanding {
    /// Share of the way to the next threshold, `0..=100`.
    pub fn progress_percent(&self, lifetime_xp: u64) -> u8 {
        match self.next_xp {
            None => 100,
            Some(0) => 0,
            Some(next) => {
                let rounded = (lifetime_xp.saturating_mul(200) + next) / (next * 2);
                rounded.min(100) as u8
            }
        }
    }
}

/// Looks up the highest tier whose `min_xp <= lifetime_xp`.
pub fn rank_for(lifetime_xp: u64) -> RankStanding {
    let tier_index = RANK_TABLE
        .iter()
        .rposition(|tier| tier.min_xp <= lifetime_xp)
        .unwrap_or(0);
    let tier = RANK_TABLE[tier_index];
    RankStanding {
        tier_index,
        name: tier.name,
        floor_xp: tier.min_xp,
        next_xp: RANK_TABLE.get(tier_index + 1).map(|next| next.min_xp),
    }
}

/// Coarse account level shown next to the rank, starting at 1.
pub fn account_level(lifetime_xp: u64) -> u64 {
    lifetime_xp / XP_PER_LEVEL + 1
}
