//! Point suggestions for new tasks and habits.
//!
//! # Responsibility
//! - Map a free-text title to a default point value.
//!
//! # Invariants
//! - A suggestion is only a default; an explicit value always wins.
//! - Suggestions are deterministic for a given title.

use once_cell::sync::Lazy;
use regex::Regex;

/// Keyword families checked in order; the first match wins.
static KEYWORD_SCORES: Lazy<Vec<(Regex, u64)>> = Lazy::new(|| {
    [
        (r"(?i)gym|workout|exercise", 300),
        (r"(?i)run|cardio", 250),
        (r"(?i)read|study|learn", 150),
        (r"(?i)code|dev|project", 500),
        (r"(?i)meditate|yoga", 200),
        (r"(?i)clean|chores", 120),
        (r"(?i)write|journal", 180),
    ]
    .into_iter()
    .map(|(pattern, score)| (Regex::new(pattern).expect("valid keyword regex"), score))
    .collect()
});

const BASE_SCORE: u64 = 100;

/// Supplies a default point value from a title.
pub trait ScoreSuggester {
    fn suggest(&self, title: &str) -> Option<u64>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordScoreSuggester;

impl ScoreSuggester for KeywordScoreSuggester {
    fn suggest(&self, title: &str) -> Option<u64> {
        if title.trim().is_empty() {
            return None;
        }
        let score = KEYWORD_SCORES
            .iter()
            .find(|(pattern, _)| pattern.is_match(title))
            .map_or(BASE_SCORE, |(_, score)| *score);
        Some(score)
    }
}

/// Explicit value, else suggestion, else `fallback`.
pub fn resolve_points(explicit: Option<u64>, suggested: Option<u64>, fallback: u64) -> u64 {
    explicit.or(suggested).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::{resolve_points, KeywordScoreSuggester, ScoreSuggester};

    #[test]
    fn keyword_families_map_to_scores() {
        let suggester = KeywordScoreSuggester;
        assert_eq!(suggester.suggest("Morning GYM session"), Some(300));
        assert_eq!(suggester.suggest("5k run"), Some(250));
        assert_eq!(suggester.suggest("Study Rust"), Some(150));
        assert_eq!(suggester.suggest("Side project"), Some(500));
        assert_eq!(suggester.suggest("Yoga"), Some(200));
        assert_eq!(suggester.suggest("House chores"), Some(120));
        assert_eq!(suggester.suggest("Journal"), Some(180));
        assert_eq!(suggester.suggest("Call mom"), Some(100));
    }

    #[test]
    fn earlier_family_wins_on_overlap() {
        assert_eq!(KeywordScoreSuggester.suggest("Read after workout"), Some(300));
    }

    #[test]
    fn blank_title_has_no_suggestion() {
        assert_eq!(KeywordScoreSuggester.suggest("   "), None);
    }

    #[test]
    fn explicit_value_beats_suggestion_and_fallback() {
        assert_eq!(resolve_points(Some(40), Some(300), 100), 40);
        assert_eq!(resolve_points(None, Some(300), 100), 300);
        assert_eq!(resolve_points(None, None, 100), 100);
    }
}
