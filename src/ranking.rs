use std::cmp::Ordering;

use crate::profile::PlayerProfile;

pub const DEFAULT_MIN_PRACTICES: usize = 3;
pub const DEFAULT_MIN_GAMES: usize = 8;

/// Leaderboard size after eligibility filtering.
pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

/// Minimum attendance for a spot on the public leaderboard. Everyone still
/// appears in the full ranking regardless.
#[derive(Debug, Clone, Copy)]
pub struct EligibilityRule {
    pub min_practices: usize,
    pub min_games: usize,
    pub leaderboard_size: usize,
}

impl Default for EligibilityRule {
    fn default() -> Self {
        Self {
            min_practices: DEFAULT_MIN_PRACTICES,
            min_games: DEFAULT_MIN_GAMES,
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
        }
    }
}

impl EligibilityRule {
    pub fn is_eligible(&self, profile: &PlayerProfile) -> bool {
        profile.practices >= self.min_practices && profile.games >= self.min_games
    }
}

/// Sort profiles into the ranking order: conservative skill descending,
/// ties by case-insensitive name ascending, raw name as the last resort so
/// the order is total and reruns are byte-identical.
pub fn sort_into_ranking(profiles: &mut [PlayerProfile]) {
    profiles.sort_by(|a, b| compare_profiles(a, b));
}

fn compare_profiles(a: &PlayerProfile, b: &PlayerProfile) -> Ordering {
    b.true_skill
        .total_cmp(&a.true_skill)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

/// Full ranking: every profile with its 1-based position in the total
/// order. Input must already be sorted by `sort_into_ranking`.
pub fn full_ranking(ranked: &[PlayerProfile]) -> Vec<(usize, &PlayerProfile)> {
    ranked.iter().enumerate().map(|(i, p)| (i + 1, p)).collect()
}

/// Leaderboard: eligibility filtering happens *before* truncation, so an
/// ineligible high-skill player never occupies a slot and never blocks an
/// eligible lower-skill player. Ranks are 1-based positions within the
/// filtered order.
pub fn leaderboard<'a>(
    ranked: &'a [PlayerProfile],
    rule: EligibilityRule,
) -> Vec<(usize, &'a PlayerProfile)> {
    ranked
        .iter()
        .filter(|p| rule.is_eligible(p))
        .take(rule.leaderboard_size)
        .enumerate()
        .map(|(i, p)| (i + 1, p))
        .collect()
}
