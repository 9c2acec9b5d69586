use std::collections::HashMap;

use serde::Serialize;

use crate::attendance::AttendanceStats;
use crate::rating_engine::{DEFAULT_MU, DEFAULT_SIGMA, LearningCurve, PlayerRating, SkillBelief};

/// Uncertainty factor `k` in `true_skill = mu - k * sigma`.
pub const DEFAULT_UNCERTAINTY_FACTOR: f64 = 3.0;

/// One player's full record for a pipeline run: identity, final belief,
/// conservative skill, attendance, and belief trajectory. Built once after
/// rating inference and immutable afterward.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerProfile {
    pub name: String,
    pub mu: f64,
    pub sigma: f64,
    pub true_skill: f64,
    pub practices: usize,
    pub games: usize,
    pub learning_curve: LearningCurve,
}

/// Join names with their ratings and attendance into profiles. A name
/// missing from the attendance map means zero practices and games, not an
/// error.
pub fn build_profiles(
    names: &[String],
    ratings: &HashMap<String, PlayerRating>,
    attendance: &HashMap<String, AttendanceStats>,
    uncertainty_factor: f64,
) -> Vec<PlayerProfile> {
    names
        .iter()
        .map(|name| {
            let rating = ratings.get(name).cloned().unwrap_or_else(|| PlayerRating {
                belief: SkillBelief {
                    mu: DEFAULT_MU,
                    sigma: DEFAULT_SIGMA,
                },
                curve: Vec::new(),
            });
            let stats = attendance.get(name).copied().unwrap_or_default();
            PlayerProfile {
                name: name.clone(),
                mu: rating.belief.mu,
                sigma: rating.belief.sigma,
                true_skill: rating.belief.conservative(uncertainty_factor),
                practices: stats.practices,
                games: stats.games,
                learning_curve: rating.curve,
            }
        })
        .collect()
}
