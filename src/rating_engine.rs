use std::collections::HashMap;

use serde::Serialize;
use skillratings::MultiTeamOutcome;
use skillratings::trueskill::{TrueSkillConfig, TrueSkillRating, trueskill_multi_team};

use crate::match_log::{MatchRecord, Outcome};

pub const DEFAULT_MU: f64 = 25.0;
pub const DEFAULT_SIGMA: f64 = 25.0 / 3.0;

/// Default expected fraction of drawn contests. Hand-tuned from the draw
/// frequency observed in the log so far; recalibrate it (via
/// `RatingPriors::draw_probability`) as more data accrues rather than
/// treating it as a constant.
pub const DEFAULT_DRAW_PROBABILITY: f64 = 0.1;

/// Global priors handed to the rating engine for every previously unseen
/// player, plus the draw-probability tuning knob.
#[derive(Debug, Clone, Copy)]
pub struct RatingPriors {
    pub mu: f64,
    pub sigma: f64,
    pub draw_probability: f64,
}

impl Default for RatingPriors {
    fn default() -> Self {
        Self {
            mu: DEFAULT_MU,
            sigma: DEFAULT_SIGMA,
            draw_probability: DEFAULT_DRAW_PROBABILITY,
        }
    }
}

/// Gaussian belief over a player's latent skill at one point in time.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SkillBelief {
    pub mu: f64,
    pub sigma: f64,
}

impl SkillBelief {
    /// Risk-averse point estimate: skill we are fairly confident the player
    /// has at least.
    pub fn conservative(&self, k: f64) -> f64 {
        self.mu - k * self.sigma
    }
}

/// Chronological (match_index, belief) trail for one player, one entry per
/// contest they took part in. Produced once per inference run, never
/// mutated afterward.
pub type LearningCurve = Vec<(usize, SkillBelief)>;

/// The adapter's view of the rating engine: the match log reshaped into the
/// engine's composition/results contract, plus the belief trajectories
/// extracted after convergence.
///
/// `compositions[i]` is the ordered team-member lists of match `i`, winner
/// first; `results[i]` scores each team, higher meaning a better placement
/// (`[1, 0]` decisive, `[0, 0]` draw). The actual update mathematics live in
/// `skillratings`; nothing in this crate computes a posterior itself.
pub struct SkillHistory {
    compositions: Vec<Vec<Vec<String>>>,
    results: Vec<Vec<u32>>,
    priors: RatingPriors,
    converged: bool,
    curves: HashMap<String, LearningCurve>,
}

impl SkillHistory {
    pub fn from_match_log(records: &[MatchRecord], priors: RatingPriors) -> Self {
        let compositions = records.iter().map(|r| r.teams.clone()).collect();
        let results = records
            .iter()
            .map(|r| match r.outcome {
                Outcome::Decisive => {
                    let mut scores = vec![0u32; r.teams.len()];
                    scores[0] = 1;
                    scores
                }
                Outcome::Draw => vec![0u32; r.teams.len()],
            })
            .collect();
        Self {
            compositions,
            results,
            priors,
            converged: false,
            curves: HashMap::new(),
        }
    }

    /// Run the engine over the whole history. Must be called before any
    /// belief is read (queries on an unconverged history see no curves) and
    /// is idempotent: the second call is a no-op, so curves stay
    /// append-only-then-frozen.
    pub fn convergence(&mut self) {
        if self.converged {
            return;
        }
        self.converged = true;

        let config = TrueSkillConfig {
            draw_probability: self.priors.draw_probability,
            ..TrueSkillConfig::new()
        };
        let prior = TrueSkillRating {
            rating: self.priors.mu,
            uncertainty: self.priors.sigma,
        };
        let mut current: HashMap<String, TrueSkillRating> = HashMap::new();

        for (index, (teams, scores)) in self.compositions.iter().zip(&self.results).enumerate() {
            let team_ratings: Vec<Vec<TrueSkillRating>> = teams
                .iter()
                .map(|team| {
                    team.iter()
                        .map(|name| current.get(name).copied().unwrap_or(prior))
                        .collect()
                })
                .collect();
            let teams_and_ranks: Vec<(&[TrueSkillRating], MultiTeamOutcome)> = team_ratings
                .iter()
                .zip(scores)
                .map(|(ratings, score)| {
                    // Higher score = better placement; equal scores draw.
                    let rank = 1 + scores.iter().filter(|s| *s > score).count();
                    (ratings.as_slice(), MultiTeamOutcome::new(rank))
                })
                .collect();

            let updated = trueskill_multi_team(&teams_and_ranks, &config);

            for (team, ratings) in teams.iter().zip(updated) {
                for (name, rating) in team.iter().zip(ratings) {
                    current.insert(name.clone(), rating);
                    self.curves.entry(name.clone()).or_default().push((
                        index,
                        SkillBelief {
                            mu: rating.rating,
                            sigma: rating.uncertainty,
                        },
                    ));
                }
            }
        }
    }

    /// The engine raises a lookup miss for players with no match history;
    /// callers substitute the prior (see `rate_players`).
    pub fn learning_curve(&self, name: &str) -> Option<&LearningCurve> {
        self.curves.get(name)
    }

    pub fn final_belief(&self, name: &str) -> Option<SkillBelief> {
        self.curves
            .get(name)
            .and_then(|curve| curve.last())
            .map(|(_, belief)| *belief)
    }

    pub fn prior_belief(&self) -> SkillBelief {
        SkillBelief {
            mu: self.priors.mu,
            sigma: self.priors.sigma,
        }
    }
}

/// Final belief plus full trajectory for one player.
#[derive(Debug, Clone)]
pub struct PlayerRating {
    pub belief: SkillBelief,
    pub curve: LearningCurve,
}

/// Rate every known player against the match log. A player with zero
/// matches has no curve inside the engine; they get the global prior and an
/// empty curve instead of an error.
pub fn rate_players(
    records: &[MatchRecord],
    names: &[String],
    priors: RatingPriors,
) -> HashMap<String, PlayerRating> {
    let mut history = SkillHistory::from_match_log(records, priors);
    history.convergence();

    names
        .iter()
        .map(|name| {
            let rating = match history.learning_curve(name) {
                Some(curve) => PlayerRating {
                    belief: history
                        .final_belief(name)
                        .unwrap_or_else(|| history.prior_belief()),
                    curve: curve.clone(),
                },
                None => PlayerRating {
                    belief: history.prior_belief(),
                    curve: Vec::new(),
                },
            };
            (name.clone(), rating)
        })
        .collect()
}
