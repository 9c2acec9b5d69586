use std::path::PathBuf;

use anyhow::Result;
use log::info;

use crate::attendance;
use crate::match_log::{self, Outcome};
use crate::profile::{self, DEFAULT_UNCERTAINTY_FACTOR};
use crate::ranking::{self, EligibilityRule};
use crate::rating_engine::{self, RatingPriors};
use crate::report;

/// Everything one batch run needs: input paths, output paths, and tuning.
/// A run is a pure function of this config plus the files it names; nothing
/// persists across invocations.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub games_path: PathBuf,
    pub allowed_players_path: Option<PathBuf>,
    pub ranking_path: PathBuf,
    pub leaderboard_path: PathBuf,
    pub curves_path: Option<PathBuf>,
    pub priors: RatingPriors,
    pub uncertainty_factor: f64,
    pub eligibility: EligibilityRule,
}

impl PipelineConfig {
    pub fn new(games_path: impl Into<PathBuf>) -> Self {
        Self {
            games_path: games_path.into(),
            allowed_players_path: None,
            ranking_path: PathBuf::from("ranking.csv"),
            leaderboard_path: PathBuf::from("leaderboard.csv"),
            curves_path: None,
            priors: RatingPriors::default(),
            uncertainty_factor: DEFAULT_UNCERTAINTY_FACTOR,
            eligibility: EligibilityRule::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub matches: usize,
    pub draws: usize,
    pub players: usize,
    pub eligible: usize,
    pub leaderboard_rows: usize,
    pub ranking_path: PathBuf,
    pub leaderboard_path: PathBuf,
}

/// Run the whole pipeline: load → validate → attendance → rating →
/// profiles → rank → emit. All computation finishes before the first output
/// byte is written, so a fatal error leaves any previous artifacts intact.
pub fn run(config: &PipelineConfig) -> Result<RunSummary> {
    let records = match_log::load_match_log(&config.games_path)?;
    info!(
        "loaded {} matches from {}",
        records.len(),
        config.games_path.display()
    );

    let mut names = match_log::collect_player_names(&records);
    if let Some(path) = &config.allowed_players_path {
        let allowed = match_log::load_allowed_players(path)?;
        match_log::validate_players(&records, &allowed)?;
        // Validation guarantees the log only names allowed players, so the
        // allow-list is the full roster; regulars with zero matches still
        // get a (prior-shaped) profile.
        names = allowed;
    }
    info!("{} known players", names.len());

    let stats = attendance::compute_attendance(&records);
    let ratings = rating_engine::rate_players(&records, &names, config.priors);
    let mut profiles =
        profile::build_profiles(&names, &ratings, &stats, config.uncertainty_factor);
    ranking::sort_into_ranking(&mut profiles);

    let full = ranking::full_ranking(&profiles);
    let board = ranking::leaderboard(&profiles, config.eligibility);
    let eligible = profiles
        .iter()
        .filter(|p| config.eligibility.is_eligible(p))
        .count();
    let draws = records
        .iter()
        .filter(|r| r.outcome == Outcome::Draw)
        .count();

    report::write_ranking_csv(&config.ranking_path, &full)?;
    report::write_ranking_csv(&config.leaderboard_path, &board)?;
    if let Some(path) = &config.curves_path {
        report::write_learning_curves_json(path, &profiles)?;
    }
    info!(
        "wrote {} ranked players, {} leaderboard rows",
        full.len(),
        board.len()
    );

    Ok(RunSummary {
        matches: records.len(),
        draws,
        players: profiles.len(),
        eligible,
        leaderboard_rows: board.len(),
        ranking_path: config.ranking_path.clone(),
        leaderboard_path: config.leaderboard_path.clone(),
    })
}
