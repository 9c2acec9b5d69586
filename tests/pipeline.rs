use std::fs;
use std::path::{Path, PathBuf};

use skill_ladder::pipeline::{self, PipelineConfig};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn config_into(dir: &Path) -> PipelineConfig {
    let mut config = PipelineConfig::new(fixture_path("games_db.csv"));
    config.allowed_players_path = Some(fixture_path("players_allowed.txt"));
    config.ranking_path = dir.join("ranking.csv");
    config.leaderboard_path = dir.join("leaderboard.csv");
    config.curves_path = Some(dir.join("curves.json"));
    config
}

fn csv_rows(path: &Path) -> Vec<Vec<String>> {
    fs::read_to_string(path)
        .expect("output should be readable")
        .lines()
        .map(|l| l.split(',').map(str::to_string).collect())
        .collect()
}

#[test]
fn end_to_end_run_emits_ranking_and_leaderboard() {
    let dir = tempfile::tempdir().unwrap();
    let summary = pipeline::run(&config_into(dir.path())).expect("pipeline should succeed");

    assert_eq!(summary.matches, 9);
    assert_eq!(summary.draws, 1);
    assert_eq!(summary.players, 6);
    assert_eq!(summary.eligible, 4);
    assert_eq!(summary.leaderboard_rows, 4);

    let ranking = csv_rows(&summary.ranking_path);
    assert_eq!(
        ranking[0],
        vec!["name", "rank", "true_skill", "mu", "sigma", "practices", "games"]
    );
    // Header plus one row per known player, ranks 1..=6.
    assert_eq!(ranking.len(), 7);
    for (i, row) in ranking[1..].iter().enumerate() {
        assert_eq!(row[1], (i + 1).to_string());
    }
    // Ranking order is true_skill descending.
    let skills: Vec<f64> = ranking[1..].iter().map(|r| r[2].parse().unwrap()).collect();
    assert!(skills.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn zero_match_player_is_ranked_with_prior_belief() {
    let dir = tempfile::tempdir().unwrap();
    let summary = pipeline::run(&config_into(dir.path())).expect("pipeline should succeed");

    let ranking = csv_rows(&summary.ranking_path);
    let ghost = ranking[1..]
        .iter()
        .find(|r| r[0] == "Ghost")
        .expect("allow-listed Ghost should be ranked");

    assert_eq!(ghost[3], "25.000000");
    assert_eq!(ghost[4], "8.333333");
    assert_eq!(ghost[5], "0");
    assert_eq!(ghost[6], "0");
    let true_skill: f64 = ghost[2].parse().unwrap();
    assert!(true_skill.abs() < 1e-6);

    // And an empty learning curve in the export.
    let curves: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("curves.json")).unwrap())
            .unwrap();
    assert_eq!(curves["Ghost"].as_array().unwrap().len(), 0);
    assert!(!curves["Frnda"].as_array().unwrap().is_empty());
}

#[test]
fn ineligible_player_is_off_the_leaderboard_but_in_the_ranking() {
    let dir = tempfile::tempdir().unwrap();
    let summary = pipeline::run(&config_into(dir.path())).expect("pipeline should succeed");

    let board = csv_rows(&summary.leaderboard_path);
    assert!(board[1..].iter().all(|r| r[0] != "Ace" && r[0] != "Ghost"));
    assert_eq!(board.len(), 1 + 4);
    // Leaderboard ranks are positions within the filtered order.
    for (i, row) in board[1..].iter().enumerate() {
        assert_eq!(row[1], (i + 1).to_string());
    }

    let ranking = csv_rows(&summary.ranking_path);
    assert!(ranking[1..].iter().any(|r| r[0] == "Ace"));
}

#[test]
fn reruns_are_byte_identical() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    pipeline::run(&config_into(dir_a.path())).unwrap();
    pipeline::run(&config_into(dir_b.path())).unwrap();

    for name in ["ranking.csv", "leaderboard.csv", "curves.json"] {
        let a = fs::read(dir_a.path().join(name)).unwrap();
        let b = fs::read(dir_b.path().join(name)).unwrap();
        assert_eq!(a, b, "{name} differs between identical runs");
    }
}

#[test]
fn validation_failure_leaves_previous_outputs_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let stale_ranking = dir.path().join("ranking.csv");
    fs::write(&stale_ranking, "stale but valid\n").unwrap();

    let short_list = dir.path().join("players_allowed.txt");
    fs::write(&short_list, "Frnda\nXnapy\n").unwrap();

    let mut config = config_into(dir.path());
    config.allowed_players_path = Some(short_list);

    let err = pipeline::run(&config).unwrap_err();
    assert!(err.to_string().contains("unknown player"));

    assert_eq!(fs::read_to_string(&stale_ranking).unwrap(), "stale but valid\n");
    assert!(!dir.path().join("leaderboard.csv").exists());
}
