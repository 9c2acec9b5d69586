use std::path::PathBuf;

use anyhow::{Context, Result};

use skill_ladder::pipeline::{self, PipelineConfig};

const USAGE: &str = "\
skill_ladder [options]
  --games PATH          match log CSV (default games_db.csv, env LADDER_GAMES_DB)
  --allowed PATH        allow-list, one player per line (env LADDER_ALLOWED_PLAYERS)
  --ranking PATH        full ranking output (default ranking.csv)
  --leaderboard PATH    leaderboard output (default leaderboard.csv)
  --curves PATH         optional learning-curve JSON export
  --min-practices N     leaderboard eligibility (default 3)
  --min-games N         leaderboard eligibility (default 8)
  --top N               leaderboard size (default 10)
  --draw-prob P         draw-probability prior (default 0.1)
  --uncertainty K       conservative-skill factor k (default 3.0)";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{USAGE}");
        return Ok(());
    }

    let config = build_config(&args)?;
    let summary = pipeline::run(&config)?;

    println!("Leaderboard refresh complete");
    println!("Matches: {} ({} draws)", summary.matches, summary.draws);
    println!("Players ranked: {}", summary.players);
    println!(
        "Eligible for leaderboard: {} ({} rows written)",
        summary.eligible, summary.leaderboard_rows
    );
    println!("Ranking: {}", summary.ranking_path.display());
    println!("Leaderboard: {}", summary.leaderboard_path.display());

    Ok(())
}

fn build_config(args: &[String]) -> Result<PipelineConfig> {
    let games = arg_value(args, "--games")
        .or_else(|| env_value("LADDER_GAMES_DB"))
        .unwrap_or_else(|| "games_db.csv".to_string());

    let mut config = PipelineConfig::new(games);

    config.allowed_players_path = arg_value(args, "--allowed")
        .or_else(|| env_value("LADDER_ALLOWED_PLAYERS"))
        .map(PathBuf::from);
    if let Some(path) = arg_value(args, "--ranking") {
        config.ranking_path = PathBuf::from(path);
    }
    if let Some(path) = arg_value(args, "--leaderboard") {
        config.leaderboard_path = PathBuf::from(path);
    }
    config.curves_path = arg_value(args, "--curves").map(PathBuf::from);

    if let Some(raw) = arg_value(args, "--min-practices") {
        config.eligibility.min_practices = parse_num(&raw, "--min-practices")?;
    }
    if let Some(raw) = arg_value(args, "--min-games") {
        config.eligibility.min_games = parse_num(&raw, "--min-games")?;
    }
    if let Some(raw) = arg_value(args, "--top") {
        config.eligibility.leaderboard_size = parse_num(&raw, "--top")?;
    }
    if let Some(raw) = arg_value(args, "--draw-prob") {
        config.priors.draw_probability = parse_num(&raw, "--draw-prob")?;
    }
    if let Some(raw) = arg_value(args, "--uncertainty") {
        config.uncertainty_factor = parse_num(&raw, "--uncertainty")?;
    }

    Ok(config)
}

fn parse_num<T: std::str::FromStr>(raw: &str, flag: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse::<T>()
        .with_context(|| format!("invalid value {raw:?} for {flag}"))
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(rest) = arg.strip_prefix(flag)
            && let Some(value) = rest.strip_prefix('=')
            && !value.trim().is_empty()
        {
            return Some(value.trim().to_string());
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

fn env_value(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => Some(raw.trim().to_string()),
        _ => None,
    }
}
