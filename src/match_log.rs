use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use serde::Deserialize;

/// Contest outcome. `Decisive` means the first team in `MatchRecord::teams`
/// beat every later team; `Draw` means no team is preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Decisive,
    Draw,
}

/// One contest from the match log: ordered teams (winner first when
/// decisive), the shared contest date, and the outcome tag.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub date: NaiveDate,
    pub teams: Vec<Vec<String>>,
    pub outcome: Outcome,
}

impl MatchRecord {
    /// Every player appearing in this record, across all teams.
    pub fn players(&self) -> impl Iterator<Item = &str> {
        self.teams.iter().flatten().map(String::as_str)
    }
}

/// Parse a bracketed team specifier like `[Alice|Bob|Charlie]` into player
/// names. Whitespace around the brackets and around each name is trimmed,
/// and empty segments are dropped, so `[A| B |C ]` parses the same as
/// `[A|B|C]`. An empty or whitespace-only input is an empty team; a value
/// missing either bracket is a malformed row, not something to guess at.
pub fn parse_team(raw: &str) -> Result<Vec<String>> {
    let stripped = raw.trim();
    if stripped.is_empty() {
        return Ok(Vec::new());
    }
    let inner = stripped
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| anyhow!("team value {stripped:?} is not wrapped in [...] brackets"))?;
    Ok(inner
        .split('|')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect())
}

#[derive(Debug, Deserialize)]
struct RawGameRow {
    date: String,
    winning_team: String,
    losing_team: String,
    draw: String,
}

/// Load the full match log CSV (`date,winning_team,losing_team,draw`).
/// Any malformed row aborts the load with its 1-based data row number.
pub fn load_match_log(path: &Path) -> Result<Vec<MatchRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("open match log {}", path.display()))?;

    let mut records = Vec::new();
    for (idx, row) in reader.deserialize::<RawGameRow>().enumerate() {
        let line = idx + 1;
        let row = row.with_context(|| format!("match log row {line}: unreadable row"))?;
        let record =
            match_record_from_row(&row).with_context(|| format!("match log row {line}"))?;
        records.push(record);
    }
    Ok(records)
}

fn match_record_from_row(row: &RawGameRow) -> Result<MatchRecord> {
    let date = parse_match_date(&row.date)?;
    let winning = parse_team(&row.winning_team).context("winning_team column")?;
    let losing = parse_team(&row.losing_team).context("losing_team column")?;
    if winning.is_empty() {
        bail!("winning_team is empty");
    }
    if losing.is_empty() {
        bail!("losing_team is empty");
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for name in winning.iter().chain(losing.iter()) {
        if !seen.insert(name.as_str()) {
            bail!("player {name:?} appears in more than one team slot");
        }
    }

    let outcome = if parse_draw_flag(&row.draw)? {
        Outcome::Draw
    } else {
        Outcome::Decisive
    };

    Ok(MatchRecord {
        date,
        teams: vec![winning, losing],
        outcome,
    })
}

fn parse_match_date(raw: &str) -> Result<NaiveDate> {
    // The group's sheets have used both ISO and dotted European dates.
    for fmt in ["%Y-%m-%d", "%d.%m.%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Ok(date);
        }
    }
    Err(anyhow!("unparseable date {raw:?}"))
}

fn parse_draw_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "" | "0" | "false" => Ok(false),
        other => Err(anyhow!("unparseable draw flag {other:?}")),
    }
}

/// Distinct player names across every team column, sorted for
/// reproducibility.
pub fn collect_player_names(records: &[MatchRecord]) -> Vec<String> {
    let names: BTreeSet<&str> = records.iter().flat_map(MatchRecord::players).collect();
    names.into_iter().map(str::to_string).collect()
}

/// Load the allow-list: one player name per line, blank lines ignored.
pub fn load_allowed_players(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("open allowed players file {}", path.display()))?;
    let names: BTreeSet<&str> = raw.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    Ok(names.into_iter().map(str::to_string).collect())
}

/// Check every name in the log against the allow-list. All unknown names are
/// gathered into a single failure so an operator can fix every typo in one
/// pass instead of replaying the load once per name.
pub fn validate_players(records: &[MatchRecord], allowed: &[String]) -> Result<()> {
    let allowed: HashSet<&str> = allowed.iter().map(String::as_str).collect();
    let unknown: BTreeSet<&str> = records
        .iter()
        .flat_map(MatchRecord::players)
        .filter(|name| !allowed.contains(name))
        .collect();
    if unknown.is_empty() {
        return Ok(());
    }
    bail!(
        "{} unknown player name(s) in match log: {}",
        unknown.len(),
        unknown.into_iter().collect::<Vec<_>>().join(", ")
    )
}
