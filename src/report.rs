use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use crate::profile::PlayerProfile;
use crate::rating_engine::LearningCurve;

const HEADER: [&str; 7] = [
    "name",
    "rank",
    "true_skill",
    "mu",
    "sigma",
    "practices",
    "games",
];

/// Serialize ranked profiles to the delimited output format: header row,
/// one row per profile, floats fixed to 6 decimals. The payload is built
/// fully in memory and lands via tmp-file + rename, so a short write never
/// leaves a header-only stub behind.
pub fn write_ranking_csv(path: &Path, rows: &[(usize, &PlayerProfile)]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(HEADER)
        .context("serialize ranking header")?;
    for (rank, profile) in rows {
        writer
            .write_record([
                profile.name.as_str(),
                &rank.to_string(),
                &format!("{:.6}", profile.true_skill),
                &format!("{:.6}", profile.mu),
                &format!("{:.6}", profile.sigma),
                &profile.practices.to_string(),
                &profile.games.to_string(),
            ])
            .with_context(|| format!("serialize ranking row for {}", profile.name))?;
    }
    let payload = writer
        .into_inner()
        .map_err(|err| anyhow!("flush ranking rows: {err}"))?;
    write_atomic(path, &payload)
}

/// Dump every player's learning curve as JSON keyed by name, for external
/// plotting tools. Sorted keys keep reruns byte-identical.
pub fn write_learning_curves_json(path: &Path, profiles: &[PlayerProfile]) -> Result<()> {
    let curves: BTreeMap<&str, &LearningCurve> = profiles
        .iter()
        .map(|p| (p.name.as_str(), &p.learning_curve))
        .collect();
    let payload = serde_json::to_vec_pretty(&curves).context("serialize learning curves")?;
    write_atomic(path, &payload)
}

fn write_atomic(path: &Path, payload: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, payload).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("move {} into place at {}", tmp.display(), path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating_engine::SkillBelief;

    fn profile(name: &str) -> PlayerProfile {
        PlayerProfile {
            name: name.to_string(),
            mu: 27.5,
            sigma: 1.25,
            true_skill: 23.75,
            practices: 4,
            games: 9,
            learning_curve: vec![(2, SkillBelief { mu: 27.5, sigma: 1.25 })],
        }
    }

    #[test]
    fn ranking_csv_has_header_and_fixed_decimals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranking.csv");
        let p = profile("Amy");
        write_ranking_csv(&path, &[(1, &p)]).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let mut lines = raw.lines();
        assert_eq!(
            lines.next().unwrap(),
            "name,rank,true_skill,mu,sigma,practices,games"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Amy,1,23.750000,27.500000,1.250000,4,9"
        );
        assert!(lines.next().is_none());

        // The staging file must not survive a successful write.
        assert!(!dir.path().join("ranking.tmp").exists());
    }

    #[test]
    fn write_fails_with_offending_path_in_error() {
        let p = profile("Amy");
        let err = write_ranking_csv(Path::new("/nonexistent-dir/ranking.csv"), &[(1, &p)])
            .unwrap_err();
        assert!(format!("{err:#}").contains("nonexistent-dir"));
    }

    #[test]
    fn curves_json_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curves.json");
        write_learning_curves_json(&path, &[profile("Amy")]).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let entry = &value["Amy"][0];
        assert_eq!(entry[0], 2);
        assert_eq!(entry[1]["mu"], 27.5);
    }
}
