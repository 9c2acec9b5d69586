use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::match_log::MatchRecord;

/// Participation stats for one player. `practices` counts distinct calendar
/// dates played on; `games` counts individual matches, so two games on the
/// same evening are one practice but two games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceStats {
    pub practices: usize,
    pub games: usize,
}

/// Fold the match log into per-player attendance. Players with zero
/// appearances are simply absent from the map; callers substitute zeros.
pub fn compute_attendance(records: &[MatchRecord]) -> HashMap<String, AttendanceStats> {
    let mut dates: HashMap<&str, HashSet<NaiveDate>> = HashMap::new();
    let mut games: HashMap<&str, usize> = HashMap::new();

    for record in records {
        for name in record.players() {
            *games.entry(name).or_insert(0) += 1;
            dates.entry(name).or_default().insert(record.date);
        }
    }

    games
        .into_iter()
        .map(|(name, games)| {
            let practices = dates.get(name).map_or(0, HashSet::len);
            // A practice without a game is structurally impossible.
            debug_assert!(practices <= games);
            (
                name.to_string(),
                AttendanceStats { practices, games },
            )
        })
        .collect()
}
