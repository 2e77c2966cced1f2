// Season aggregation: pivot scored rows to one line per player.
//
// Every distinct week key in the input counts as a week for every player, so
// a week a player has no rows in contributes a zero. Rows sharing a player
// name and week are averaged into one weekly value.

use super::{SeasonSummary, SummaryTable, WeekKey};
use crate::scoring::calculator::ScoredTable;
use crate::stats::RosterPosition;
use std::collections::{BTreeSet, HashMap};
use tracing::info;

/// Sum, mean, and sample standard deviation of a player's weekly totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeeklyStats {
    pub total: f64,
    pub mean: f64,
    pub stdev: f64,
}

/// Compute total, mean, and sample standard deviation (n-1 denominator) in a
/// single pass.
///
/// Returns all zeros for an empty slice. With a single value the deviation is
/// `0.0` rather than undefined.
pub fn weekly_stats(values: &[f64]) -> WeeklyStats {
    let mut n = 0.0;
    let mut total = 0.0;
    let mut mean = 0.0;
    let mut m2 = 0.0;
    for &v in values {
        n += 1.0;
        total += v;
        let delta = v - mean;
        mean += delta / n;
        m2 += delta * (v - mean);
    }
    let stdev = if n > 1.0 { (m2 / (n - 1.0)).sqrt() } else { 0.0 };
    WeeklyStats { total, mean, stdev }
}

/// Running state for one player while folding rows.
struct PlayerFold {
    player: String,
    team: String,
    position: RosterPosition,
    /// (season, week, input index) of the row `team`/`position` came from.
    first_seen: (WeekKey, usize),
    /// Per-week (sum, count), aligned with the week key list.
    weeks: Vec<(f64, u32)>,
}

/// Aggregate scored rows into one summary per distinct player name, sorted by
/// season total descending (ties by name).
pub fn summarize(scored: &ScoredTable) -> SummaryTable {
    let week_keys: Vec<WeekKey> = scored
        .rows
        .iter()
        .map(|r| WeekKey::new(r.row.season, r.row.week))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let week_index: HashMap<WeekKey, usize> = week_keys
        .iter()
        .enumerate()
        .map(|(i, k)| (*k, i))
        .collect();

    let mut folds: Vec<PlayerFold> = Vec::new();
    let mut by_name: HashMap<&str, usize> = HashMap::new();

    for (i, scored_row) in scored.rows.iter().enumerate() {
        let row = &scored_row.row;
        let key = WeekKey::new(row.season, row.week);
        let name = row.player();

        let idx = *by_name.entry(name).or_insert_with(|| {
            folds.push(PlayerFold {
                player: name.to_string(),
                team: row.team.clone(),
                position: row.position(),
                first_seen: (key, i),
                weeks: vec![(0.0, 0); week_keys.len()],
            });
            folds.len() - 1
        });
        let fold = &mut folds[idx];

        if (key, i) < fold.first_seen {
            fold.team = row.team.clone();
            fold.position = row.position();
            fold.first_seen = (key, i);
        }

        let slot = &mut fold.weeks[week_index[&key]];
        slot.0 += scored_row.total_score;
        slot.1 += 1;
    }

    let mut rows: Vec<SeasonSummary> = folds
        .into_iter()
        .map(|fold| {
            let weekly: Vec<f64> = fold
                .weeks
                .iter()
                .map(|&(sum, count)| if count == 0 { 0.0 } else { sum / count as f64 })
                .collect();
            let stats = weekly_stats(&weekly);
            SeasonSummary {
                player: fold.player,
                team: fold.team,
                position: fold.position,
                season_total: stats.total,
                week_avg: stats.mean,
                week_std: stats.stdev,
                weekly,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.season_total
            .total_cmp(&a.season_total)
            .then_with(|| a.player.cmp(&b.player))
    });

    info!(
        "summarized {} players over {} weeks",
        rows.len(),
        week_keys.len()
    );

    SummaryTable { week_keys, rows }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
