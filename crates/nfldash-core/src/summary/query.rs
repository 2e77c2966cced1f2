// Dashboard read request: filter, rank, and limit season summaries, and
// derive the scatter points for the two dashboard charts.

use super::SeasonSummary;
use crate::stats::Position;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How the row limit is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    /// Top `limit` rows overall.
    #[default]
    Overall,
    /// `limit` rows split evenly across the selected positions.
    PerPosition,
}

impl Grouping {
    pub fn toggled(self) -> Self {
        match self {
            Grouping::Overall => Grouping::PerPosition,
            Grouping::PerPosition => Grouping::Overall,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Grouping::Overall => "overall",
            Grouping::PerPosition => "per position",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryQuery {
    /// Positions to include. Empty means all positions.
    pub positions: BTreeSet<Position>,
    pub limit: usize,
    pub grouping: Grouping,
    /// Player names removed before ranking.
    pub excluded: BTreeSet<String>,
}

impl Default for SummaryQuery {
    fn default() -> Self {
        SummaryQuery {
            positions: BTreeSet::new(),
            limit: 50,
            grouping: Grouping::Overall,
            excluded: BTreeSet::new(),
        }
    }
}

impl SummaryQuery {
    /// The positions this query selects, in display order.
    pub fn active_positions(&self) -> Vec<Position> {
        if self.positions.is_empty() {
            Position::ALL.to_vec()
        } else {
            self.positions.iter().copied().collect()
        }
    }

    /// Rows outside the six fantasy positions (`LB`, blank, ...) never match.
    fn admits(&self, row: &SeasonSummary) -> bool {
        let Some(position) = row.position.fantasy() else {
            return false;
        };
        (self.positions.is_empty() || self.positions.contains(&position))
            && !self.excluded.contains(&row.player)
    }
}

fn by_total_desc(a: &&SeasonSummary, b: &&SeasonSummary) -> std::cmp::Ordering {
    b.season_total
        .total_cmp(&a.season_total)
        .then_with(|| a.player.cmp(&b.player))
}

/// Run a query against summary rows. The result is ordered by season total
/// descending.
pub fn select<'a>(rows: &'a [SeasonSummary], query: &SummaryQuery) -> Vec<&'a SeasonSummary> {
    let mut candidates: Vec<&SeasonSummary> = rows.iter().filter(|r| query.admits(r)).collect();
    candidates.sort_by(by_total_desc);

    match query.grouping {
        Grouping::Overall => {
            candidates.truncate(query.limit);
            candidates
        }
        Grouping::PerPosition => {
            let positions = query.active_positions();
            let per = query.limit / positions.len();
            let extra = query.limit % positions.len();
            let mut selected: Vec<&SeasonSummary> = positions
                .iter()
                .enumerate()
                .flat_map(|(i, pos)| {
                    let quota = per + usize::from(i < extra);
                    candidates
                        .iter()
                        .filter(move |r| r.position == *pos)
                        .take(quota)
                        .copied()
                })
                .collect();
            selected.sort_by(by_total_desc);
            selected
        }
    }
}

/// Points for the volatility chart: `(week_std, week_avg)` per row.
pub fn variance_points(rows: &[&SeasonSummary]) -> Vec<(f64, f64)> {
    rows.iter().map(|r| (r.week_std, r.week_avg)).collect()
}

/// Points for the by-position chart, one series per position present.
///
/// x is the position index plus a horizontal offset that spreads the rows of
/// a position evenly across `[-jitter/2, +jitter/2]` in rank order; y is the
/// weekly average.
pub fn position_points(rows: &[&SeasonSummary], jitter: f64) -> Vec<(Position, Vec<(f64, f64)>)> {
    Position::ALL
        .iter()
        .filter_map(|pos| {
            let members: Vec<&&SeasonSummary> =
                rows.iter().filter(|r| r.position == *pos).collect();
            if members.is_empty() {
                return None;
            }
            let n = members.len();
            let points = members
                .iter()
                .enumerate()
                .map(|(i, r)| {
                    let offset = if n == 1 {
                        0.0
                    } else {
                        (i as f64 / (n - 1) as f64 - 0.5) * jitter
                    };
                    (pos.index() as f64 + offset, r.week_avg)
                })
                .collect();
            Some((*pos, points))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::RosterPosition;

    fn summary(player: &str, position: Position, total: f64) -> SeasonSummary {
        SeasonSummary {
            player: player.into(),
            team: "TST".into(),
            position: position.into(),
            season_total: total,
            week_avg: total / 16.0,
            week_std: total / 40.0,
            weekly: vec![],
        }
    }

    fn sample() -> Vec<SeasonSummary> {
        vec![
            summary("QB1", Position::QB, 350.0),
            summary("QB2", Position::QB, 300.0),
            summary("QB3", Position::QB, 250.0),
            summary("RB1", Position::RB, 280.0),
            summary("RB2", Position::RB, 200.0),
            summary("WR1", Position::WR, 260.0),
            summary("K1", Position::K, 140.0),
            summary("DEFENSE", Position::Defense, 120.0),
        ]
    }

    fn names(rows: &[&SeasonSummary]) -> Vec<String> {
        rows.iter().map(|r| r.player.clone()).collect()
    }

    #[test]
    fn non_fantasy_positions_never_selected() {
        let mut rows = sample();
        rows.push(SeasonSummary {
            position: RosterPosition::Other("LB".into()),
            ..summary("J.Watt", Position::QB, 500.0)
        });
        let query = SummaryQuery {
            limit: 3,
            ..SummaryQuery::default()
        };
        assert_eq!(names(&select(&rows, &query)), vec!["QB1", "QB2", "RB1"]);

        let per_position = SummaryQuery {
            grouping: Grouping::PerPosition,
            ..query
        };
        assert!(!names(&select(&rows, &per_position)).contains(&"J.Watt".to_string()));

        let refs: Vec<&SeasonSummary> = rows.iter().collect();
        let plotted: usize = position_points(&refs, 0.5)
            .iter()
            .map(|(_, pts)| pts.len())
            .sum();
        assert_eq!(plotted, rows.len() - 1);
    }

    #[test]
    fn overall_top_n() {
        let rows = sample();
        let query = SummaryQuery {
            limit: 3,
            ..SummaryQuery::default()
        };
        assert_eq!(names(&select(&rows, &query)), vec!["QB1", "QB2", "RB1"]);
    }

    #[test]
    fn limit_larger_than_rows() {
        let rows = sample();
        let query = SummaryQuery {
            limit: 100,
            ..SummaryQuery::default()
        };
        assert_eq!(select(&rows, &query).len(), rows.len());
    }

    #[test]
    fn position_filter() {
        let rows = sample();
        let query = SummaryQuery {
            positions: BTreeSet::from([Position::RB, Position::WR]),
            limit: 10,
            ..SummaryQuery::default()
        };
        assert_eq!(names(&select(&rows, &query)), vec!["RB1", "WR1", "RB2"]);
    }

    #[test]
    fn exclusions_removed_before_ranking() {
        let rows = sample();
        let query = SummaryQuery {
            limit: 2,
            excluded: BTreeSet::from(["QB1".to_string()]),
            ..SummaryQuery::default()
        };
        assert_eq!(names(&select(&rows, &query)), vec!["QB2", "RB1"]);
    }

    #[test]
    fn per_position_splits_limit_evenly() {
        let rows = sample();
        let query = SummaryQuery {
            positions: BTreeSet::from([Position::QB, Position::RB]),
            limit: 4,
            grouping: Grouping::PerPosition,
            ..SummaryQuery::default()
        };
        assert_eq!(names(&select(&rows, &query)), vec!["QB1", "QB2", "RB1", "RB2"]);
    }

    #[test]
    fn per_position_remainder_goes_to_earlier_positions() {
        let rows = sample();
        let query = SummaryQuery {
            positions: BTreeSet::from([Position::QB, Position::RB]),
            limit: 3,
            grouping: Grouping::PerPosition,
            ..SummaryQuery::default()
        };
        assert_eq!(names(&select(&rows, &query)), vec!["QB1", "QB2", "RB1"]);
    }

    #[test]
    fn per_position_short_position_does_not_borrow_quota() {
        let rows = sample();
        let query = SummaryQuery {
            positions: BTreeSet::from([Position::QB, Position::K]),
            limit: 6,
            grouping: Grouping::PerPosition,
            ..SummaryQuery::default()
        };
        // Only one kicker exists; QB still gets exactly its quota of 3.
        assert_eq!(names(&select(&rows, &query)), vec!["QB1", "QB2", "QB3", "K1"]);
    }

    #[test]
    fn per_position_all_positions_when_unfiltered() {
        let rows = sample();
        let query = SummaryQuery {
            limit: 6,
            grouping: Grouping::PerPosition,
            ..SummaryQuery::default()
        };
        // One slot per position; there are no tight ends in the sample.
        assert_eq!(
            names(&select(&rows, &query)),
            vec!["QB1", "RB1", "WR1", "K1", "DEFENSE"]
        );
    }

    #[test]
    fn zero_limit_selects_nothing() {
        let rows = sample();
        let query = SummaryQuery {
            limit: 0,
            grouping: Grouping::PerPosition,
            ..SummaryQuery::default()
        };
        assert!(select(&rows, &query).is_empty());
    }

    #[test]
    fn variance_points_pair_std_with_avg() {
        let rows = sample();
        let selected: Vec<&SeasonSummary> = rows.iter().take(2).collect();
        let points = variance_points(&selected);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], (350.0 / 40.0, 350.0 / 16.0));
    }

    #[test]
    fn position_points_jitter_within_band() {
        let rows = sample();
        let selected: Vec<&SeasonSummary> = rows.iter().collect();
        let series = position_points(&selected, 0.6);
        assert_eq!(series.len(), 5);

        let (pos, qb_points) = &series[0];
        assert_eq!(*pos, Position::QB);
        assert_eq!(qb_points.len(), 3);
        assert!((qb_points[0].0 - (-0.3)).abs() < 1e-9);
        assert!((qb_points[1].0 - 0.0).abs() < 1e-9);
        assert!((qb_points[2].0 - 0.3).abs() < 1e-9);

        let (pos, k_points) = &series[3];
        assert_eq!(*pos, Position::K);
        assert_eq!(k_points, &vec![(4.0, 140.0 / 16.0)]);
    }

    #[test]
    fn grouping_toggle() {
        assert_eq!(Grouping::Overall.toggled(), Grouping::PerPosition);
        assert_eq!(Grouping::PerPosition.toggled(), Grouping::Overall);
    }
}
