// Score calculator: applies team and player rule sets to a stat table.
//
// Team rules only ever touch defense rows and player rules only player rows,
// so one table can hold both kinds. A score cell for the other row kind is
// left empty rather than zero.

use super::rules::RuleSet;
use crate::stats::{is_team_stat, StatRow, StatTable, IDENTITY_COLUMNS};
use tracing::{debug, info, warn};

/// Suffix appended to a stat name to form its score column.
pub const SCORE_SUFFIX: &str = "_score";

/// Name of the row total column.
pub const TOTAL_SCORE: &str = "total_score";

pub fn score_column(stat: &str) -> String {
    format!("{stat}{SCORE_SUFFIX}")
}

/// A stat row plus its derived scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRow {
    pub row: StatRow,
    /// One cell per entry of `ScoredTable::score_stats`; `None` where the
    /// row's rule set has no rule for that stat.
    pub scores: Vec<Option<f64>>,
    pub total_score: f64,
}

/// The scored table, with columns in canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTable {
    /// Team-level stat columns, in input order.
    pub team_columns: Vec<String>,
    /// Player-level stat columns, in input order.
    pub player_columns: Vec<String>,
    /// Stats that received a score column: team stats first, then player
    /// stats, each group in input order.
    pub score_stats: Vec<String>,
    pub rows: Vec<ScoredRow>,
}

impl ScoredTable {
    /// Full header: identity, team stats, player stats, team scores, player
    /// scores, total.
    pub fn header(&self) -> Vec<String> {
        IDENTITY_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.team_columns.iter().cloned())
            .chain(self.player_columns.iter().cloned())
            .chain(self.score_stats.iter().map(|s| score_column(s)))
            .chain(std::iter::once(TOTAL_SCORE.to_string()))
            .collect()
    }

    /// All stat columns in canonical order.
    pub fn stat_columns(&self) -> impl Iterator<Item = &String> {
        self.team_columns.iter().chain(self.player_columns.iter())
    }

    pub fn has_score_column(&self, stat: &str) -> bool {
        self.score_stats.iter().any(|s| s == stat)
    }

    /// Score cell for a row and stat, if that column exists and was written
    /// for the row.
    pub fn score(&self, row: usize, stat: &str) -> Option<f64> {
        let col = self.score_stats.iter().position(|s| s == stat)?;
        self.rows.get(row)?.scores[col]
    }
}

/// Record which rules have an input column, warning about the rest.
fn usable_rules<'a>(table: &StatTable, rules: &'a RuleSet) -> Vec<&'a str> {
    let mut usable = Vec::new();
    for rule in rules.iter() {
        debug!(stat = %rule.stat, rule_set = %rules.name, "computing");
        if table.has_column(&rule.stat) {
            usable.push(rule.stat.as_str());
        } else {
            warn!("{} not found in stat table; skipping", rule.stat);
        }
    }
    usable
}

/// Score every row of `table`.
///
/// For each rule whose stat column exists, a `<stat>_score` column is created
/// and filled for the matching row kind only. Rules for absent stats are
/// skipped with a warning. `total_score` sums the cells written for the row.
pub fn calc_scores(table: &StatTable, team_rules: &RuleSet, player_rules: &RuleSet) -> ScoredTable {
    let team_usable = usable_rules(table, team_rules);
    let player_usable = usable_rules(table, player_rules);
    let is_scored = |c: &str| team_usable.iter().chain(&player_usable).any(|s| *s == c);

    let team_columns: Vec<String> = table
        .columns
        .iter()
        .filter(|c| is_team_stat(c))
        .cloned()
        .collect();
    let player_columns: Vec<String> = table
        .columns
        .iter()
        .filter(|c| !is_team_stat(c))
        .cloned()
        .collect();
    let score_stats: Vec<String> = team_columns
        .iter()
        .chain(player_columns.iter())
        .filter(|c| is_scored(c.as_str()))
        .cloned()
        .collect();

    let rows: Vec<ScoredRow> = table
        .rows
        .iter()
        .map(|row| {
            let rules = if row.is_defense() { team_rules } else { player_rules };
            let scores: Vec<Option<f64>> = score_stats
                .iter()
                .map(|stat| rules.get(stat).map(|rule| rule.points(row.stat(stat))))
                .collect();
            let total_score = scores.iter().flatten().fold(0.0, |acc, v| acc + v);
            ScoredRow {
                row: row.clone(),
                scores,
                total_score,
            }
        })
        .collect();

    info!(
        "scored {} rows ({} score columns)",
        rows.len(),
        score_stats.len()
    );

    ScoredTable {
        team_columns,
        player_columns,
        score_stats,
        rows,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::rules::{team_rules, Ppr, ScoringMethod};
    use crate::stats::{Position, RosterPosition, Subject};
    use std::collections::HashMap;

    fn defense(team: &str, stats: &[(&str, f64)]) -> StatRow {
        StatRow {
            season: 2017,
            week: 1,
            team: team.into(),
            subject: Subject::Defense,
            stats: stats.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    fn player(name: &str, position: Position, stats: &[(&str, f64)]) -> StatRow {
        StatRow {
            season: 2017,
            week: 1,
            team: "NE".into(),
            subject: Subject::Player {
                name: name.into(),
                position: position.into(),
            },
            stats: stats.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    fn sample_table() -> StatTable {
        StatTable {
            columns: vec![
                "passing_yds".into(),
                "team_points_allowed".into(),
                "passing_tds".into(),
                "team_defense_sk".into(),
                "kicking_fgm_yds".into(),
            ],
            rows: vec![
                defense("NE", &[("team_points_allowed", 13.0), ("team_defense_sk", 3.0)]),
                player("T.Brady", Position::QB, &[("passing_yds", 300.0), ("passing_tds", 3.0)]),
                player("S.Gostkowski", Position::K, &[("kicking_fgm_yds", 52.0)]),
            ],
        }
    }

    fn nfl_rules() -> RuleSet {
        ScoringMethod::NflCom.player_rules(Ppr::Full)
    }

    #[test]
    fn canonical_column_order() {
        let scored = calc_scores(&sample_table(), &team_rules(), &nfl_rules());
        assert_eq!(
            scored.header(),
            vec![
                "season",
                "week",
                "team",
                "position",
                "player",
                "team_points_allowed",
                "team_defense_sk",
                "passing_yds",
                "passing_tds",
                "kicking_fgm_yds",
                "team_points_allowed_score",
                "team_defense_sk_score",
                "passing_yds_score",
                "passing_tds_score",
                "kicking_fgm_yds_score",
                "total_score",
            ]
        );
    }

    #[test]
    fn row_count_preserved() {
        let table = sample_table();
        let scored = calc_scores(&table, &team_rules(), &nfl_rules());
        assert_eq!(scored.rows.len(), table.rows.len());
        for (scored_row, row) in scored.rows.iter().zip(&table.rows) {
            assert_eq!(&scored_row.row, row);
        }
    }

    #[test]
    fn defense_rows_use_team_rules_only() {
        let scored = calc_scores(&sample_table(), &team_rules(), &nfl_rules());
        assert_eq!(scored.score(0, "team_points_allowed"), Some(4.0));
        assert_eq!(scored.score(0, "team_defense_sk"), Some(3.0));
        assert_eq!(scored.score(0, "passing_yds"), None);
        assert_eq!(scored.score(0, "passing_tds"), None);
        assert!((scored.rows[0].total_score - 7.0).abs() < 1e-9);
    }

    #[test]
    fn individual_defenders_scored_as_players() {
        let table = StatTable {
            columns: vec!["defense_tkl".into(), "defense_sk".into()],
            rows: vec![StatRow {
                season: 2017,
                week: 1,
                team: "HOU".into(),
                subject: Subject::Player {
                    name: "J.Watt".into(),
                    position: RosterPosition::parse("LB"),
                },
                stats: [("defense_tkl".to_string(), 9.0), ("defense_sk".to_string(), 2.0)]
                    .into_iter()
                    .collect(),
            }],
        };
        let rules = ScoringMethod::FantasyData.player_rules(Ppr::Full);
        let scored = calc_scores(&table, &team_rules(), &rules);
        assert_eq!(scored.score(0, "defense_tkl"), Some(9.0));
        assert_eq!(scored.score(0, "defense_sk"), Some(4.0));
        assert!((scored.rows[0].total_score - 13.0).abs() < 1e-9);
    }

    #[test]
    fn player_rows_use_player_rules_only() {
        let scored = calc_scores(&sample_table(), &team_rules(), &nfl_rules());
        // A player row with zero team stats must not pick up the 10-point
        // shutout bonus.
        assert_eq!(scored.score(1, "team_points_allowed"), None);
        assert_eq!(scored.score(1, "team_defense_sk"), None);
        assert!((scored.score(1, "passing_yds").unwrap() - 12.0).abs() < 1e-9);
        assert_eq!(scored.score(1, "passing_tds"), Some(12.0));
        assert!((scored.rows[1].total_score - 24.0).abs() < 1e-9);

        assert_eq!(scored.score(2, "kicking_fgm_yds"), Some(5.0));
        assert_eq!(scored.rows[2].total_score, 5.0);
    }

    #[test]
    fn total_is_sum_of_generated_cells() {
        let scored = calc_scores(&sample_table(), &team_rules(), &nfl_rules());
        for row in &scored.rows {
            let sum: f64 = row.scores.iter().flatten().sum();
            assert!((row.total_score - sum).abs() < 1e-12);
        }
    }

    #[test]
    fn absent_stat_creates_no_column() {
        let scored = calc_scores(&sample_table(), &team_rules(), &nfl_rules());
        assert!(!scored.has_score_column("rushing_yds"));
        assert!(!scored.has_score_column("team_defense_int"));
        assert!(!scored.header().contains(&"rushing_yds_score".to_string()));
    }

    #[test]
    fn unscored_input_column_is_kept_without_score() {
        let mut table = sample_table();
        table.columns.push("offense_snaps".into());
        table.rows[1].stats.insert("offense_snaps".into(), 64.0);

        let scored = calc_scores(&table, &team_rules(), &nfl_rules());
        assert!(scored.player_columns.contains(&"offense_snaps".to_string()));
        assert!(!scored.has_score_column("offense_snaps"));
    }

    #[test]
    fn row_without_matching_rules_scores_zero() {
        let table = StatTable {
            columns: vec!["passing_yds".into()],
            rows: vec![defense("NE", &[])],
        };
        let scored = calc_scores(&table, &team_rules(), &nfl_rules());
        assert_eq!(scored.rows[0].total_score, 0.0);
        assert_eq!(scored.rows[0].scores, vec![None]);
    }

    #[test]
    fn empty_table_scores_empty() {
        let scored = calc_scores(&StatTable::default(), &team_rules(), &nfl_rules());
        assert!(scored.rows.is_empty());
        assert!(scored.score_stats.is_empty());
        assert_eq!(scored.header().last().map(String::as_str), Some(TOTAL_SCORE));
    }

    #[test]
    fn scoring_is_deterministic() {
        let table = sample_table();
        let first = calc_scores(&table, &team_rules(), &nfl_rules());
        let second = calc_scores(&table, &team_rules(), &nfl_rules());
        assert_eq!(first, second);
    }

    #[test]
    fn missing_values_score_as_zero_input() {
        // Kicker row has no passing stats: scored as 0, not skipped.
        let scored = calc_scores(&sample_table(), &team_rules(), &nfl_rules());
        assert_eq!(scored.score(2, "passing_yds"), Some(0.0));
        assert_eq!(scored.score(2, "passing_tds"), Some(0.0));
    }

    #[test]
    fn stat_shared_by_both_rule_sets_scores_each_kind() {
        let mut team = team_rules();
        team.rules.push(crate::scoring::rules::StatRule {
            stat: "passing_tds".into(),
            rule: crate::scoring::rules::ScoringRule::linear(1.0),
        });
        let mut table = sample_table();
        table.rows[0].stats.insert("passing_tds".into(), 2.0);

        let scored = calc_scores(&table, &team, &nfl_rules());
        assert_eq!(scored.score(0, "passing_tds"), Some(2.0));
        assert_eq!(scored.score(1, "passing_tds"), Some(12.0));
    }

    #[test]
    fn stats_map_unused_keys_ignored() {
        let mut stats = HashMap::new();
        stats.insert("not_a_column".to_string(), 99.0);
        let table = StatTable {
            columns: vec!["passing_tds".into()],
            rows: vec![StatRow {
                season: 2017,
                week: 2,
                team: "NO".into(),
                subject: Subject::Player {
                    name: "D.Brees".into(),
                    position: Position::QB.into(),
                },
                stats,
            }],
        };
        let scored = calc_scores(&table, &team_rules(), &nfl_rules());
        assert_eq!(scored.rows[0].total_score, 0.0);
    }
}
