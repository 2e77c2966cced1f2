// Season summaries: per-player totals, weekly mean and spread, plus the
// read-side query used by the dashboard.

pub mod aggregate;
pub mod query;

use crate::stats::RosterPosition;
use std::fmt;
use std::str::FromStr;

/// Calendar week identifier, rendered as `YYYY-WW` so keys sort in calendar
/// order across season boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
    pub season: u16,
    pub week: u8,
}

impl WeekKey {
    pub fn new(season: u16, week: u8) -> Self {
        WeekKey { season, week }
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.season, self.week)
    }
}

impl FromStr for WeekKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (season, week) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("week key `{s}` is not of the form YYYY-WW"))?;
        let season = season
            .parse()
            .map_err(|_| format!("week key `{s}` has an invalid season"))?;
        let week = week
            .parse()
            .map_err(|_| format!("week key `{s}` has an invalid week"))?;
        Ok(WeekKey { season, week })
    }
}

/// One player's season line.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonSummary {
    pub player: String,
    pub team: String,
    /// Input position label; only fantasy positions reach the dashboard.
    pub position: RosterPosition,
    pub season_total: f64,
    pub week_avg: f64,
    pub week_std: f64,
    /// Per-week totals aligned with `SummaryTable::week_keys`; zero for weeks
    /// the player has no rows in. Empty when read back from a file written
    /// without week columns.
    pub weekly: Vec<f64>,
}

/// All season summaries, sorted by `season_total` descending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryTable {
    pub week_keys: Vec<WeekKey>,
    pub rows: Vec<SeasonSummary>,
}

/// Round to one decimal place for display.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
