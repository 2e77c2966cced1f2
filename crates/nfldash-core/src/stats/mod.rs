// Weekly stat rows: positions, row subjects (team defense vs. player), and
// the column-ordered table the scoring pipeline consumes.

pub mod ingest;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Player name and position written for team defense/special-teams rows.
pub const DEFENSE: &str = "DEFENSE";

/// Prefix that marks a stat column as a team-level stat.
pub const TEAM_PREFIX: &str = "team_";

/// Identity columns, in the order they lead every output table.
pub const IDENTITY_COLUMNS: [&str; 5] = ["season", "week", "team", "position", "player"];

/// Returns true if the column name is a team-level stat (`team_<stat>`).
pub fn is_team_stat(column: &str) -> bool {
    column.starts_with(TEAM_PREFIX)
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Fantasy-relevant positions. `Defense` marks a team defense/special-teams row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    K,
    Defense,
}

impl Position {
    /// All positions in display order.
    pub const ALL: [Position; 6] = [
        Position::QB,
        Position::RB,
        Position::WR,
        Position::TE,
        Position::K,
        Position::Defense,
    ];

    /// Parse a position string (case-insensitive). `DST`/`DEF` are accepted
    /// as aliases for `DEFENSE`.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::QB),
            "RB" => Some(Position::RB),
            "WR" => Some(Position::WR),
            "TE" => Some(Position::TE),
            "K" => Some(Position::K),
            "DEFENSE" | "DEF" | "DST" => Some(Position::Defense),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::K => "K",
            Position::Defense => DEFENSE,
        }
    }

    /// Zero-based index in `Position::ALL`.
    pub fn index(&self) -> usize {
        match self {
            Position::QB => 0,
            Position::RB => 1,
            Position::WR => 2,
            Position::TE => 3,
            Position::K => 4,
            Position::Defense => 5,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A row's position as written in the input. Fantasy positions parse to
/// `Position`; anything else (`LB`, `DB`, a blank cell) keeps its label and
/// is still scored under the player rules.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RosterPosition {
    Fantasy(Position),
    Other(String),
}

impl RosterPosition {
    pub fn parse(s: &str) -> Self {
        match Position::from_str_pos(s) {
            Some(pos) => RosterPosition::Fantasy(pos),
            None => RosterPosition::Other(s.trim().to_string()),
        }
    }

    /// The dashboard position, if this is one of the six fantasy positions.
    pub fn fantasy(&self) -> Option<Position> {
        match self {
            RosterPosition::Fantasy(pos) => Some(*pos),
            RosterPosition::Other(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RosterPosition::Fantasy(pos) => pos.display_str(),
            RosterPosition::Other(label) => label,
        }
    }
}

impl From<Position> for RosterPosition {
    fn from(pos: Position) -> Self {
        RosterPosition::Fantasy(pos)
    }
}

impl PartialEq<Position> for RosterPosition {
    fn eq(&self, other: &Position) -> bool {
        self.fantasy() == Some(*other)
    }
}

impl fmt::Display for RosterPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StatRow
// ---------------------------------------------------------------------------

/// Who a stat row describes. Resolved once at ingestion from the `DEFENSE`
/// sentinel so later stages never compare strings to pick a rule set.
#[derive(Debug, Clone, PartialEq)]
pub enum Subject {
    /// Team defense/special-teams aggregate, scored under team rules.
    Defense,
    /// An individual player, scored under player rules.
    Player {
        name: String,
        position: RosterPosition,
    },
}

/// One team or one player, for one week of one season.
#[derive(Debug, Clone, PartialEq)]
pub struct StatRow {
    pub season: u16,
    pub week: u8,
    pub team: String,
    pub subject: Subject,
    /// Sparse stat values keyed by column name. Absent stats read as zero.
    pub stats: HashMap<String, f64>,
}

impl StatRow {
    pub fn is_defense(&self) -> bool {
        matches!(self.subject, Subject::Defense)
    }

    /// Player name, or `DEFENSE` for team rows.
    pub fn player(&self) -> &str {
        match &self.subject {
            Subject::Defense => DEFENSE,
            Subject::Player { name, .. } => name,
        }
    }

    pub fn position(&self) -> RosterPosition {
        match &self.subject {
            Subject::Defense => RosterPosition::Fantasy(Position::Defense),
            Subject::Player { position, .. } => position.clone(),
        }
    }

    /// Value of a stat column for this row; missing values are zero.
    pub fn stat(&self, column: &str) -> f64 {
        self.stats.get(column).copied().unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// StatTable
// ---------------------------------------------------------------------------

/// A batch of stat rows plus the ordered set of stat columns seen in the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatTable {
    /// Stat column names (identity columns excluded), in first-seen order.
    pub columns: Vec<String>,
    pub rows: Vec<StatRow>,
}

impl StatTable {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Team-level stat columns, in input order.
    pub fn team_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| is_team_stat(c))
            .map(String::as_str)
            .collect()
    }

    /// Player-level stat columns, in input order.
    pub fn player_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| !is_team_stat(c))
            .map(String::as_str)
            .collect()
    }

    /// Concatenate tables. Columns are unioned in first-seen order; rows keep
    /// their relative order.
    pub fn concat(tables: Vec<StatTable>) -> StatTable {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        let mut rows = Vec::new();
        for table in tables {
            for column in table.columns {
                if seen.insert(column.clone()) {
                    columns.push(column);
                }
            }
            rows.extend(table.rows);
        }
        StatTable { columns, rows }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
