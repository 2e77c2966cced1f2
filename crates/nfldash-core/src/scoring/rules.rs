// Scoring rule registry.
//
// Rules are plain data (a small closed set of numeric transforms) so rule sets
// can be compared, printed, and serialized. Player stats have two alternate
// rule sets selected by method name; team defense/special-teams stats have a
// single set whose stat names all carry the `team_` prefix.

use super::ScoringError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Rule primitives
// ---------------------------------------------------------------------------

/// Comparison used to select a tier of a tiered rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Bound {
    Below(f64),
    AtMost(f64),
    Above(f64),
    AtLeast(f64),
    Equal(f64),
}

impl Bound {
    pub fn matches(&self, value: f64) -> bool {
        match *self {
            Bound::Below(b) => value < b,
            Bound::AtMost(b) => value <= b,
            Bound::Above(b) => value > b,
            Bound::AtLeast(b) => value >= b,
            Bound::Equal(b) => value == b,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub when: Bound,
    pub points: f64,
}

impl Tier {
    pub fn new(when: Bound, points: f64) -> Self {
        Tier { when, points }
    }
}

/// Points-per-reception format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ppr {
    #[default]
    Full,
    Half,
}

impl Ppr {
    pub fn points_per_reception(&self) -> f64 {
        match self {
            Ppr::Full => 1.0,
            Ppr::Half => 0.5,
        }
    }
}

impl FromStr for Ppr {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(Ppr::Full),
            "half" => Ok(Ppr::Half),
            _ => Err(ScoringError::UnknownPpr {
                value: s.to_string(),
            }),
        }
    }
}

/// How a single stat value converts to fantasy points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoringRule {
    /// `value * per_unit`.
    Linear { per_unit: f64 },
    /// First matching tier wins; `otherwise` when none match.
    Tiered { tiers: Vec<Tier>, otherwise: f64 },
    /// Receptions, scaled by the PPR format.
    Reception { ppr: Ppr },
}

impl ScoringRule {
    pub fn linear(per_unit: f64) -> Self {
        ScoringRule::Linear { per_unit }
    }

    pub fn points(&self, value: f64) -> f64 {
        match self {
            ScoringRule::Linear { per_unit } => value * per_unit,
            ScoringRule::Tiered { tiers, otherwise } => tiers
                .iter()
                .find(|t| t.when.matches(value))
                .map_or(*otherwise, |t| t.points),
            ScoringRule::Reception { ppr } => value * ppr.points_per_reception(),
        }
    }
}

/// Field goal made, keyed by kick distance in yards.
pub fn field_goal_rule() -> ScoringRule {
    ScoringRule::Tiered {
        tiers: vec![
            Tier::new(Bound::AtLeast(50.0), 5.0),
            Tier::new(Bound::Above(0.0), 3.0),
        ],
        otherwise: 0.0,
    }
}

/// Team defense bonus/penalty by points allowed.
pub fn points_allowed_rule() -> ScoringRule {
    ScoringRule::Tiered {
        tiers: vec![
            Tier::new(Bound::Equal(0.0), 10.0),
            Tier::new(Bound::Below(7.0), 7.0),
            Tier::new(Bound::Below(14.0), 4.0),
            Tier::new(Bound::Below(21.0), 1.0),
            Tier::new(Bound::Below(28.0), 0.0),
            Tier::new(Bound::Below(35.0), -1.0),
        ],
        otherwise: -4.0,
    }
}

pub fn field_goal_points(yards: f64) -> f64 {
    field_goal_rule().points(yards)
}

pub fn team_points_allowed(points_allowed: f64) -> f64 {
    points_allowed_rule().points(points_allowed)
}

// ---------------------------------------------------------------------------
// Rule sets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRule {
    pub stat: String,
    pub rule: ScoringRule,
}

/// An ordered, immutable mapping from stat name to scoring rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub name: String,
    pub rules: Vec<StatRule>,
}

impl RuleSet {
    fn from_pairs(name: &str, pairs: Vec<(&str, ScoringRule)>) -> Self {
        RuleSet {
            name: name.to_string(),
            rules: pairs
                .into_iter()
                .map(|(stat, rule)| StatRule {
                    stat: stat.to_string(),
                    rule,
                })
                .collect(),
        }
    }

    pub fn get(&self, stat: &str) -> Option<&ScoringRule> {
        self.rules.iter().find(|r| r.stat == stat).map(|r| &r.rule)
    }

    pub fn contains(&self, stat: &str) -> bool {
        self.get(stat).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Named player-stat rule sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoringMethod {
    NflCom,
    FantasyData,
}

impl ScoringMethod {
    pub const ALL: [ScoringMethod; 2] = [ScoringMethod::NflCom, ScoringMethod::FantasyData];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringMethod::NflCom => "nfl.com",
            ScoringMethod::FantasyData => "fantasydata.com",
        }
    }

    /// Player-stat rules for this method.
    pub fn player_rules(&self, ppr: Ppr) -> RuleSet {
        use ScoringRule::Reception;
        let lin = ScoringRule::linear;
        let pairs = match self {
            ScoringMethod::NflCom => vec![
                // Offense
                ("passing_yds", lin(0.04)),
                ("passing_tds", lin(4.0)),
                ("passing_ints", lin(-2.0)),
                ("rushing_yds", lin(0.1)),
                ("rushing_tds", lin(6.0)),
                ("receiving_rec", Reception { ppr }),
                ("receiving_yds", lin(0.1)),
                ("receiving_tds", lin(6.0)),
                ("fumbles_rec_tds", lin(6.0)),
                ("fumbles_lost", lin(-2.0)),
                ("passing_twoptm", lin(2.0)),
                ("rushing_twoptm", lin(2.0)),
                ("receiving_twoptm", lin(2.0)),
                // Kicking
                ("kicking_xpmade", lin(1.0)),
                ("kicking_fgm_yds", field_goal_rule()),
                // Individual defensive players
                ("defense_puntblk", lin(1.0)),
                ("defense_fgblk", lin(1.0)),
                ("defense_xpblk", lin(1.0)),
                ("defense_safe", lin(2.0)),
                ("defense_two_pt_return", lin(2.0)),
            ],
            ScoringMethod::FantasyData => vec![
                // Passing
                ("passing_yds", lin(0.04)),
                ("passing_tds", lin(4.0)),
                ("passing_ints", lin(-2.0)),
                // Rushing
                ("rushing_yds", lin(0.1)),
                ("rushing_tds", lin(6.0)),
                // Receiving
                ("receiving_rec", Reception { ppr }),
                ("receiving_yds", lin(0.1)),
                ("receiving_tds", lin(6.0)),
                // Two-point conversions and returns
                ("passing_twoptm", lin(2.0)),
                ("rushing_twoptm", lin(2.0)),
                ("receiving_twoptm", lin(2.0)),
                ("kickret_tds", lin(6.0)),
                // Fumbles
                ("fumbles_lost", lin(-2.0)),
                ("fumbles_rec_tds", lin(6.0)),
                // Tackles/hits
                ("defense_tkl", lin(1.0)),
                ("defense_ast", lin(0.5)),
                ("defense_sk", lin(2.0)),
                ("defense_sk_yds", lin(0.1)),
                ("defense_tkl_loss", lin(1.0)),
                ("defense_qbhit", lin(1.0)),
                // Pass and run defense
                ("defense_pass_def", lin(1.0)),
                ("defense_int", lin(3.0)),
                ("defense_ffum", lin(3.0)),
                ("defense_frec", lin(3.0)),
                // Scoring on defense
                ("defense_tds", lin(6.0)),
                ("defense_two_pt_return", lin(2.0)),
                // Kicking
                ("kicking_xpmade", lin(1.0)),
                ("kicking_fgm_yds", field_goal_rule()),
            ],
        };
        RuleSet::from_pairs(self.as_str(), pairs)
    }
}

impl fmt::Display for ScoringMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoringMethod {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScoringMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s.trim())
            .ok_or_else(|| ScoringError::UnknownMethod {
                method: s.to_string(),
                expected: ScoringMethod::ALL
                    .iter()
                    .map(|m| m.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// Player-stat rules for a method name. Unknown names are a configuration error.
pub fn player_rules(method: &str, ppr: Ppr) -> Result<RuleSet, ScoringError> {
    Ok(method.parse::<ScoringMethod>()?.player_rules(ppr))
}

/// Team defense/special-teams rules.
pub fn team_rules() -> RuleSet {
    let lin = ScoringRule::linear;
    RuleSet::from_pairs(
        "team",
        vec![
            ("team_defense_sk", lin(1.0)),
            ("team_defense_int", lin(2.0)),
            ("team_defense_frec", lin(2.0)),
            ("team_defense_safe", lin(2.0)),
            ("team_defense_tds", lin(6.0)),
            ("team_kickret_tds", lin(6.0)),
            ("team_puntret_tds", lin(6.0)),
            ("team_defense_two_pt_return", lin(2.0)),
            ("team_points_allowed", points_allowed_rule()),
        ],
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
