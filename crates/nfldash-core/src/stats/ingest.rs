// Raw weekly stat loading.
//
// Reads per-week CSV files laid out as `<raw_dir>/<season>/*.csv`. Each file
// carries `week, player, team, position` plus any number of stat columns.
// The season comes from the directory name; a `season` column is only read
// when no directory season is given.

use super::{Position, RosterPosition, StatRow, StatTable, Subject, DEFENSE, IDENTITY_COLUMNS};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("{path} is missing required column `{column}`")]
    MissingColumn { path: String, column: String },

    #[error("no stat rows found under {raw_dir} for seasons {from}..={to}")]
    NoInput { raw_dir: PathBuf, from: u16, to: u16 },
}

// ---------------------------------------------------------------------------
// Cell parsing helpers
// ---------------------------------------------------------------------------

/// Parse a stat cell. Empty cells and NaN are zero; anything else that is
/// not a finite number is rejected.
fn parse_stat(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Some(0.0);
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_nan() => Some(0.0),
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

/// Parse an integer-valued cell that may have been written as a float
/// (e.g. `3.0`).
fn parse_whole(cell: &str) -> Option<f64> {
    let v = cell.trim().parse::<f64>().ok()?;
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 {
        Some(v)
    } else {
        None
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

// ---------------------------------------------------------------------------
// Reader-based loader (enables testing without temp files)
// ---------------------------------------------------------------------------

/// Load one week's stat rows from a CSV reader.
///
/// `source` labels the input in errors and warnings. `season` is the
/// directory season and wins over a `season` column in the file. Malformed
/// rows are skipped with a warning.
pub fn load_week_from_reader<R: Read>(
    rdr: R,
    source: &str,
    season: Option<u16>,
) -> Result<StatTable, IngestError> {
    let mut reader = csv::Reader::from_reader(rdr);
    let headers = reader
        .headers()
        .map_err(|e| IngestError::Csv {
            path: source.to_string(),
            source: e,
        })?
        .clone();

    let required = |name: &str| {
        column_index(&headers, name).ok_or_else(|| IngestError::MissingColumn {
            path: source.to_string(),
            column: name.to_string(),
        })
    };
    let week_idx = required("week")?;
    let team_idx = required("team")?;
    let position_idx = required("position")?;
    let player_idx = required("player")?;
    let season_idx = column_index(&headers, "season");
    if season_idx.is_none() && season.is_none() {
        return Err(IngestError::MissingColumn {
            path: source.to_string(),
            column: "season".into(),
        });
    }

    // Everything that is not an identity column is a stat column. Unnamed
    // columns (a leftover pandas index) are dropped.
    let stat_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (i, h.trim().to_string()))
        .filter(|(_, h)| !h.is_empty() && !IDENTITY_COLUMNS.contains(&h.as_str()))
        .collect();

    let mut rows = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("{}: skipping malformed row {}: {}", source, line + 1, e);
                continue;
            }
        };
        let cell = |i: usize| record.get(i).unwrap_or("").trim();

        let Some(week) = parse_whole(cell(week_idx)).filter(|w| *w >= 1.0 && *w <= 255.0) else {
            warn!("{}: skipping row {}: invalid week '{}'", source, line + 1, cell(week_idx));
            continue;
        };
        let row_season = match (season, season_idx) {
            (Some(s), _) => s,
            (None, Some(i)) => match parse_whole(cell(i)).filter(|s| *s <= u16::MAX as f64) {
                Some(s) => s as u16,
                None => {
                    warn!("{}: skipping row {}: invalid season '{}'", source, line + 1, cell(i));
                    continue;
                }
            },
            // Rejected before the loop.
            (None, None) => continue,
        };

        let position = RosterPosition::parse(cell(position_idx));
        let subject = if position == Position::Defense {
            Subject::Defense
        } else {
            let name = cell(player_idx);
            if name.is_empty() || name == DEFENSE {
                warn!("{}: skipping row {}: player row without a name", source, line + 1);
                continue;
            }
            Subject::Player {
                name: name.to_string(),
                position,
            }
        };

        let mut stats = HashMap::with_capacity(stat_columns.len());
        let mut malformed = None;
        for (i, name) in &stat_columns {
            match parse_stat(cell(*i)) {
                Some(v) => {
                    stats.insert(name.clone(), v);
                }
                None => {
                    malformed = Some(name);
                    break;
                }
            }
        }
        if let Some(column) = malformed {
            warn!(
                "{}: skipping row {}: non-numeric value in `{}`",
                source,
                line + 1,
                column
            );
            continue;
        }

        rows.push(StatRow {
            season: row_season,
            week: week as u8,
            team: cell(team_idx).to_string(),
            subject,
            stats,
        });
    }

    Ok(StatTable {
        columns: stat_columns.into_iter().map(|(_, name)| name).collect(),
        rows,
    })
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

/// Load one week's stat file.
pub fn load_week_file(path: &Path, season: Option<u16>) -> Result<StatTable, IngestError> {
    let file = std::fs::File::open(path).map_err(|e| IngestError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_week_from_reader(file, &path.display().to_string(), season)
}

/// List the CSV files in a season directory, sorted by file name.
fn season_files(season_dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    let entries = std::fs::read_dir(season_dir).map_err(|e| IngestError::Io {
        path: season_dir.display().to_string(),
        source: e,
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| IngestError::Io {
            path: season_dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load and concatenate every weekly file for seasons `from..=to`.
///
/// A missing season directory is skipped with a warning; finding no rows at
/// all is an error.
pub fn load_seasons(raw_dir: &Path, from: u16, to: u16) -> Result<StatTable, IngestError> {
    let mut tables = Vec::new();
    for season in from..=to {
        let season_dir = raw_dir.join(season.to_string());
        if !season_dir.is_dir() {
            warn!("no raw data directory for season {} ({})", season, season_dir.display());
            continue;
        }
        for path in season_files(&season_dir)? {
            let table = load_week_file(&path, Some(season))?;
            info!("loaded {} rows from {}", table.rows.len(), path.display());
            tables.push(table);
        }
    }

    let table = StatTable::concat(tables);
    if table.rows.is_empty() {
        return Err(IngestError::NoInput {
            raw_dir: raw_dir.to_path_buf(),
            from,
            to,
        });
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
