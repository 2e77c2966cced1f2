// CSV output for scored rows and season summaries, plus the summary reader
// the dashboard loads from.

use crate::scoring::calculator::ScoredTable;
use crate::stats::RosterPosition;
use crate::summary::{SeasonSummary, SummaryTable, WeekKey};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Leading columns of the summary file, in order.
pub const SUMMARY_COLUMNS: [&str; 6] = [
    "player",
    "team",
    "position",
    "season_total",
    "week_avg",
    "week_std",
];

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("{path} is missing required column `{column}`")]
    MissingColumn { path: String, column: String },
}

// ---------------------------------------------------------------------------
// File naming
// ---------------------------------------------------------------------------

/// `<dir>/scored-data_{from}-to-{to}.csv`
pub fn scored_path(dir: &Path, from: u16, to: u16) -> PathBuf {
    dir.join(format!("scored-data_{from}-to-{to}.csv"))
}

/// `<dir>/scores-summary_{from}-to-{to}.csv`
pub fn summary_path(dir: &Path, from: u16, to: u16) -> PathBuf {
    dir.join(format!("scores-summary_{from}-to-{to}.csv"))
}

fn create_file(path: &Path) -> Result<File, OutputError> {
    let io_err = |source| OutputError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    File::create(path).map_err(io_err)
}

// ---------------------------------------------------------------------------
// Scored table
// ---------------------------------------------------------------------------

/// Write the scored table in canonical column order. Score cells that do not
/// apply to a row are written empty.
pub fn write_scored_to_writer<W: Write>(
    wtr: W,
    source: &str,
    table: &ScoredTable,
) -> Result<(), OutputError> {
    let csv_err = |e| OutputError::Csv {
        path: source.to_string(),
        source: e,
    };
    let mut writer = csv::Writer::from_writer(wtr);
    writer.write_record(table.header()).map_err(csv_err)?;

    for scored in &table.rows {
        let row = &scored.row;
        let mut record: Vec<String> = vec![
            row.season.to_string(),
            row.week.to_string(),
            row.team.clone(),
            row.position().to_string(),
            row.player().to_string(),
        ];
        record.extend(table.stat_columns().map(|c| row.stat(c).to_string()));
        record.extend(
            scored
                .scores
                .iter()
                .map(|cell| cell.map(|v| v.to_string()).unwrap_or_default()),
        );
        record.push(scored.total_score.to_string());
        writer.write_record(&record).map_err(csv_err)?;
    }

    writer.flush().map_err(|e| OutputError::Io {
        path: source.to_string(),
        source: e,
    })
}

pub fn write_scored(path: &Path, table: &ScoredTable) -> Result<(), OutputError> {
    let file = create_file(path)?;
    write_scored_to_writer(file, &path.display().to_string(), table)?;
    info!("wrote {} scored rows to {}", table.rows.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Summary table
// ---------------------------------------------------------------------------

/// Write season summaries. With `weekly_columns`, one `YYYY-WW` column per
/// week key follows the leading summary columns.
pub fn write_summary_to_writer<W: Write>(
    wtr: W,
    source: &str,
    table: &SummaryTable,
    weekly_columns: bool,
) -> Result<(), OutputError> {
    let csv_err = |e| OutputError::Csv {
        path: source.to_string(),
        source: e,
    };
    let mut writer = csv::Writer::from_writer(wtr);

    let mut header: Vec<String> = SUMMARY_COLUMNS.iter().map(|c| c.to_string()).collect();
    if weekly_columns {
        header.extend(table.week_keys.iter().map(|k| k.to_string()));
    }
    writer.write_record(&header).map_err(csv_err)?;

    for row in &table.rows {
        let mut record = vec![
            row.player.clone(),
            row.team.clone(),
            row.position.to_string(),
            row.season_total.to_string(),
            row.week_avg.to_string(),
            row.week_std.to_string(),
        ];
        if weekly_columns {
            record.extend(
                (0..table.week_keys.len())
                    .map(|i| row.weekly.get(i).copied().unwrap_or(0.0).to_string()),
            );
        }
        writer.write_record(&record).map_err(csv_err)?;
    }

    writer.flush().map_err(|e| OutputError::Io {
        path: source.to_string(),
        source: e,
    })
}

pub fn write_summary(
    path: &Path,
    table: &SummaryTable,
    weekly_columns: bool,
) -> Result<(), OutputError> {
    let file = create_file(path)?;
    write_summary_to_writer(file, &path.display().to_string(), table, weekly_columns)?;
    info!("wrote {} summary rows to {}", table.rows.len(), path.display());
    Ok(())
}

/// Load season summaries from a CSV reader.
///
/// Any header that parses as a week key is read back into `weekly`. Rows with
/// a non-numeric value are skipped with a warning.
pub fn read_summary_from_reader<R: Read>(rdr: R, source: &str) -> Result<SummaryTable, OutputError> {
    let csv_err = |e| OutputError::Csv {
        path: source.to_string(),
        source: e,
    };
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
    let headers = reader.headers().map_err(csv_err)?.clone();

    let mut idx = [0usize; 6];
    for (slot, name) in idx.iter_mut().zip(SUMMARY_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| OutputError::MissingColumn {
                path: source.to_string(),
                column: name.to_string(),
            })?;
    }
    let [player_i, team_i, pos_i, total_i, avg_i, std_i] = idx;

    let weekly_cols: Vec<(usize, WeekKey)> = headers
        .iter()
        .enumerate()
        .filter_map(|(i, h)| h.parse::<WeekKey>().ok().map(|k| (i, k)))
        .collect();

    let mut rows = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(csv_err)?;
        let field = |i: usize| record.get(i).unwrap_or("").trim();
        let number = |i: usize| field(i).parse::<f64>().ok().filter(|v| v.is_finite());

        let position = RosterPosition::parse(field(pos_i));
        let (Some(season_total), Some(week_avg), Some(week_std)) =
            (number(total_i), number(avg_i), number(std_i))
        else {
            warn!("{source} row {}: non-numeric summary value, skipping", line + 2);
            continue;
        };
        let weekly = weekly_cols
            .iter()
            .map(|(i, _)| number(*i).unwrap_or(0.0))
            .collect();

        rows.push(SeasonSummary {
            player: field(player_i).to_string(),
            team: field(team_i).to_string(),
            position,
            season_total,
            week_avg,
            week_std,
            weekly,
        });
    }

    Ok(SummaryTable {
        week_keys: weekly_cols.into_iter().map(|(_, k)| k).collect(),
        rows,
    })
}

pub fn read_summary(path: &Path) -> Result<SummaryTable, OutputError> {
    let file = File::open(path).map_err(|e| OutputError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let table = read_summary_from_reader(file, &path.display().to_string())?;
    info!("loaded {} summary rows from {}", table.rows.len(), path.display());
    Ok(table)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
