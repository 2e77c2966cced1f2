// Batch scoring run: load raw weeks, score, summarize, write both CSVs.
//
// Rule sets are resolved before any file is read, so a bad scoring method
// fails without touching the output directory. Both output files are written
// to temporary paths and only renamed into place once both writes succeed.

use crate::config::Config;
use crate::output::{self, OutputError};
use crate::scoring::calculator::{calc_scores, ScoredTable};
use crate::scoring::rules::{self, Ppr, RuleSet};
use crate::scoring::ScoringError;
use crate::stats::ingest::{self, IngestError};
use crate::summary::aggregate::summarize;
use crate::summary::SummaryTable;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

/// The team and player rule sets for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleSets {
    pub team: RuleSet,
    pub player: RuleSet,
}

impl RuleSets {
    pub fn resolve(method: &str, ppr: Ppr) -> Result<Self, ScoringError> {
        Ok(RuleSets {
            team: rules::team_rules(),
            player: rules::player_rules(method, ppr)?,
        })
    }

    /// Both rule sets as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub stat_rows: usize,
    pub players: usize,
    pub weeks: usize,
    pub scored_path: PathBuf,
    pub summary_path: PathBuf,
}

/// Score and summarize in memory.
pub fn score_and_summarize(
    config: &Config,
    rule_sets: &RuleSets,
) -> Result<(ScoredTable, SummaryTable), PipelineError> {
    let seasons = config.seasons;
    let table = ingest::load_seasons(&config.data_paths.raw_dir, seasons.from, seasons.to)?;
    info!(
        "loaded {} stat rows ({} stat columns) for {}..={}",
        table.rows.len(),
        table.columns.len(),
        seasons.from,
        seasons.to
    );

    let scored = calc_scores(&table, &rule_sets.team, &rule_sets.player);
    let summary = summarize(&scored);
    Ok((scored, summary))
}

/// Run the full batch and write `scored-data_*` and `scores-summary_*` under
/// the processed directory.
pub fn run(config: &Config) -> Result<PipelineReport, PipelineError> {
    let rule_sets = RuleSets::resolve(&config.scoring.method, config.scoring.ppr)?;
    info!(
        "scoring with {} ({} player rules, {} team rules, {:?} PPR)",
        rule_sets.player.name,
        rule_sets.player.len(),
        rule_sets.team.len(),
        config.scoring.ppr
    );

    let (scored, summary) = score_and_summarize(config, &rule_sets)?;

    let seasons = config.seasons;
    let processed = &config.data_paths.processed_dir;
    let scored_path = output::scored_path(processed, seasons.from, seasons.to);
    let summary_path = output::summary_path(processed, seasons.from, seasons.to);
    write_outputs(
        (&scored_path, &scored),
        (&summary_path, &summary),
        config.output.weekly_columns,
    )?;

    Ok(PipelineReport {
        stat_rows: scored.rows.len(),
        players: summary.rows.len(),
        weeks: summary.week_keys.len(),
        scored_path,
        summary_path,
    })
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn rename(from: &Path, to: &Path) -> Result<(), OutputError> {
    std::fs::rename(from, to).map_err(|e| OutputError::Io {
        path: to.display().to_string(),
        source: e,
    })
}

/// Write both tables or neither. On failure, staged files are removed and a
/// scored file already moved into place is taken back out.
fn write_outputs(
    (scored_path, scored): (&Path, &ScoredTable),
    (summary_path, summary): (&Path, &SummaryTable),
    weekly_columns: bool,
) -> Result<(), OutputError> {
    let scored_tmp = staging_path(scored_path);
    let summary_tmp = staging_path(summary_path);

    let staged = output::write_scored(&scored_tmp, scored)
        .and_then(|()| output::write_summary(&summary_tmp, summary, weekly_columns));
    let result = staged.and_then(|()| {
        rename(&scored_tmp, scored_path)?;
        rename(&summary_tmp, summary_path).inspect_err(|_| {
            let _ = std::fs::remove_file(scored_path);
        })
    });

    if let Err(e) = &result {
        warn!("output not written: {}", e);
        let _ = std::fs::remove_file(&scored_tmp);
        let _ = std::fs::remove_file(&summary_tmp);
    }
    result
}
