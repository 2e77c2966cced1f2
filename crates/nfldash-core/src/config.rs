// Configuration loading and parsing (config/nfldash.toml).

use crate::scoring::rules::{Ppr, ScoringMethod};
use crate::stats::Position;
use crate::summary::query::{Grouping, SummaryQuery};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Name of the config file under `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "nfldash.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub seasons: SeasonRange,
    pub data_paths: DataPaths,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Player rule set name (`nfl.com` or `fantasydata.com`).
    pub method: String,
    #[serde(default)]
    pub ppr: Ppr,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SeasonRange {
    pub from: u16,
    pub to: u16,
}

/// Input and output directories. Relative paths are resolved against the
/// base directory the config was loaded from.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub raw_dir: PathBuf,
    pub processed_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Emit one `YYYY-WW` column per week in the summary file.
    #[serde(default = "default_true")]
    pub weekly_columns: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            weekly_columns: true,
        }
    }
}

/// Initial dashboard controls.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub limit: usize,
    pub grouping: Grouping,
    /// Position names to show at start-up; empty shows all.
    pub positions: Vec<String>,
    pub excluded_players: Vec<String>,
    /// Width of the horizontal spread in the by-position chart.
    pub jitter: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            limit: 50,
            grouping: Grouping::Overall,
            positions: Vec::new(),
            excluded_players: Vec::new(),
            jitter: 0.6,
        }
    }
}

impl DashboardConfig {
    /// The starting query for the dashboard.
    pub fn query(&self) -> SummaryQuery {
        SummaryQuery {
            positions: self
                .positions
                .iter()
                .filter_map(|p| Position::from_str_pos(p))
                .collect(),
            limit: self.limit,
            grouping: self.grouping,
            excluded: self.excluded_players.iter().cloned().collect(),
        }
    }
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/nfldash.toml` relative to `base_dir`.
///
/// Does not touch `defaults/`; `load_config` seeds missing files first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let mut config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    config.data_paths.raw_dir = base_dir.join(&config.data_paths.raw_dir);
    config.data_paths.processed_dir = base_dir.join(&config.data_paths.processed_dir);

    validate(&config)?;

    Ok(config)
}

/// Seed `config/` with every `*.toml` file from `defaults/` that is not
/// already present. Existing files are left alone. Returns the copied paths.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.is_dir() {
        if config_dir.is_dir() {
            return Ok(Vec::new());
        }
        return Err(copy_error(format!(
            "no defaults/ or config/ directory under {}; \
             run from the project root or pass --base-dir",
            base_dir.display()
        )));
    }

    let mut sources: Vec<PathBuf> = std::fs::read_dir(&defaults_dir)
        .map_err(|e| copy_error(format!("cannot list {}: {e}", defaults_dir.display())))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    sources.sort();

    std::fs::create_dir_all(&config_dir)
        .map_err(|e| copy_error(format!("cannot create {}: {e}", config_dir.display())))?;

    let mut copied = Vec::new();
    for source in sources {
        let Some(name) = source.file_name() else {
            continue;
        };
        let target = config_dir.join(name);
        if target.exists() {
            continue;
        }
        std::fs::copy(&source, &target).map_err(|e| {
            copy_error(format!(
                "cannot copy {} to {}: {e}",
                source.display(),
                target.display()
            ))
        })?;
        info!("seeded {} from defaults", target.display());
        copied.push(target);
    }

    Ok(copied)
}

fn copy_error(message: String) -> ConfigError {
    ConfigError::DefaultsCopyError { message }
}

/// Load config relative to `base_dir`, copying defaults first.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_files(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check field values. Run again after command-line overrides are applied.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if let Err(e) = config.scoring.method.parse::<ScoringMethod>() {
        return Err(invalid("scoring.method", e.to_string()));
    }

    let seasons = config.seasons;
    if seasons.from == 0 {
        return Err(invalid("seasons.from", "must be greater than 0"));
    }
    if seasons.from > seasons.to {
        return Err(invalid(
            "seasons.to",
            format!("must not be before seasons.from ({} > {})", seasons.from, seasons.to),
        ));
    }

    if config.data_paths.raw_dir.as_os_str().is_empty() {
        return Err(invalid("data_paths.raw_dir", "must not be empty"));
    }

    let dashboard = &config.dashboard;
    if dashboard.limit == 0 {
        return Err(invalid("dashboard.limit", "must be greater than 0"));
    }
    if let Some(bad) = dashboard
        .positions
        .iter()
        .find(|p| Position::from_str_pos(p).is_none())
    {
        return Err(invalid(
            "dashboard.positions",
            format!("unknown position `{bad}` (expected QB, RB, WR, TE, K or DEFENSE)"),
        ));
    }
    if !(0.0..1.0).contains(&dashboard.jitter) {
        return Err(invalid(
            "dashboard.jitter",
            format!("must be in [0.0, 1.0), got {}", dashboard.jitter),
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
