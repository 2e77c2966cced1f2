// nfldash entry point.
//
// Subcommands:
// - score:     load raw weekly stats, score them, write the scored and summary CSVs
// - dashboard: open the terminal dashboard over a summary CSV
// - rules:     print the resolved rule sets as JSON
//
// Batch commands log to stderr. The dashboard owns the terminal, so it logs
// to logs/nfldash.log under the base directory instead.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use nfldash_core::config::{self, Config};
use nfldash_core::output;
use nfldash_core::pipeline::{self, RuleSets};
use nfldash_core::scoring::rules::Ppr;
use nfldash_tui::tui::{self, ViewState};

const LOG_FILTER: &str = "nfldash=info,nfldash_core=info,nfldash_tui=info,warn";

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a season range and write the scored and summary CSVs
    Score {
        /// First season to score (defaults to the configured range)
        from: Option<u16>,
        /// Last season to score (defaults to `from`)
        to: Option<u16>,
        /// Player rule set: nfl.com or fantasydata.com
        #[arg(short, long)]
        method: Option<String>,
        /// Points per reception: full or half
        #[arg(long)]
        ppr: Option<Ppr>,
    },
    /// Browse a season summary in the terminal dashboard
    Dashboard {
        /// Summary CSV to load (defaults to the configured season range)
        #[arg(short, long)]
        summary: Option<PathBuf>,
    },
    /// Print the team and player rule sets as JSON
    Rules {
        #[arg(short, long)]
        method: Option<String>,
        #[arg(long)]
        ppr: Option<Ppr>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "nfldash")]
#[command(about = "NFL fantasy scoring and season dashboard", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding defaults/ and config/ (defaults to the current directory)
    #[arg(short, long, global = true)]
    base_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let base_dir = match cli.base_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to read current directory")?,
    };

    match cli.command {
        Commands::Score {
            from,
            to,
            method,
            ppr,
        } => {
            init_tracing(None)?;
            let mut config = load(&base_dir)?;
            apply_scoring_overrides(&mut config, method, ppr);
            if let Some(from) = from {
                config.seasons.from = from;
                config.seasons.to = to.unwrap_or(from);
            }
            config::validate(&config).context("invalid command-line overrides")?;

            let report = pipeline::run(&config).context("scoring run failed")?;
            info!(
                "scored {} stat rows for {} players over {} weeks",
                report.stat_rows, report.players, report.weeks
            );
            println!("{}", report.scored_path.display());
            println!("{}", report.summary_path.display());
        }
        Commands::Dashboard { summary } => {
            init_tracing(Some(&base_dir))?;
            let config = load(&base_dir)?;
            let summary_path = summary.unwrap_or_else(|| {
                output::summary_path(
                    &config.data_paths.processed_dir,
                    config.seasons.from,
                    config.seasons.to,
                )
            });
            let table = output::read_summary(&summary_path)
                .with_context(|| format!("failed to load {}", summary_path.display()))?;
            info!(
                "loaded {} summary rows from {}",
                table.rows.len(),
                summary_path.display()
            );

            let view_state = ViewState::new(
                table,
                config.dashboard.query(),
                config.dashboard.jitter,
            );
            tui::run(view_state, summary_path).await?;
        }
        Commands::Rules { method, ppr } => {
            init_tracing(None)?;
            let mut config = load(&base_dir)?;
            apply_scoring_overrides(&mut config, method, ppr);
            let rule_sets = RuleSets::resolve(&config.scoring.method, config.scoring.ppr)?;
            println!("{}", rule_sets.to_json()?);
        }
    }

    Ok(())
}

fn load(base_dir: &Path) -> anyhow::Result<Config> {
    let config = config::load_config(base_dir).context("failed to load configuration")?;
    info!(
        "Config loaded: method={}, seasons {}..={}",
        config.scoring.method, config.seasons.from, config.seasons.to
    );
    Ok(config)
}

fn apply_scoring_overrides(config: &mut Config, method: Option<String>, ppr: Option<Ppr>) {
    if let Some(method) = method {
        config.scoring.method = method;
    }
    if let Some(ppr) = ppr {
        config.scoring.ppr = ppr;
    }
}

/// Install the global subscriber. With `log_dir_base` set, logs go to
/// `<base>/logs/nfldash.log`; otherwise to stderr.
fn init_tracing(log_dir_base: Option<&Path>) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(LOG_FILTER));

    match log_dir_base {
        Some(base) => {
            let log_dir = base.join("logs");
            std::fs::create_dir_all(&log_dir)?;
            let log_file = std::fs::File::create(log_dir.join("nfldash.log"))?;

            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_writer(log_file)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("failed to set tracing subscriber")?;
        }
        None => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("failed to set tracing subscriber")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_score_with_overrides() {
        let cli = Cli::parse_from([
            "nfldash", "--base-dir", "/tmp/x", "score", "2016", "2017", "--method",
            "fantasydata.com", "--ppr", "half",
        ]);
        assert_eq!(cli.base_dir, Some(PathBuf::from("/tmp/x")));
        match cli.command {
            Commands::Score {
                from,
                to,
                method,
                ppr,
            } => {
                assert_eq!(from, Some(2016));
                assert_eq!(to, Some(2017));
                assert_eq!(method.as_deref(), Some("fantasydata.com"));
                assert_eq!(ppr, Some(Ppr::Half));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_bad_ppr() {
        let result = Cli::try_parse_from(["nfldash", "rules", "--ppr", "quarter"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parses_dashboard_summary_path() {
        let cli = Cli::parse_from(["nfldash", "dashboard", "--summary", "s.csv"]);
        match cli.command {
            Commands::Dashboard { summary } => {
                assert_eq!(summary, Some(PathBuf::from("s.csv")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_verifies() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
