//! Reconcile - check stored play-by-play against box scores
//!
//! Derives each game's points from its events, compares them with the summed
//! team box scores, and lists duplicate events and coverage gaps.
//!
//! Usage:
//!   cargo run --bin reconcile
//!   cargo run --bin reconcile -- assets/data/nba_stats.db --season 2021
//!   cargo run --bin reconcile -- --json reports/reconcile.json

use std::path::PathBuf;

use tracing::error;
use tracing_subscriber::EnvFilter;

use hoopsync::constants::DEFAULT_DB_PATH;
use hoopsync::reconcile::{self, ReconcileOptions};
use hoopsync::{EtlError, EtlResult, StatsDatabase};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match ReconcileConfig::from_args() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}\n", e);
            print_help();
            std::process::exit(2);
        }
    };

    if config.show_help {
        print_help();
        return;
    }

    if let Err(e) = run(&config) {
        error!("Reconciliation failed: {}", e);
        std::process::exit(1);
    }
}

fn run(config: &ReconcileConfig) -> EtlResult<()> {
    if !config.db_path.exists() {
        return Err(EtlError::InvalidArgument(format!(
            "no database at {}",
            config.db_path.display()
        )));
    }

    let db = StatsDatabase::open(&config.db_path)?;
    let report = reconcile::run(
        db.conn(),
        ReconcileOptions {
            season: config.season,
        },
    )?;

    println!("============================================================");
    println!("{}", report.format_text());

    if let Some(json_path) = &config.json_file {
        report.write_json(json_path)?;
        println!("Report written to {}", json_path.display());
    }
    Ok(())
}

/// Configuration for the reconcile tool
struct ReconcileConfig {
    db_path: PathBuf,
    season: Option<i32>,
    json_file: Option<PathBuf>,
    show_help: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            season: None,
            json_file: None,
            show_help: false,
        }
    }
}

impl ReconcileConfig {
    fn from_args() -> EtlResult<Self> {
        let args: Vec<String> = std::env::args().collect();
        let mut config = Self::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--season" => {
                    let value = args.get(i + 1).ok_or_else(|| {
                        EtlError::InvalidArgument("--season needs a year".to_string())
                    })?;
                    let year = value.parse().map_err(|_| {
                        EtlError::InvalidArgument(format!("invalid season year '{}'", value))
                    })?;
                    config.season = Some(year);
                    i += 1;
                }
                "--json" => {
                    let value = args.get(i + 1).ok_or_else(|| {
                        EtlError::InvalidArgument("--json needs a file".to_string())
                    })?;
                    config.json_file = Some(PathBuf::from(value));
                    i += 1;
                }
                "--help" | "-h" => {
                    config.show_help = true;
                }
                arg if !arg.starts_with('-') => {
                    // Positional argument: db path
                    config.db_path = PathBuf::from(arg);
                }
                other => {
                    return Err(EtlError::InvalidArgument(format!(
                        "unknown argument '{}'",
                        other
                    )));
                }
            }
            i += 1;
        }

        Ok(config)
    }
}

fn print_help() {
    println!(
        r#"Reconcile - score and data-quality checks for the stats database

USAGE:
    cargo run --bin reconcile -- [DB_PATH] [OPTIONS]

ARGUMENTS:
    DB_PATH             SQLite database path (default: assets/data/nba_stats.db)

OPTIONS:
    --season <YEAR>     Also compare league team counts for the season starting YEAR
    --json <FILE>       Write the report as JSON
    --help, -h          Show this help

CHECKS:
    score mismatches    play-by-play points vs summed team box scores
    duplicate events    (game, event number) stored more than once
    team rows           games without exactly two team-stat rows
    coverage            distinct games per fact table
    league teams        teams per league vs NBA 30 / WNBA 12 / GLEAGUE 28
"#
    );
}
