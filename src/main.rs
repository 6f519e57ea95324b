//! Hoopsync - ingest one (date, league) unit of work
//!
//! Usage:
//!   cargo run -- --ds 2021-10-19 --league NBA
//!   cargo run -- --league WNBA --db /tmp/wnba.db
//!   cargo run -- --reset-db

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Days, Local, NaiveDate};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use hoopsync::{EtlConfig, EtlError, EtlResult, GameSync, HttpStatsSource, League, StatsDatabase};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let sync_args = match SyncArgs::parse(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{}\n", e);
            print_help();
            std::process::exit(2);
        }
    };

    if sync_args.show_help {
        print_help();
        return;
    }

    if let Err(e) = run(sync_args) {
        error!("Sync failed: {}", e);
        std::process::exit(1);
    }
}

fn run(args: SyncArgs) -> EtlResult<()> {
    let mut config = EtlConfig::resolve(args.config_file.as_deref())?;
    if let Some(db_path) = args.db_path {
        config.database.path = db_path;
    }

    let date = match args.date {
        Some(date) => date,
        None => yesterday()?,
    };

    if args.reset_db {
        reset_database(&config.database.path)?;
    }
    if let Some(parent) = config.database.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    info!("Database: {}", config.database.path.display());
    let mut db = StatsDatabase::open(&config.database.path)?;
    let source = HttpStatsSource::new(config.source)?;

    let outcome = GameSync::new(&source).run(&mut db, args.league, date)?;
    println!("{}", outcome.format_summary());
    Ok(())
}

fn yesterday() -> EtlResult<NaiveDate> {
    Local::now()
        .date_naive()
        .checked_sub_days(Days::new(1))
        .ok_or_else(|| EtlError::InvalidArgument("cannot compute yesterday's date".to_string()))
}

/// Remove the database file (and its WAL side files) so the schema is rebuilt
fn reset_database(path: &Path) -> EtlResult<()> {
    let mut side_files = Vec::new();
    for suffix in ["-wal", "-shm"] {
        let mut name = path.as_os_str().to_owned();
        name.push(suffix);
        side_files.push(PathBuf::from(name));
    }

    for file in std::iter::once(path.to_path_buf()).chain(side_files) {
        if file.exists() {
            fs::remove_file(&file)?;
            warn!("Removed {}", file.display());
        }
    }
    Ok(())
}

/// Command-line options for one sync run
#[derive(Debug, Default, PartialEq)]
struct SyncArgs {
    date: Option<NaiveDate>,
    league: League,
    db_path: Option<PathBuf>,
    config_file: Option<PathBuf>,
    reset_db: bool,
    show_help: bool,
}

impl SyncArgs {
    fn parse(args: &[String]) -> EtlResult<Self> {
        let mut parsed = Self::default();

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--ds" | "--date" => {
                    let value = value_for(args, i)?;
                    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
                        EtlError::InvalidArgument(format!(
                            "invalid date '{}' (expected YYYY-MM-DD)",
                            value
                        ))
                    })?;
                    parsed.date = Some(date);
                    i += 1;
                }
                "--league" | "-l" => {
                    parsed.league = value_for(args, i)?.parse()?;
                    i += 1;
                }
                "--db" => {
                    parsed.db_path = Some(PathBuf::from(value_for(args, i)?));
                    i += 1;
                }
                "--config" | "-c" => {
                    parsed.config_file = Some(PathBuf::from(value_for(args, i)?));
                    i += 1;
                }
                "--reset-db" => {
                    parsed.reset_db = true;
                }
                "--help" | "-h" => {
                    parsed.show_help = true;
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

        Ok(parsed)
    }
}

fn value_for(args: &[String], i: usize) -> EtlResult<&str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| EtlError::InvalidArgument(format!("{} needs a value", args[i])))
}

fn print_help() {
    println!(
        r#"Hoopsync - ingest one day of games for one league

USAGE:
    cargo run -- [OPTIONS]

OPTIONS:
    --ds <YYYY-MM-DD>     Game date (default: yesterday)
    --league, -l <NAME>   NBA, WNBA or GLEAGUE (default: NBA)
    --db <PATH>           SQLite database (default: assets/data/nba_stats.db)
    --config, -c <FILE>   TOML config (default: ./hoopsync.toml if present)
    --reset-db            Delete the database and rebuild the schema first
    --help, -h            Show this help

EXAMPLES:
    # Opening night 2021-22
    cargo run -- --ds 2021-10-19 --league NBA

    # WNBA into a separate database
    cargo run -- --ds 2021-06-01 --league WNBA --db /tmp/wnba.db

LOGGING:
    RUST_LOG=debug cargo run -- --ds 2021-10-19   # log every request
"#
    );
}
