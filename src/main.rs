// Main entry point for the warpdb-inspect CLI
// Opens the database read-only, scans one table and prints matching JSON rows

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use std::io::{self, Write};
use std::path::PathBuf;
use warpdb_inspect::config::{DEFAULT_DATA_COLUMN, DEFAULT_ID_COLUMN, DEFAULT_TABLE};
use warpdb_inspect::{default_db_path, OutputFormat, Preset, ScanConfig, Scanner, TableSource};

/// Print rows of a local SQLite table whose JSON payload mentions given terms
#[derive(ClapParser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Database file (defaults to warp.sqlite in Warp's data directory)
    #[arg(long, env = "WARPDB_PATH")]
    db: Option<PathBuf>,

    /// Table to scan
    #[arg(long, default_value = DEFAULT_TABLE, conflicts_with = "sql")]
    table: String,

    /// Identifier column
    #[arg(long, default_value = DEFAULT_ID_COLUMN, conflicts_with = "sql")]
    id_column: String,

    /// JSON payload column
    #[arg(long, default_value = DEFAULT_DATA_COLUMN, conflicts_with = "sql")]
    data_column: String,

    /// Custom read-only SELECT; first column is the id, second the payload
    #[arg(long)]
    sql: Option<String>,

    /// Canned term set
    #[arg(long, value_enum, default_value_t = Preset::Profiles)]
    preset: Preset,

    /// Filter term, repeatable; prefix with `key:` for top-level key presence
    #[arg(short, long = "term")]
    terms: Vec<String>,

    /// Truncate each printed document to this many characters
    #[arg(long)]
    max_chars: Option<usize>,

    /// Never truncate
    #[arg(long, conflicts_with = "max_chars")]
    full: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// List the tables in the database and exit
    #[arg(long)]
    list_tables: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    let db_path = args
        .db
        .clone()
        .or_else(default_db_path)
        .context("could not determine the local data directory; pass --db")?;

    if args.list_tables {
        return list_tables(db_path);
    }

    let config = ScanConfig::resolve(
        db_path,
        &args.table,
        &args.id_column,
        &args.data_column,
        args.sql.as_deref(),
        args.preset,
        &args.terms,
        args.max_chars,
        args.full,
        args.format,
    )?;

    run_scan(&config)
}

/// Install the stderr log subscriber; `WARPDB_LOG` wins over `-v`
fn init_tracing(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("WARPDB_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

/// Open, scan, print, close
fn run_scan(config: &ScanConfig) -> Result<()> {
    let source = TableSource::open(&config.db_path)?;
    let rows = source
        .rows(&config.select)
        .with_context(|| format!("failed to read rows from {}", config.select.source()))?;

    let scanner = Scanner::new(config.filter.clone(), config.max_chars, config.format)
        .with_id_line(config.id_line);
    let report = scanner.scan(rows);

    let mut stdout = io::stdout().lock();
    if config.format == OutputFormat::Text {
        writeln!(stdout, "{}", config.header)?;
    }
    for m in &report.matches {
        writeln!(stdout, "{}", scanner.render(m))?;
    }
    stdout.flush()?;

    source.close()?;
    Ok(())
}

/// Print one table name per line
fn list_tables(db_path: PathBuf) -> Result<()> {
    let source = TableSource::open(&db_path)?;
    let names = source.table_names()?;

    let mut stdout = io::stdout().lock();
    for name in names {
        writeln!(stdout, "{}", name)?;
    }

    source.close()?;
    Ok(())
}
