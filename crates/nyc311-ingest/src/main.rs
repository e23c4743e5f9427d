//! nyc311 loader binary.
//!
//! Reads `nyc311.toml` (or the path specified with `--config`), opens the
//! SQLite store, and loads a 311 CSV export into it.
//!
//! With no subcommand, initializes the schema and then ingests.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use nyc311_core::store::RequestStore;
use nyc311_csv::ChunkReader;
use nyc311_ingest::IngestConfig;
use nyc311_store_sqlite::{SCHEMA, SqliteStore};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "NYC 311 service-request loader")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "nyc311.toml")]
  config: PathBuf,

  /// CSV export to load; overrides `csv_path`.
  #[arg(long)]
  csv: Option<PathBuf>,

  /// SQLite database file; overrides `db_path`.
  #[arg(long)]
  db: Option<PathBuf>,

  /// Rows per chunk; overrides `chunk_size`.
  #[arg(long)]
  chunk_size: Option<usize>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy, Default)]
enum Command {
  /// Create the tables if they do not exist.
  Init,
  /// Load the CSV export.
  Ingest,
  /// `init` followed by `ingest`.
  #[default]
  Run,
  /// Print table row counts as JSON.
  Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let command = cli.command.unwrap_or_default();

  // Load configuration.
  let mut cfg = IngestConfig::load(&cli.config, IngestConfig::environment())
    .context("failed to load configuration")?;

  if let Some(csv) = cli.csv {
    cfg.csv_path = csv;
  }
  if let Some(db) = cli.db {
    cfg.db_path = db;
  }
  if let Some(n) = cli.chunk_size {
    cfg.chunk_size = n;
  }

  let db_path = expand_tilde(&cfg.db_path);
  // With an external schema configured, the built-in one is never applied.
  let store = if cfg.schema_path.is_some() {
    SqliteStore::connect(&db_path).await
  } else {
    SqliteStore::open(&db_path).await
  }
  .with_context(|| format!("failed to open store at {db_path:?}"))?;

  if matches!(command, Command::Init | Command::Run) {
    let ddl = match &cfg.schema_path {
      Some(path) => {
        let path = expand_tilde(path);
        std::fs::read_to_string(&path)
          .with_context(|| format!("failed to read schema at {path:?}"))?
      }
      None => SCHEMA.to_owned(),
    };
    nyc311_ingest::initialize(&store, ddl)
      .await
      .context("schema initialization failed")?;
  }

  if matches!(command, Command::Ingest | Command::Run) {
    let csv_path = expand_tilde(&cfg.csv_path);
    let reader = ChunkReader::from_path(&csv_path, cfg.chunk_size)
      .with_context(|| format!("failed to open {csv_path:?}"))?;
    nyc311_ingest::ingest(&store, reader)
      .await
      .with_context(|| format!("ingestion of {csv_path:?} failed"))?;
  }

  if matches!(command, Command::Stats) {
    let counts = store.counts().await.context("failed to count rows")?;
    println!("{}", serde_json::to_string_pretty(&counts)?);
  }

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
