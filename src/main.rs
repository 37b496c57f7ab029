use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dodgeball_index::config::AppConfig;
use dodgeball_index::models::{merge_by_player, PlayerRecord, RankedEntry, ScopeId};
use dodgeball_index::rank;
use dodgeball_index::storage::{write_lines, JsonlReader, JsonlWriter, StorageConfig};
use dodgeball_index::MetricComputer;

#[derive(Parser)]
#[command(name = "dodgeball-index")]
#[command(about = "Dodgeball player performance indices and power rankings")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./dodgeball.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute metrics for every player record
    Compute {
        /// Player records (JSONL)
        #[arg(long)]
        input: PathBuf,

        /// Write scored entries here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Emit every unrounded intermediate term instead of the scored entries
        #[arg(long)]
        breakdown: bool,
    },

    /// Rank the players of one scope by power index
    Rank {
        /// Scope to rank (season, event)
        #[arg(long)]
        scope: String,

        /// Player records (JSONL); defaults to <data-dir>/input/<scope>.jsonl
        #[arg(long)]
        input: Option<PathBuf>,

        /// Write ranked entries here
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write ranked entries to <data-dir>/output/<scope>.standings.jsonl
        #[arg(long, conflicts_with = "output")]
        save: bool,
    },

    /// Print the active weight table
    Weights,
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = if cli.config.exists() {
        AppConfig::from_file(&cli.config)
            .with_context(|| format!("loading {}", cli.config.display()))?
    } else {
        AppConfig::default()
    };

    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

fn read_records(path: PathBuf, config: &AppConfig) -> Result<Vec<PlayerRecord>> {
    let reader = JsonlReader::<PlayerRecord>::new(path);
    let mut records = reader
        .read_all()
        .with_context(|| format!("reading player records from {}", reader.path().display()))?;

    let rows = records.len();
    for record in &mut records {
        record.equipo = config.resolve_team(record.equipo.as_str());
    }
    let records = merge_by_player(records);
    if records.len() < rows {
        tracing::info!("Merged {} rows into {} players", rows, records.len());
    }

    for record in &records {
        for issue in record.counters.data_quality_issues() {
            tracing::warn!(
                "Data quality: {} {} ({}): {}",
                record.nombre,
                record.apellido,
                record.equipo,
                issue
            );
        }
    }

    tracing::info!("Loaded {} player records", records.len());
    Ok(records)
}

fn emit<T: Serialize>(output: Option<PathBuf>, rows: &[T]) -> Result<()> {
    match output {
        Some(path) => {
            JsonlWriter::new(path).write_all(rows)?;
        }
        None => {
            write_lines(std::io::stdout().lock(), rows)?;
        }
    }
    Ok(())
}

fn print_table(entries: &[RankedEntry]) {
    println!(
        "{:>4}  {:<28} {:<16} {:>8} {:>8} {:>8}",
        "#", "Jugador", "Equipo", "Ataque", "Defensa", "Poder"
    );
    for ranked in entries {
        let metrics = ranked.entry.metrics();
        println!(
            "{:>4}  {:<28} {:<16} {:>8.2} {:>8.2} {:>8.2}",
            ranked.rank,
            ranked.entry.display_name(),
            ranked.entry.equipo.as_str(),
            metrics.indice_ataque(),
            metrics.indice_defensa(),
            metrics.indice_poder()
        );
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    // Initialize tracing; logs go to stderr so stdout stays machine-readable
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    config.validate()?;
    tracing::debug!("Starting dodgeball-index v{}", env!("CARGO_PKG_VERSION"));

    let computer = MetricComputer::new(config.weights)?;
    let storage = StorageConfig::new(config.data_dir.clone());

    match cli.command {
        Commands::Compute {
            input,
            output,
            breakdown,
        } => {
            let records = read_records(input, &config)?;

            if breakdown {
                emit(output, &computer.breakdown_all(&records))?;
            } else {
                emit(output, &computer.score_all(&records))?;
            }
        }
        Commands::Rank {
            scope,
            input,
            output,
            save,
        } => {
            let scope_id = ScopeId::from(scope.as_str());
            let input = input.unwrap_or_else(|| storage.records_path(&scope));
            let records = read_records(input, &config)?;

            let (in_scope, other): (Vec<_>, Vec<_>) =
                records.into_iter().partition(|r| r.scope == scope_id);
            if !other.is_empty() {
                tracing::info!(
                    "Skipping {} records outside scope {}",
                    other.len(),
                    scope_id
                );
            }

            let table = rank::standings(computer.score_all(&in_scope), &scope_id)?;
            tracing::info!(
                "Ranked {} players in scope {} at {}",
                table.len(),
                table.scope,
                table.computed_at
            );

            if table.is_empty() {
                println!("No players in scope {}", scope_id);
            } else {
                print_table(&table.entries);
            }

            let target = if save {
                Some(storage.standings_path(&scope))
            } else {
                output
            };
            if let Some(path) = target {
                JsonlWriter::new(path).write_all(&table.entries)?;
            }
        }
        Commands::Weights => {
            print!("{}", toml::to_string(&config.weights)?);
        }
    }

    Ok(())
}
