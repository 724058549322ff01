//! Operator CLI for the locality registry.
//!
//! # Responsibility
//! - Initialize and seed a locality database file.
//! - Print picker lookups, city lists and row counts.
//! - Run the administrative cascade delete.
//!
//! # Invariants
//! - Every command closes the registry before exiting, including on error.
//! - Logging is opt-in via `--log-dir`; stdout carries command output only.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use locality_core::config::{DEFAULT_DB_PATH, ENV_DB_PATH};
use locality_core::db::migrations::latest_version;
use locality_core::{
    init_logging, resolve_log_level, LocalityRegistry, NeighborhoodLookup, RegistryConfig,
    StorageLocation,
};
use log::{error, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Cameroonian city and neighborhood registry
#[derive(Parser)]
#[command(name = "locality")]
#[command(about = "Seed and query the city/neighborhood reference database")]
#[command(version)]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = ENV_DB_PATH, default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Log level (trace|debug|info|warn|error); falls back to LOCALITY_LOG_LEVEL
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Directory for rolling log files; logging stays off when absent
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create tables and indexes when absent
    Init,

    /// Load the built-in Yaoundé/Douala catalogue
    Seed,

    /// List neighborhoods of a city, ordered case-insensitively
    Neighborhoods {
        /// Exact city name, e.g. "Yaoundé"
        city: String,

        /// Print a JSON array instead of one name per line
        #[arg(long)]
        json: bool,
    },

    /// List stored cities
    Cities {
        #[arg(long)]
        json: bool,
    },

    /// Print city and neighborhood row counts
    Stats,

    /// Delete a city and all of its neighborhoods
    DeleteCity {
        city: String,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Seed => "seed",
            Self::Neighborhoods { .. } => "neighborhoods",
            Self::Cities { .. } => "cities",
            Self::Stats => "stats",
            Self::DeleteCity { .. } => "delete_city",
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = resolve_log_level(cli.log_level.as_deref());
        init_logging(&level, absolute_dir(log_dir)?).context("failed to start logging")?;
    }

    let config = RegistryConfig::from_env()?;
    let config = RegistryConfig {
        storage: StorageLocation::File(cli.db.clone()),
        ..config
    };

    let mut registry = LocalityRegistry::open(config)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let outcome = run_logged(&registry, cli.command, &mut std::io::stdout().lock());
    registry.close()?;
    outcome
}

fn run_logged(
    registry: &LocalityRegistry,
    command: Command,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let started_at = Instant::now();
    let name = command.name();
    info!("event=cli_command module=cli status=start command={name}");

    let outcome = run(registry, command, out);
    match &outcome {
        Ok(()) => info!(
            "event=cli_command module=cli status=ok command={} duration_ms={}",
            name,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=cli_command module=cli status=error command={} duration_ms={} error={:#}",
            name,
            started_at.elapsed().as_millis(),
            err
        ),
    }
    outcome
}

fn run(registry: &LocalityRegistry, command: Command, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        Command::Init => {
            registry.ensure_schema()?;
            writeln!(out, "schema_version={}", latest_version())?;
        }
        Command::Seed => {
            let report = registry.seed_reference_data()?;
            writeln!(
                out,
                "cities={} neighborhoods_inserted={}",
                report.cities, report.neighborhoods_inserted
            )?;
        }
        Command::Neighborhoods { city, json } => {
            let names = match registry.lookup_neighborhoods(&city)? {
                NeighborhoodLookup::Found(names) => names,
                NeighborhoodLookup::UnknownCity => bail!("unknown city `{city}`"),
            };
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&names)?)?;
            } else {
                for name in names {
                    writeln!(out, "{name}")?;
                }
            }
        }
        Command::Cities { json } => {
            let cities = registry.list_cities()?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&cities)?)?;
            } else {
                for city in cities {
                    writeln!(
                        out,
                        "{}\t{}\t{}",
                        city.name,
                        city.region.as_deref().unwrap_or("-"),
                        city.population
                    )?;
                }
            }
        }
        Command::Stats => {
            let counts = registry.counts()?;
            writeln!(
                out,
                "cities={} neighborhoods={}",
                counts.cities, counts.neighborhoods
            )?;
        }
        Command::DeleteCity { city } => {
            registry.delete_city(&city)?;
            writeln!(out, "deleted `{city}`")?;
        }
    }
    Ok(())
}

fn absolute_dir(path: &Path) -> anyhow::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    Ok(cwd.join(path))
}
