use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pasitos_cli::config::{Config, default_log_path};
use pasitos_cli::format::format_locations_text;
use pasitos_cli::headless;
use pasitos_store::Store;

#[derive(Parser)]
#[command(name = "pasitos")]
#[command(author, version, long_about = None)]
#[command(about = "Record GPS position and battery level on a map")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file (default: <config dir>/pasitos/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overrides the configuration
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the map screen (default)
    Run {
        #[command(flatten)]
        sampling: SamplingArgs,
    },

    /// Record without a screen until Ctrl-C
    Record {
        #[command(flatten)]
        sampling: SamplingArgs,

        /// Grant location access without asking
        #[arg(long)]
        allow_location: bool,
    },

    /// Print every recorded location, oldest first
    List,
}

#[derive(Args, Default)]
struct SamplingArgs {
    /// NMEA stream file to read fixes from
    #[arg(long)]
    nmea: Option<PathBuf>,

    /// Seconds between samples
    #[arg(short, long)]
    interval: Option<u64>,
}

impl SamplingArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(ref nmea) = self.nmea {
            config.location.nmea_path = nmea.clone();
        }
        if let Some(interval) = self.interval {
            config.sampling.interval_secs = interval;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    human_panic::setup_panic!();

    let cli = Cli::parse();
    let default_command = Commands::Run {
        sampling: SamplingArgs::default(),
    };
    let command = cli.command.as_ref().unwrap_or(&default_command);

    let mut config = match cli.config {
        Some(ref path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    if let Some(ref database) = cli.database {
        config.storage.path = database.clone();
    }
    match command {
        Commands::Run { sampling } | Commands::Record { sampling, .. } => {
            sampling.apply(&mut config)
        }
        Commands::List => {}
    }
    config.validate()?;

    // The map screen owns the terminal, so its logs go to a file
    let log_file = matches!(command, Commands::Run { .. }).then(default_log_path);
    init_tracing(&cli, log_file.as_deref())?;

    match command {
        Commands::Run { .. } => run_map(&config),
        Commands::Record { allow_location, .. } => {
            let stats = headless::record(&config, *allow_location).await?;
            if !cli.quiet {
                println!(
                    "Recorded {} location(s), {} skipped, {} failed",
                    stats.recorded, stats.skipped, stats.failed
                );
            }
            Ok(())
        }
        Commands::List => {
            let store = Store::open(&config.storage.path).with_context(|| {
                format!(
                    "Failed to open database {}",
                    config.storage.path.display()
                )
            })?;
            let records = store.list_locations()?;
            let no_color = cli.no_color || std::env::var_os("NO_COLOR").is_some();
            print!("{}", format_locations_text(&records, no_color));
            Ok(())
        }
    }
}

fn init_tracing(cli: &Cli, log_file: Option<&Path>) -> Result<()> {
    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

#[cfg(feature = "tui")]
fn run_map(config: &Config) -> Result<()> {
    pasitos_cli::tui::run(config)
}

#[cfg(not(feature = "tui"))]
fn run_map(_config: &Config) -> Result<()> {
    anyhow::bail!("This build has no map screen; use `pasitos record` or `pasitos list`")
}
