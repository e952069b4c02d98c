use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

mod agent;
mod config;
mod report;

use agent::Agent;
use config::{Config, DEFAULT_CONFIG_FILE, init_config, load_config};

#[derive(Parser, Debug)]
#[command(
    name = "bankparse",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BANKPARSE_BUILD_SHA"), ")"),
    about = "Extract bank statement tables and validate them against reference CSVs"
)]
struct Cli {
    /// Config file (default: ./bankparse.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse <data-dir>/<target>/ and validate against its result.csv, with retries
    Run {
        /// Target dataset, e.g. icici
        #[arg(long)]
        target: String,

        #[arg(long)]
        data_dir: Option<PathBuf>,

        #[arg(long)]
        max_attempts: Option<u32>,

        /// Write a JSON validation report here
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Extract and normalize a single CSV or PDF statement
    Parse {
        file: PathBuf,

        /// Write the normalized table as CSV
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Validate one statement against a reference statement
    Compare {
        observed: PathBuf,
        reference: PathBuf,

        /// Write a JSON validation report here
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Config file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config file if it does not exist
    Init,
    /// Print the effective config
    Show,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,bankparse={level},bankparse_core={level},bankparse_ingest={level}"
        ))
    });
    fmt()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut cfg = match &cli.command {
        Command::Config {
            command: ConfigCommand::Init,
        } => Config::default(),
        _ => load_config(cli.config.as_deref())?,
    };

    match cli.command {
        Command::Run {
            target,
            data_dir,
            max_attempts,
            report,
        } => {
            if let Some(dir) = data_dir {
                cfg.data_dir = dir;
            }
            if let Some(n) = max_attempts {
                cfg.max_attempts = n;
            }

            if let Some(outcome) = Agent::new(cfg).run(&target, report.as_deref()) {
                let validated = if outcome.validation.is_some() {
                    "validated"
                } else {
                    "not validated (no reference CSV)"
                };
                println!(
                    "{} rows from {}, {}",
                    outcome.rows,
                    outcome.observed.display(),
                    validated
                );
            }
        }

        Command::Parse { file, out } => {
            let preview_rows = cfg.preview_rows;
            let table = Agent::new(cfg).load(&file)?;
            report::print_preview(&table, &file, preview_rows);

            if let Some(out) = out {
                report::write_table_csv(&table, &out)
                    .with_context(|| format!("exporting {}", out.display()))?;
                println!("\nWrote {}", out.display());
            }
        }

        Command::Compare {
            observed,
            reference,
            report,
        } => {
            Agent::new(cfg).compare(&observed, &reference, report.as_deref())?;
            println!("All columns match.");
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => {
                let path = cli.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
                init_config(&path)?;
            }
            ConfigCommand::Show => {
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}
