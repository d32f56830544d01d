//! needle - insert fragments into generated files at marked needles
//!
//! Thin front end over [`needle_files::NeedleLayer`] for scripting and for
//! checking a generated project's templates by hand.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;

/// needle - idempotent insertion at needle markers
#[derive(Parser, Debug)]
#[command(name = "needle")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Insert fragments before their needles
    Insert(commands::insert::InsertArgs),

    /// Show where each needle's marker sits in a file
    Locate(commands::locate::LocateArgs),

    /// List registered needles
    Needles(commands::needles::NeedlesArgs),
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = commands::load_config(cli.config.as_deref())?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let code = match cli.command {
        Commands::Insert(args) => commands::insert::run(&config, &args, &mut out)?,
        Commands::Locate(args) => commands::locate::run(&config, &args, &mut out)?,
        Commands::Needles(args) => commands::needles::run(&config, &args, &mut out)?,
    };
    out.flush()?;
    Ok(code)
}
