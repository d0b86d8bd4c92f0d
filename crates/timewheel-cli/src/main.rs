use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod io;

use config::CliConfig;

#[derive(Parser)]
#[command(
    name = "timewheel",
    version,
    about = "Edit planner days and apply templates on JSON snapshots"
)]
struct Cli {
    /// TOML config with [engine] and [defaults] tables
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Issue ids as `<prefix>-1`, `<prefix>-2`, … instead of random UUIDs
    #[arg(long, global = true)]
    sequential_ids: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add, update, delete, or import tasks on one day
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Preview, apply, validate, or capture templates
    Template {
        #[command(subcommand)]
        action: commands::template::TemplateAction,
    },
    /// Inspect days in a snapshot
    Day {
        #[command(subcommand)]
        action: commands::day::DayAction,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    let mut ids = commands::CliIds::new(cli.sequential_ids);
    match cli.command {
        Commands::Task { action } => commands::task::run(action, &config, &mut ids),
        Commands::Template { action } => commands::template::run(action, &config, &mut ids),
        Commands::Day { action } => commands::day::run(action),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
