use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use colored::*;
use stagehand_core::deploy_manager::{DeployManager, DeployManagerConfig};
use tracing_subscriber::EnvFilter;

mod commands;

/// Stagehand - hook-ordered deploy tasks
#[derive(Parser)]
#[command(name = "stagehand")]
#[command(about = "Run deploy tasks wired together with before/after hooks")]
#[command(version)]
struct Cli {
    /// Path to the project root (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Deploy file to load instead of .stagehand/deploy.yml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stage to deploy to (defaults to the configured default stage)
    #[arg(short, long)]
    stage: Option<String>,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List tasks with their descriptions
    List,
    /// List configured stages
    Stages,
    /// Show execution order for a task without running it
    Plan {
        /// Task name, e.g. "deploy:ftp"
        task: String,
    },
    /// Run a task together with everything hooked onto it
    Run {
        /// Task name, e.g. "deploy:ftp"
        task: String,
    },
    /// Show declared before/after hooks
    Graph,
    /// Print the JSON Schema of the deploy file
    Schema,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = execute(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}

fn execute(cli: Cli) -> Result<()> {
    // Schema output needs no deploy file
    if let Commands::Schema = cli.command {
        return commands::schema::execute();
    }

    let manager = DeployManager::new(DeployManagerConfig {
        root: cli.root,
        config_path: cli.config,
        stage: cli.stage,
    })
    .map_err(|e| anyhow::anyhow!("Failed to load deploy configuration: {}", e))?;

    // Execute command (CLI layer only handles presentation)
    match cli.command {
        Commands::List => commands::list::execute(&manager),
        Commands::Stages => commands::stages::execute(&manager),
        Commands::Plan { task } => commands::plan::execute(&manager, &task),
        Commands::Run { task } => commands::run::execute(&manager, &task),
        Commands::Graph => commands::graph::execute(&manager),
        Commands::Schema => commands::schema::execute(),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
