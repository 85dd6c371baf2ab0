use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "companion")]
#[command(about = "CourseCompanion widget session tools", long_about = None)]
struct Cli {
    /// Directory holding widget.toml (defaults to the user config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scripted sequence of widget actions against a chat fixture
    Replay {
        /// JSON array of chat records to seed the history with
        #[arg(long)]
        fixture: Option<PathBuf>,
        /// TOML file with [[step]] tables
        script: PathBuf,
    },
    /// Inspect or create the widget configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Replay { fixture, script } => {
            commands::replay::run(cli.config_dir, fixture, script).await?
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(cli.config_dir)?,
            ConfigAction::Init { force } => commands::config::init(cli.config_dir, force)?,
        },
    }

    Ok(())
}
