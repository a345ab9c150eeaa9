//! Emio CLI - tic-tac-toe board engine for the Emio robot
//!
//! This CLI provides:
//! - Move suggestions from the strategy engine
//! - Table position lookup (cell / storage slot)
//! - Replays of recorded games through the full game loop
//! - The default configuration file

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "emio")]
#[command(version, about = "Tic-tac-toe board engine for the Emio robot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest the robot's next move for a board
    Suggest(emio_tictactoe::cli::commands::suggest::SuggestArgs),

    /// Show which cell or storage slot a table position falls in
    Locate(emio_tictactoe::cli::commands::locate::LocateArgs),

    /// Replay recorded perception frames through the game loop
    Replay(emio_tictactoe::cli::commands::replay::ReplayArgs),

    /// Print the default configuration
    Config(emio_tictactoe::cli::commands::config::ConfigArgs),
}

/// Logs go to stderr so command output stays machine readable.
/// `RUST_LOG` selects the level; `EMIO_LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));

    if std::env::var("EMIO_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Suggest(args) => emio_tictactoe::cli::commands::suggest::execute(args),
        Commands::Locate(args) => emio_tictactoe::cli::commands::locate::execute(args),
        Commands::Replay(args) => emio_tictactoe::cli::commands::replay::execute(args),
        Commands::Config(args) => emio_tictactoe::cli::commands::config::execute(args),
    }
}
